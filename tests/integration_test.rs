use quiz_html_generator::{AppError, App, Config, OutputError, ParseError, RenderError, ValidationError};
use regex::Regex;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

fn asset(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("assets").join(name)
}

fn test_config(seed: u64) -> Config {
    Config {
        stylesheet_path: asset("style.css").to_string_lossy().to_string(),
        seed: Some(seed),
        ..Default::default()
    }
}

/// 提取页面中的 Prev / Next 链接
fn nav_links(html: &str) -> HashMap<&'static str, String> {
    let re = Regex::new(r#"<div id="(leftarrow|rightarrow)" class="button"><a href="([^"]+)">"#).unwrap();
    re.captures_iter(html)
        .map(|caps| {
            let key = if &caps[1] == "leftarrow" { "prev" } else { "next" };
            (key, caps[2].to_string())
        })
        .collect()
}

fn html_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().to_string())
        .filter(|name| name.ends_with(".html"))
        .collect();
    names.sort();
    names
}

#[test]
fn test_sample_quiz_end_to_end() {
    let out = tempfile::tempdir().unwrap();
    let destination = out.path().join("lecture03");

    let stats = App::new(test_config(1), asset("sample_quiz.xml"), &destination)
        .run()
        .expect("生成失败");

    assert_eq!(stats.quiz_number, 3);
    assert_eq!(stats.questions, 3);
    assert_eq!(stats.report.pages_written.len(), 6);
    assert_eq!(
        html_files(&destination),
        vec![
            "lecture03_question01_a.html",
            "lecture03_question01_q.html",
            "lecture03_question02_a.html",
            "lecture03_question02_q.html",
            "lecture03_question03_a.html",
            "lecture03_question03_q.html",
        ]
    );
    assert!(destination.join("style.css").is_file());
    assert!(destination.join("manifest.json").is_file());
}

#[test]
fn test_navigation_is_consistent() {
    let out = tempfile::tempdir().unwrap();
    let stats = App::new(test_config(42), asset("sample_quiz.xml"), out.path())
        .run()
        .unwrap();
    let total = stats.questions;

    for i in 1..=total {
        let q_name = format!("lecture03_question{:02}_q.html", i);
        let a_name = format!("lecture03_question{:02}_a.html", i);
        let q_links = nav_links(&fs::read_to_string(out.path().join(&q_name)).unwrap());
        let a_links = nav_links(&fs::read_to_string(out.path().join(&a_name)).unwrap());

        // 题目页的 Next 指向本题答案页，答案页的 Prev 指回题目页
        assert_eq!(q_links.get("next"), Some(&a_name));
        assert_eq!(a_links.get("prev"), Some(&q_name));

        if i == 1 {
            assert!(!q_links.contains_key("prev"));
        } else {
            assert_eq!(
                q_links.get("prev"),
                Some(&format!("lecture03_question{:02}_a.html", i - 1))
            );
        }

        if i == total {
            assert!(!a_links.contains_key("next"));
        } else {
            assert_eq!(
                a_links.get("next"),
                Some(&format!("lecture03_question{:02}_q.html", i + 1))
            );
        }

        // 每个链接目标都真实存在
        for target in q_links.values().chain(a_links.values()) {
            assert!(out.path().join(target).is_file(), "链接目标不存在: {}", target);
        }
    }
}

#[test]
fn test_single_question_two_responses() {
    let source_dir = tempfile::tempdir().unwrap();
    let source = source_dir.path().join("quiz.xml");
    fs::write(
        &source,
        r#"<quiz quiznum="1">
            <question>
                <text texttype="text">Pick the even number.</text>
                <response correct="incorrect" texttype="text">3</response>
                <response correct="correct" texttype="text">4</response>
            </question>
        </quiz>"#,
    )
    .unwrap();
    let out = tempfile::tempdir().unwrap();

    App::new(test_config(5), &source, out.path()).run().unwrap();

    assert_eq!(html_files(out.path()).len(), 2);

    let question = fs::read_to_string(out.path().join("lecture01_question01_q.html")).unwrap();
    let answer = fs::read_to_string(out.path().join("lecture01_question01_a.html")).unwrap();

    assert!(!question.contains(r#"class="correct""#));
    assert!(!question.contains(r#"class="incorrect""#));
    assert_eq!(answer.matches(r#"<li class="correct">"#).count(), 1);
    assert_eq!(answer.matches(r#"<li class="incorrect">"#).count(), 1);
    assert!(answer.contains(r#"<li class="correct"><span class="text">4</span></li>"#));

    let q_links = nav_links(&question);
    let a_links = nav_links(&answer);
    assert!(!q_links.contains_key("prev") && q_links.contains_key("next"));
    assert!(a_links.contains_key("prev") && !a_links.contains_key("next"));
}

#[test]
fn test_seed_makes_output_reproducible() {
    let first = tempfile::tempdir().unwrap();
    let second = tempfile::tempdir().unwrap();

    App::new(test_config(2024), asset("sample_quiz.xml"), first.path()).run().unwrap();
    App::new(test_config(2024), asset("sample_quiz.xml"), second.path()).run().unwrap();

    for name in html_files(first.path()) {
        assert_eq!(
            fs::read_to_string(first.path().join(&name)).unwrap(),
            fs::read_to_string(second.path().join(&name)).unwrap(),
            "{} 内容不一致",
            name
        );
    }
}

#[test]
fn test_file_names_do_not_depend_on_shuffle() {
    let first = tempfile::tempdir().unwrap();
    let second = tempfile::tempdir().unwrap();

    App::new(test_config(1), asset("sample_quiz.xml"), first.path()).run().unwrap();
    App::new(test_config(987_654), asset("sample_quiz.xml"), second.path()).run().unwrap();

    assert_eq!(html_files(first.path()), html_files(second.path()));
}

#[test]
fn test_code_fragment_line_numbers() {
    let out = tempfile::tempdir().unwrap();
    App::new(test_config(3), asset("sample_quiz.xml"), out.path()).run().unwrap();

    // 三行代码从第 1 行开始编号的那道题
    let page = html_files(out.path())
        .into_iter()
        .map(|name| fs::read_to_string(out.path().join(name)).unwrap())
        .find(|html| html.contains("for i in x:"))
        .expect("找不到代码题");

    let re = Regex::new(r#"(?s)<div class="code"><pre class="code" style="counter-reset: line (-?\d+)">(.*?)</pre>"#).unwrap();
    let caps = re.captures(&page).unwrap();
    assert_eq!(&caps[1], "0");
    assert_eq!(caps[2].matches("<code>").count(), 3);
    assert!(caps[2].contains("<code>    print(i * 2, end=&#39; &#39;)\n</code>"));
}

#[test]
fn test_rerun_into_same_directory_drops_old_pages() {
    let out = tempfile::tempdir().unwrap();
    App::new(test_config(1), asset("sample_quiz.xml"), out.path()).run().unwrap();
    assert_eq!(html_files(out.path()).len(), 6);

    let source_dir = tempfile::tempdir().unwrap();
    let source = source_dir.path().join("quiz.xml");
    fs::write(
        &source,
        r#"<quiz quiznum="3"><question>
            <text texttype="text">Only one left.</text>
            <response correct="correct" texttype="text">ok</response>
        </question></quiz>"#,
    )
    .unwrap();

    let stats = App::new(test_config(1), &source, out.path()).run().unwrap();

    assert_eq!(stats.report.stale_removed.len(), 4);
    assert_eq!(
        html_files(out.path()),
        vec!["lecture03_question01_a.html", "lecture03_question01_q.html"]
    );
}

#[test]
fn test_missing_correct_response_fails_in_parse_stage() {
    let source_dir = tempfile::tempdir().unwrap();
    let source = source_dir.path().join("quiz.xml");
    fs::write(
        &source,
        r#"<quiz quiznum="2"><question>
            <text texttype="text">?</text>
            <response correct="incorrect" texttype="text">a</response>
        </question></quiz>"#,
    )
    .unwrap();
    let out = tempfile::tempdir().unwrap();
    let destination = out.path().join("quiz");

    let err = App::new(test_config(1), &source, &destination).run().unwrap_err();

    assert!(matches!(
        err,
        AppError::Parse(ParseError::Invalid(ValidationError::NoCorrectResponse { question: 1 }))
    ));
    assert!(err.to_string().starts_with("解析阶段失败"));
    assert!(!destination.exists());
}

#[test]
fn test_unknown_content_type_fails_in_render_stage_without_validation() {
    let source_dir = tempfile::tempdir().unwrap();
    let source = source_dir.path().join("quiz.xml");
    fs::write(
        &source,
        r#"<quiz quiznum="2"><question>
            <text texttype="image">diagram.png</text>
            <response correct="correct" texttype="text">a</response>
        </question></quiz>"#,
    )
    .unwrap();
    let out = tempfile::tempdir().unwrap();
    let destination = out.path().join("quiz");
    let config = Config {
        strict_validation: false,
        ..test_config(1)
    };

    let err = App::new(config, &source, &destination).run().unwrap_err();

    assert!(matches!(
        err,
        AppError::Render(RenderError::UnknownContentType { position: 1, .. })
    ));
    assert!(!destination.exists());
}

#[test]
fn test_missing_stylesheet_fails_in_output_stage() {
    let out = tempfile::tempdir().unwrap();
    let destination = out.path().join("quiz");
    let config = Config {
        stylesheet_path: out.path().join("nope.css").to_string_lossy().to_string(),
        ..test_config(1)
    };

    let err = App::new(config, asset("sample_quiz.xml"), &destination).run().unwrap_err();

    assert!(matches!(err, AppError::Output(OutputError::StylesheetMissing { .. })));
    assert!(err.to_string().starts_with("写出阶段失败"));
    assert!(!destination.exists());
}

#[test]
fn test_unreadable_source() {
    let out = tempfile::tempdir().unwrap();
    let err = App::new(test_config(1), out.path().join("missing.xml"), out.path())
        .run()
        .unwrap_err();

    assert!(matches!(err, AppError::Parse(ParseError::Read { .. })));
    assert!(html_files(out.path()).is_empty());
}
