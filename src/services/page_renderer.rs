//! 页面渲染服务
//!
//! 为每道题生成题目页与答案页两份 HTML，只返回内存中的字符串，不做文件读写

use crate::error::RenderError;
use crate::models::{CodeBlock, Fragment, FragmentBody, Question, Quiz, Response};
use crate::utils::html::escape_html;
use crate::workflow::{PageCtx, PageView};
use std::fmt::Write;
use tracing::debug;

/// MathJax 配置与加载脚本，所有页面完全相同
///
/// 行内公式使用 `\( \)`，独立公式使用 `$$ $$` 或 `\[ \]`
pub const MATHJAX_SCRIPT: &str = r#"<!-- Needed to render LaTex -->
    <script type="text/x-mathjax-config">
        MathJax.Hub.Config({
            jax: ["input/TeX", "output/CommonHTML"],
            extensions: ["tex2jax.js"],
            tex2jax: {
                inlineMath: [["\\(","\\)"]],
                displayMath: [['$$', '$$'], ["\\[", "\\]"]],
                processEscapes: true,
                processEnvironments: false
            }
        });
    </script>
    <script type="text/javascript"
        src="https://cdnjs.cloudflare.com/ajax/libs/mathjax/2.7.1/MathJax.js?config=TeX-AMS-MML_HTMLorMML">
    </script>"#;

/// 渲染选项
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// 标题中的课程名
    pub course_title: String,
    /// 样式表链接（相对于输出目录）
    pub stylesheet_href: String,
    /// 页面文件名前缀
    pub file_prefix: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            course_title: "RPI CS1".to_string(),
            stylesheet_href: "style.css".to_string(),
            file_prefix: "lecture".to_string(),
        }
    }
}

/// 渲染后的单个页面
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    pub file_name: String,
    pub html: String,
}

/// 一道题的题目页与答案页
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagePair {
    /// 题目在最终顺序中的位置（从1开始）
    pub position: usize,
    pub question: RenderedPage,
    pub answer: RenderedPage,
}

impl PagePair {
    pub fn pages(&self) -> [&RenderedPage; 2] {
        [&self.question, &self.answer]
    }
}

/// 页面渲染器
pub struct PageRenderer {
    options: RenderOptions,
}

impl PageRenderer {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// 按最终顺序渲染整个测验
    pub fn render_quiz(&self, quiz: &Quiz) -> Result<Vec<PagePair>, RenderError> {
        let total = quiz.questions.len();

        quiz.questions
            .iter()
            .enumerate()
            .map(|(index, question)| {
                let ctx = PageCtx::new(quiz.number, index + 1, total, &self.options.file_prefix);
                self.render_question(&ctx, question)
            })
            .collect()
    }

    /// 渲染单道题的两个页面
    pub fn render_question(&self, ctx: &PageCtx, question: &Question) -> Result<PagePair, RenderError> {
        let prompt = render_prompt(ctx, &question.prompt)?;

        let question_page = RenderedPage {
            file_name: ctx.file_name(PageView::Question),
            html: self.render_page(
                ctx,
                PageView::Question,
                &prompt,
                &render_responses(ctx, &question.responses, PageView::Question)?,
            ),
        };
        let answer_page = RenderedPage {
            file_name: ctx.file_name(PageView::Answer),
            html: self.render_page(
                ctx,
                PageView::Answer,
                &prompt,
                &render_responses(ctx, &question.responses, PageView::Answer)?,
            ),
        };

        debug!("{} 渲染完成: {} / {}", ctx, question_page.file_name, answer_page.file_name);

        Ok(PagePair {
            position: ctx.position,
            question: question_page,
            answer: answer_page,
        })
    }

    fn render_page(&self, ctx: &PageCtx, view: PageView, prompt: &str, responses: &str) -> String {
        format!(
            r#"<!DOCTYPE html>
<html>
{head}
{body}
</html>
"#,
            head = self.render_head(ctx),
            body = render_body(ctx, prompt, responses, &render_arrows(ctx, view)),
        )
    }

    fn render_head(&self, ctx: &PageCtx) -> String {
        format!(
            r#"<head>
    <meta charset="utf-8">
    <title>{title} Lecture {quiz} Question {position}</title>
    <link rel="stylesheet" type="text/css" href="{href}">
    {script}
</head>"#,
            title = escape_html(&self.options.course_title),
            quiz = ctx.quiz_number,
            position = ctx.position,
            href = escape_html(&self.options.stylesheet_href),
            script = MATHJAX_SCRIPT,
        )
    }
}

fn render_body(ctx: &PageCtx, prompt: &str, responses: &str, arrows: &str) -> String {
    format!(
        r#"<body>
<div id="outer">
    <h1> Lecture {quiz} </h1>
    <div id="inner">
        <h2> Question {position} </h2>
        {prompt}
        <br>
        {responses}
        <br>
        {arrows}
    </div>
</div>
</body>"#,
        quiz = ctx.quiz_number,
        position = ctx.position,
    )
}

/// 导航按钮，目标完全由位置推算
fn render_arrows(ctx: &PageCtx, view: PageView) -> String {
    let mut arrows = String::new();
    if let Some(target) = ctx.prev_target(view) {
        let _ = write!(
            arrows,
            r#"<div id="leftarrow" class="button"><a href="{}"><span>&larr;Prev</span></a></div>"#,
            target
        );
    }
    if let Some(target) = ctx.next_target(view) {
        let _ = write!(
            arrows,
            r#"<div id="rightarrow" class="button"><a href="{}"><span>Next&rarr;</span></a></div>"#,
            target
        );
    }
    arrows
}

fn render_prompt(ctx: &PageCtx, prompt: &[Fragment]) -> Result<String, RenderError> {
    let mut fragments = String::new();
    for fragment in prompt {
        let (hook, content) = render_fragment(ctx, fragment)?;
        let _ = write!(fragments, r#"<div class="{}">{}</div>"#, hook, content);
    }

    Ok(format!(
        r#"<h3><div id="question">
            {}
        </div></h3>"#,
        fragments
    ))
}

/// 选项列表：题目页不带正误类名，答案页带 `correct` / `incorrect`
fn render_responses(ctx: &PageCtx, responses: &[Response], view: PageView) -> Result<String, RenderError> {
    let mut items = String::new();
    for response in responses {
        let (hook, content) = render_fragment(ctx, &response.content)?;
        match view {
            PageView::Question => items.push_str("<li>"),
            PageView::Answer => {
                let _ = write!(items, r#"<li class="{}">"#, response.correctness.css_class());
            }
        }
        let _ = writeln!(items, r#"<span class="{}">{}</span></li>"#, hook, content);
    }

    Ok(format!(
        r#"<h3><div id="responses">
            <ol type="a">
                {}
            </ol>
        </div></h3>"#,
        items
    ))
}

/// 返回片段的样式类名与内容 HTML，未知类型报错而不是丢弃
fn render_fragment(ctx: &PageCtx, fragment: &Fragment) -> Result<(&'static str, String), RenderError> {
    let hook = fragment
        .content_type
        .style_hook()
        .ok_or_else(|| RenderError::UnknownContentType {
            position: ctx.position,
            content_type: fragment.content_type.to_string(),
        })?;

    let content = match &fragment.body {
        FragmentBody::Inline(text) => escape_html(text),
        FragmentBody::Code(block) => render_code_block(block),
    };

    Ok((hook, content))
}

/// 代码块：每行一个 `<code>`，由 CSS 计数器显示行号
///
/// 计数器在显示前自增，所以重置为起始行号减一
fn render_code_block(block: &CodeBlock) -> String {
    let mut html = format!(
        r#"<pre class="code" style="counter-reset: line {}">"#,
        block.start_line.saturating_sub(1)
    );
    for line in &block.lines {
        let _ = write!(html, "<code>{}\n</code>", escape_html(line));
    }
    html.push_str("</pre>");
    html
}
