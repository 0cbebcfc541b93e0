//! 页面写出服务
//!
//! 只负责"把渲染好的页面落盘"：写页面、复制样式表、最后写清单，
//! 并清理同一讲次旧输出中多出来的页面

use crate::error::OutputError;
use crate::services::page_renderer::PagePair;
use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// 写出的清单内容
#[derive(Debug, Serialize)]
struct Manifest<'a> {
    quiz_number: u32,
    generated_at: String,
    stylesheet: &'a str,
    pages: Vec<ManifestEntry<'a>>,
}

#[derive(Debug, Serialize)]
struct ManifestEntry<'a> {
    position: usize,
    question: &'a str,
    answer: &'a str,
}

/// 写出结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteReport {
    /// 写出的页面文件
    pub pages_written: Vec<PathBuf>,
    /// 输出目录中的样式表
    pub stylesheet: PathBuf,
    /// 清单文件
    pub manifest: PathBuf,
    /// 删除的旧页面（同一讲次、不在本次页面集合中）
    pub stale_removed: Vec<PathBuf>,
}

/// 页面写出器
///
/// 职责：
/// - 创建输出目录
/// - 写入每道题的题目页和答案页
/// - 复制样式表
/// - 全部成功后写入清单，清单存在即代表输出完整
/// - 删除此前运行遗留的、题号超出本次范围的页面
pub struct PageWriter {
    destination: PathBuf,
    stylesheet: PathBuf,
    manifest_name: String,
}

impl PageWriter {
    pub fn new(
        destination: impl Into<PathBuf>,
        stylesheet: impl Into<PathBuf>,
        manifest_name: impl Into<String>,
    ) -> Self {
        Self {
            destination: destination.into(),
            stylesheet: stylesheet.into(),
            manifest_name: manifest_name.into(),
        }
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// 写出全部页面
    ///
    /// 任一步失败都会删除本次已写出的页面并返回错误，不会留下看似完整的输出
    pub fn write_all(&self, quiz_number: u32, pairs: &[PagePair]) -> Result<WriteReport, OutputError> {
        if !self.stylesheet.is_file() {
            return Err(OutputError::StylesheetMissing {
                path: self.stylesheet.clone(),
            });
        }

        fs::create_dir_all(&self.destination).map_err(|source| OutputError::CreateDir {
            path: self.destination.clone(),
            source,
        })?;

        let manifest_path = self.destination.join(&self.manifest_name);
        if manifest_path.exists() {
            debug!("删除旧清单: {}", manifest_path.display());
            fs::remove_file(&manifest_path).map_err(|source| OutputError::Write {
                path: manifest_path.clone(),
                source,
            })?;
        }

        let mut written = Vec::with_capacity(pairs.len() * 2);
        if let Err(e) = self.write_pages(pairs, &mut written) {
            self.remove_written(&written);
            return Err(e);
        }

        let stylesheet = match self.copy_stylesheet() {
            Ok(path) => path,
            Err(e) => {
                self.remove_written(&written);
                return Err(e);
            }
        };

        if let Err(e) = self.write_manifest(&manifest_path, quiz_number, pairs) {
            self.remove_written(&written);
            return Err(e);
        }

        let stale_removed = self.remove_stale_pages(pairs);

        info!(
            "✓ 已写出 {} 个页面到 {}",
            written.len(),
            self.destination.display()
        );

        Ok(WriteReport {
            pages_written: written,
            stylesheet,
            manifest: manifest_path,
            stale_removed,
        })
    }

    /// 删除输出目录中与本次页面同前缀（文件前缀 + 讲次）但不在本次集合中的页面
    ///
    /// 只在全部写出成功后调用；删除失败只记录警告
    fn remove_stale_pages(&self, pairs: &[PagePair]) -> Vec<PathBuf> {
        let Some(stem) = pairs.first().and_then(|pair| page_stem(&pair.question.file_name)) else {
            return Vec::new();
        };
        let current: HashSet<&str> = pairs
            .iter()
            .flat_map(|pair| [pair.question.file_name.as_str(), pair.answer.file_name.as_str()])
            .collect();

        let entries = match fs::read_dir(&self.destination) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("无法扫描输出目录 {}: {}", self.destination.display(), e);
                return Vec::new();
            }
        };

        let mut removed = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
                continue;
            };
            if current.contains(name) || !is_page_of(name, stem) || !path.is_file() {
                continue;
            }

            match fs::remove_file(&path) {
                Ok(()) => {
                    warn!("🧹 删除旧页面: {}", path.display());
                    removed.push(path);
                }
                Err(e) => warn!("⚠️ 旧页面删除失败 {}: {}", path.display(), e),
            }
        }

        removed.sort();
        removed
    }

    fn write_pages(&self, pairs: &[PagePair], written: &mut Vec<PathBuf>) -> Result<(), OutputError> {
        for page in pairs.iter().flat_map(|pair| pair.pages()) {
            let path = self.destination.join(&page.file_name);
            fs::write(&path, &page.html).map_err(|source| OutputError::Write {
                path: path.clone(),
                source,
            })?;
            debug!("写入页面: {}", path.display());
            written.push(path);
        }
        Ok(())
    }

    fn copy_stylesheet(&self) -> Result<PathBuf, OutputError> {
        let file_name = self
            .stylesheet
            .file_name()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("style.css"));
        let target = self.destination.join(file_name);

        // 样式表已在输出目录中时不能自我复制，否则会被截断
        if let (Ok(from), Ok(to)) = (self.stylesheet.canonicalize(), target.canonicalize()) {
            if from == to {
                return Ok(target);
            }
        }

        fs::copy(&self.stylesheet, &target).map_err(|source| OutputError::CopyStylesheet {
            path: self.stylesheet.clone(),
            source,
        })?;
        debug!("复制样式表: {} -> {}", self.stylesheet.display(), target.display());

        Ok(target)
    }

    fn write_manifest(&self, path: &Path, quiz_number: u32, pairs: &[PagePair]) -> Result<(), OutputError> {
        let stylesheet = self
            .stylesheet
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("style.css");

        let manifest = Manifest {
            quiz_number,
            generated_at: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            stylesheet,
            pages: pairs
                .iter()
                .map(|pair| ManifestEntry {
                    position: pair.position,
                    question: &pair.question.file_name,
                    answer: &pair.answer.file_name,
                })
                .collect(),
        };

        let json = serde_json::to_string_pretty(&manifest).map_err(|e| OutputError::Manifest {
            path: path.to_path_buf(),
            source: Box::new(e),
        })?;

        fs::write(path, json).map_err(|e| OutputError::Manifest {
            path: path.to_path_buf(),
            source: Box::new(e),
        })
    }

    /// 尽力删除本次写出的文件
    fn remove_written(&self, written: &[PathBuf]) {
        for path in written {
            if let Err(e) = fs::remove_file(path) {
                warn!("清理文件失败 {}: {}", path.display(), e);
            }
        }
    }
}

/// 页面文件名中题号之前的部分，例如 `lecture03_question`
fn page_stem(file_name: &str) -> Option<&str> {
    const MARKER: &str = "_question";
    file_name
        .rfind(MARKER)
        .map(|index| &file_name[..index + MARKER.len()])
}

/// `name` 是否形如 `{stem}NN_q.html` 或 `{stem}NN_a.html`
fn is_page_of(name: &str, stem: &str) -> bool {
    let Some(rest) = name.strip_prefix(stem) else {
        return false;
    };
    let Some(digits) = rest
        .strip_suffix("_q.html")
        .or_else(|| rest.strip_suffix("_a.html"))
    else {
        return false;
    };
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::page_renderer::RenderedPage;

    fn pair(position: usize) -> PagePair {
        PagePair {
            position,
            question: RenderedPage {
                file_name: format!("lecture01_question{:02}_q.html", position),
                html: format!("<p>question {}</p>", position),
            },
            answer: RenderedPage {
                file_name: format!("lecture01_question{:02}_a.html", position),
                html: format!("<p>answer {}</p>", position),
            },
        }
    }

    fn stylesheet_in(dir: &Path) -> PathBuf {
        let path = dir.join("style.css");
        fs::write(&path, "body { margin: 0; }").unwrap();
        path
    }

    #[test]
    fn test_write_all_creates_everything() {
        let source = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let destination = out.path().join("nested").join("quiz");
        let writer = PageWriter::new(&destination, stylesheet_in(source.path()), "manifest.json");

        let report = writer.write_all(1, &[pair(1), pair(2)]).unwrap();

        assert_eq!(report.pages_written.len(), 4);
        assert_eq!(
            fs::read_to_string(destination.join("lecture01_question02_a.html")).unwrap(),
            "<p>answer 2</p>"
        );
        assert_eq!(report.stylesheet, destination.join("style.css"));
        assert!(report.stylesheet.is_file());

        let manifest: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&report.manifest).unwrap()).unwrap();
        assert_eq!(manifest["quiz_number"], 1);
        assert_eq!(manifest["pages"].as_array().unwrap().len(), 2);
        assert_eq!(manifest["pages"][0]["question"], "lecture01_question01_q.html");
    }

    #[test]
    fn test_missing_stylesheet_writes_nothing() {
        let out = tempfile::tempdir().unwrap();
        let destination = out.path().join("quiz");
        let writer = PageWriter::new(&destination, out.path().join("missing.css"), "manifest.json");

        let err = writer.write_all(1, &[pair(1)]).unwrap_err();

        assert!(matches!(err, OutputError::StylesheetMissing { .. }));
        assert!(!destination.exists());
    }

    #[test]
    fn test_failed_write_removes_partial_output() {
        let source = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let destination = out.path().to_path_buf();
        // 第二题的题目页路径被一个目录占据，写入必然失败
        fs::create_dir(destination.join("lecture01_question02_q.html")).unwrap();
        let writer = PageWriter::new(&destination, stylesheet_in(source.path()), "manifest.json");

        let err = writer.write_all(1, &[pair(1), pair(2)]).unwrap_err();

        assert!(matches!(err, OutputError::Write { .. }));
        assert!(!destination.join("lecture01_question01_q.html").exists());
        assert!(!destination.join("lecture01_question01_a.html").exists());
        assert!(!destination.join("manifest.json").exists());
    }

    #[test]
    fn test_stale_manifest_is_replaced() {
        let source = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        fs::write(out.path().join("manifest.json"), "stale").unwrap();
        let writer = PageWriter::new(out.path(), stylesheet_in(source.path()), "manifest.json");

        let report = writer.write_all(4, &[pair(1)]).unwrap();

        let content = fs::read_to_string(report.manifest).unwrap();
        assert!(content.contains("\"quiz_number\": 4"));
    }

    #[test]
    fn test_rerun_with_fewer_questions_removes_old_pages() {
        let source = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let writer = PageWriter::new(out.path(), stylesheet_in(source.path()), "manifest.json");
        writer.write_all(1, &[pair(1), pair(2), pair(3)]).unwrap();
        // 其它讲次和无关文件不受影响
        fs::write(out.path().join("lecture02_question02_q.html"), "other").unwrap();
        fs::write(out.path().join("lecture01_question02_notes.html"), "notes").unwrap();

        let report = writer.write_all(1, &[pair(1)]).unwrap();

        assert_eq!(
            report.stale_removed,
            vec![
                out.path().join("lecture01_question02_a.html"),
                out.path().join("lecture01_question02_q.html"),
                out.path().join("lecture01_question03_a.html"),
                out.path().join("lecture01_question03_q.html"),
            ]
        );
        assert!(out.path().join("lecture01_question01_q.html").is_file());
        assert!(out.path().join("lecture01_question01_a.html").is_file());
        assert!(out.path().join("lecture02_question02_q.html").is_file());
        assert!(out.path().join("lecture01_question02_notes.html").is_file());
    }

    #[test]
    fn test_stale_page_matching() {
        assert_eq!(page_stem("lecture03_question01_q.html"), Some("lecture03_question"));
        assert!(is_page_of("lecture03_question12_a.html", "lecture03_question"));
        assert!(!is_page_of("lecture03_question_a.html", "lecture03_question"));
        assert!(!is_page_of("lecture03_question12_a.htm", "lecture03_question"));
        assert!(!is_page_of("lecture13_question01_q.html", "lecture03_question"));
    }
}
