//! 测验生成器 - 编排层
//!
//! ## 职责
//!
//! 按顺序执行 解析 → 乱序 → 渲染 → 写出，任一阶段失败立即终止。
//!
//! ## 设计特点
//!
//! - **单线程顺序执行**：没有并发，也没有重试
//! - **向下委托**：解析交给 `models::loaders`，乱序、渲染、写出交给 `services`
//! - **只做调度和统计**

use crate::config::Config;
use crate::error::AppResult;
use crate::models::{load_quiz, Quiz};
use crate::services::{PageRenderer, PageWriter, RenderOptions, Shuffler, WriteReport};
use crate::utils::logging::{log_quiz_loaded, log_startup, print_final_stats};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// 生成统计
#[derive(Debug, Clone)]
pub struct GenerationStats {
    pub quiz_number: u32,
    pub questions: usize,
    pub report: WriteReport,
}

/// 应用主结构
pub struct App {
    config: Config,
    source: PathBuf,
    destination: PathBuf,
}

impl App {
    pub fn new(config: Config, source: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Self {
            config,
            source: source.into(),
            destination: destination.into(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// 运行完整流程
    pub fn run(&self) -> AppResult<GenerationStats> {
        log_startup(&self.source, &self.destination);

        info!("\n📖 正在解析测验...");
        let quiz = load_quiz(&self.source, self.config.strict_validation)?;
        if !self.config.strict_validation {
            warn!("⚠️ 已跳过语义校验");
        }
        log_quiz_loaded(&quiz);

        self.generate(quiz)
    }

    /// 对已加载的测验执行 乱序 → 渲染 → 写出
    pub fn generate(&self, mut quiz: Quiz) -> AppResult<GenerationStats> {
        match self.config.seed {
            Some(seed) => info!("🎲 使用随机种子 {} 乱序", seed),
            None => info!("🎲 随机乱序题目与选项"),
        }
        Shuffler::from_optional_seed(self.config.seed).shuffle(&mut quiz);

        info!("🖨️ 正在渲染 {} 道题目...", quiz.questions.len());
        let pairs = PageRenderer::new(self.render_options()).render_quiz(&quiz)?;

        let writer = PageWriter::new(
            &self.destination,
            &self.config.stylesheet_path,
            &self.config.manifest_file,
        );
        let report = writer.write_all(quiz.number, &pairs)?;

        print_final_stats(quiz.questions.len(), report.pages_written.len(), &self.destination);

        Ok(GenerationStats {
            quiz_number: quiz.number,
            questions: quiz.questions.len(),
            report,
        })
    }

    /// 页面中的样式表链接只用文件名，因为样式表会被复制到输出目录
    fn render_options(&self) -> RenderOptions {
        let stylesheet_href = Path::new(&self.config.stylesheet_path)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("style.css")
            .to_string();

        RenderOptions {
            course_title: self.config.course_title.clone(),
            stylesheet_href,
            file_prefix: self.config.file_prefix.clone(),
        }
    }
}
