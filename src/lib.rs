//! # Quiz HTML Generator
//!
//! 将固定格式的 XML 测验转换为一组可前后翻页的静态 HTML 页面
//!
//! ## 架构设计
//!
//! 单向数据流：源文档 → 测验模型 → 乱序 → 页面 → 文件
//!
//! ### ① 模型层（Models）
//! - `models/quiz` - 测验、题目、片段、选项
//! - `models/loaders` - XML → `Quiz`
//!
//! ### ② 能力层（Services）
//! - `Shuffler` - 选项与题目乱序
//! - `PageRenderer` - 生成题目页 / 答案页 HTML
//! - `PageWriter` - 写出页面、样式表与清单
//!
//! ### ③ 流程层（Workflow）
//! - `PageCtx` - 页面位置上下文，按位置推算文件名与导航链接
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/quiz_generator` - 串联各阶段，失败即终止

pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult, ConfigError, OutputError, ParseError, RenderError, ValidationError};
pub use models::{load_quiz, parse_quiz_str, Quiz};
pub use orchestrator::{App, GenerationStats};
pub use services::{PagePair, PageRenderer, PageWriter, RenderOptions, Shuffler};
pub use workflow::{page_file_name, PageCtx, PageView};
