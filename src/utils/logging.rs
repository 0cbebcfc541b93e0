//! 日志工具模块
//!
//! 提供日志初始化和输出的辅助函数

use crate::models::Quiz;
use std::path::Path;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// 初始化日志
///
/// 优先使用 `RUST_LOG`，否则按 `verbose` 选择 debug 或 info 级别；重复调用无副作用
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
pub fn log_startup(source: &Path, destination: &Path) {
    info!("{}", "=".repeat(60));
    info!("🚀 测验页面生成");
    info!("📄 源文件: {}", source.display());
    info!("📁 输出目录: {}", destination.display());
    info!("{}", "=".repeat(60));
}

/// 记录测验加载信息
pub fn log_quiz_loaded(quiz: &Quiz) {
    info!("✓ 第 {} 讲测验已加载，共 {} 题", quiz.number, quiz.questions.len());
    for (index, question) in quiz.questions.iter().enumerate() {
        let preview = question
            .prompt
            .first()
            .map(|f| truncate_text(&f.preview(), 40))
            .unwrap_or_default();
        debug!(
            "  第 {} 题: {} ({} 个选项)",
            index + 1,
            preview,
            question.responses.len()
        );
    }
}

/// 打印最终统计信息
///
/// # 参数
/// - `questions`: 题目数量
/// - `pages`: 写出的页面数量
/// - `destination`: 输出目录
pub fn print_final_stats(questions: usize, pages: usize, destination: &Path) {
    info!("\n{}", "=".repeat(60));
    info!("📊 生成完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 题目: {}", questions);
    info!("📝 页面: {}", pages);
    info!("{}", "=".repeat(60));
    info!("\n页面已保存至: {}", destination.display());
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
