//! 编排层（Orchestration Layer）
//!
//! ## 层次关系
//!
//! ```text
//! quiz_generator (解析 → 乱序 → 渲染 → 写出)
//!     ↓
//! models::loaders (XML → Quiz)
//!     ↓
//! services (能力层：shuffler / page_renderer / page_writer)
//!     ↓
//! workflow::PageCtx (按位置推算文件名与导航)
//! ```
//!
//! ## 设计原则
//!
//! 1. **单向数据流**：源文档 → 模型 → 乱序后的模型 → 页面 → 文件
//! 2. **失败即终止**：不存在部分成功
//! 3. **无业务逻辑**：只做调度和统计

pub mod quiz_generator;

pub use quiz_generator::{App, GenerationStats};
