//! 页面上下文
//!
//! 封装"第几讲的第几题，共几题"这一信息，所有跨页链接都由位置推算

use std::fmt::Display;

/// 页面版本
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageView {
    /// 题目页，不显示正误
    Question,
    /// 答案页，选项带正误样式
    Answer,
}

impl PageView {
    /// 文件名后缀
    pub fn suffix(self) -> &'static str {
        match self {
            PageView::Question => "q",
            PageView::Answer => "a",
        }
    }
}

/// 生成页面文件名：`{prefix}{quiz:02}_question{position:02}_{q|a}.html`
///
/// 渲染器的链接与写出器的文件名都经过这里，保证两者一致
pub fn page_file_name(prefix: &str, quiz_number: u32, position: usize, view: PageView) -> String {
    format!(
        "{}{:02}_question{:02}_{}.html",
        prefix,
        quiz_number,
        position,
        view.suffix()
    )
}

/// 单个题目页面的上下文
#[derive(Debug, Clone)]
pub struct PageCtx {
    /// 测验编号（讲次）
    pub quiz_number: u32,

    /// 题目在最终顺序中的位置（从1开始）
    pub position: usize,

    /// 题目总数
    pub total: usize,

    /// 文件名前缀
    pub file_prefix: String,
}

impl PageCtx {
    /// 创建新的页面上下文
    pub fn new(quiz_number: u32, position: usize, total: usize, file_prefix: impl Into<String>) -> Self {
        Self {
            quiz_number,
            position,
            total,
            file_prefix: file_prefix.into(),
        }
    }

    pub fn is_first(&self) -> bool {
        self.position <= 1
    }

    pub fn is_last(&self) -> bool {
        self.position >= self.total
    }

    /// 本题指定版本的文件名
    pub fn file_name(&self, view: PageView) -> String {
        self.file_name_at(self.position, view)
    }

    fn file_name_at(&self, position: usize, view: PageView) -> String {
        page_file_name(&self.file_prefix, self.quiz_number, position, view)
    }

    /// "Prev" 按钮的目标
    ///
    /// - 题目页：上一题的答案页，第一题没有
    /// - 答案页：本题的题目页
    pub fn prev_target(&self, view: PageView) -> Option<String> {
        match view {
            PageView::Question if self.is_first() => None,
            PageView::Question => Some(self.file_name_at(self.position - 1, PageView::Answer)),
            PageView::Answer => Some(self.file_name_at(self.position, PageView::Question)),
        }
    }

    /// "Next" 按钮的目标
    ///
    /// - 题目页：本题的答案页
    /// - 答案页：下一题的题目页，最后一题没有
    pub fn next_target(&self, view: PageView) -> Option<String> {
        match view {
            PageView::Question => Some(self.file_name_at(self.position, PageView::Answer)),
            PageView::Answer if self.is_last() => None,
            PageView::Answer => Some(self.file_name_at(self.position + 1, PageView::Question)),
        }
    }
}

impl Display for PageCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[讲次 #{} 题目 {}/{}]",
            self.quiz_number, self.position, self.total
        )
    }
}
