//! 测验数据模型
//!
//! 解析后构建一次，随后只被乱序器原地重排，渲染阶段只读

use crate::error::ValidationError;
use serde::Serialize;
use std::fmt;

/// 片段的内容类型
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum ContentType {
    /// 普通文本
    Text,
    /// LaTeX 公式，由 MathJax 渲染
    Formula,
    /// 代码，按行渲染并带行号
    Code,
    /// 无法识别的类型，保留原始标记以便报错
    Unrecognized(String),
}

impl ContentType {
    /// 从源文档中的 `texttype` 属性解析，永不失败
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim() {
            "text" => ContentType::Text,
            "formula" => ContentType::Formula,
            "code" => ContentType::Code,
            other => ContentType::Unrecognized(other.to_string()),
        }
    }

    /// 渲染时使用的 CSS 类名，未知类型返回 None
    pub fn style_hook(&self) -> Option<&'static str> {
        match self {
            ContentType::Text => Some("text"),
            ContentType::Formula => Some("formula"),
            ContentType::Code => Some("code"),
            ContentType::Unrecognized(_) => None,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, ContentType::Unrecognized(_))
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentType::Unrecognized(tag) => write!(f, "{}", tag),
            known => write!(f, "{}", known.style_hook().unwrap_or_default()),
        }
    }
}

/// 代码块：起始行号 + 原样保留的每一行
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeBlock {
    pub start_line: i64,
    pub lines: Vec<String>,
}

/// 片段内容
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum FragmentBody {
    /// 已去除首尾空白的文本
    Inline(String),
    Code(CodeBlock),
}

/// 题干或选项中的一个内容片段
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fragment {
    pub content_type: ContentType,
    pub body: FragmentBody,
}

impl Fragment {
    pub fn text(content: impl Into<String>) -> Self {
        Self::inline(ContentType::Text, content)
    }

    pub fn formula(content: impl Into<String>) -> Self {
        Self::inline(ContentType::Formula, content)
    }

    pub fn inline(content_type: ContentType, content: impl Into<String>) -> Self {
        Self {
            content_type,
            body: FragmentBody::Inline(content.into()),
        }
    }

    pub fn code(start_line: i64, lines: Vec<String>) -> Self {
        Self {
            content_type: ContentType::Code,
            body: FragmentBody::Code(CodeBlock { start_line, lines }),
        }
    }

    /// 片段的纯文本预览，仅用于日志
    pub fn preview(&self) -> String {
        match &self.body {
            FragmentBody::Inline(text) => text.clone(),
            FragmentBody::Code(block) => block.lines.join(" "),
        }
    }
}

/// 选项的正误
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Correctness {
    Correct,
    Incorrect,
}

impl Correctness {
    /// 解析 `correct` 属性，忽略大小写与首尾空白
    ///
    /// `Correct`、` INCORRECT ` 等写法都会被接受，输出时统一为小写类名，见 [`Correctness::css_class`]
    pub fn from_marker(marker: &str) -> Option<Self> {
        let marker = marker.trim();
        if marker.eq_ignore_ascii_case("correct") {
            Some(Correctness::Correct)
        } else if marker.eq_ignore_ascii_case("incorrect") {
            Some(Correctness::Incorrect)
        } else {
            None
        }
    }

    /// 答案页上使用的 CSS 类名
    ///
    /// 始终是小写的 `correct` 或 `incorrect`，不保留源文档中标记的原始大小写
    pub fn css_class(self) -> &'static str {
        match self {
            Correctness::Correct => "correct",
            Correctness::Incorrect => "incorrect",
        }
    }

    pub fn is_correct(self) -> bool {
        self == Correctness::Correct
    }
}

/// 选项
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Response {
    pub content: Fragment,
    pub correctness: Correctness,
}

impl Response {
    pub fn new(content: Fragment, correctness: Correctness) -> Self {
        Self {
            content,
            correctness,
        }
    }
}

/// 题目
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Question {
    pub prompt: Vec<Fragment>,
    pub responses: Vec<Response>,
}

impl Question {
    pub fn new(prompt: Vec<Fragment>, responses: Vec<Response>) -> Self {
        Self { prompt, responses }
    }

    /// 题干与选项中的所有片段
    pub fn fragments(&self) -> impl Iterator<Item = &Fragment> {
        self.prompt
            .iter()
            .chain(self.responses.iter().map(|r| &r.content))
    }
}

/// 测验
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Quiz {
    /// 测验编号（讲次）
    pub number: u32,
    pub questions: Vec<Question>,
}

impl Quiz {
    pub fn new(number: u32, questions: Vec<Question>) -> Self {
        Self { number, questions }
    }

    /// 语义校验：至少一道题，每题至少一个选项且至少一个正确选项，内容类型均可识别
    ///
    /// 错误中的题号从 1 开始，按源文档顺序计数
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.questions.is_empty() {
            return Err(ValidationError::NoQuestions);
        }

        for (index, question) in self.questions.iter().enumerate() {
            let question_no = index + 1;

            if let Some(unknown) = question
                .fragments()
                .find(|f| !f.content_type.is_recognized())
            {
                return Err(ValidationError::UnknownContentType {
                    question: question_no,
                    content_type: unknown.content_type.to_string(),
                });
            }

            if question.responses.is_empty() {
                return Err(ValidationError::NoResponses {
                    question: question_no,
                });
            }

            if !question.responses.iter().any(|r| r.correctness.is_correct()) {
                return Err(ValidationError::NoCorrectResponse {
                    question: question_no,
                });
            }
        }

        Ok(())
    }
}
