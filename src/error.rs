use std::path::PathBuf;
use thiserror::Error;

/// 应用程序错误类型
///
/// 每个变体对应流水线的一个阶段，`Display` 会标明失败的阶段
#[derive(Debug, Error)]
pub enum AppError {
    /// 配置加载错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 解析阶段错误
    #[error("解析阶段失败: {0}")]
    Parse(#[from] ParseError),
    /// 渲染阶段错误
    #[error("渲染阶段失败: {0}")]
    Render(#[from] RenderError),
    /// 写出阶段错误
    #[error("写出阶段失败: {0}")]
    Output(#[from] OutputError),
}

/// 测验文档解析错误
#[derive(Debug, Error)]
pub enum ParseError {
    /// 读取源文件失败
    #[error("无法读取源文件 ({}): {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// XML 格式错误
    #[error("XML 格式错误: {0}")]
    Xml(#[from] quick_xml::Error),
    /// 文档中没有任何元素
    #[error("源文档中没有任何 XML 元素")]
    EmptyDocument,
    /// 文档结束时仍有元素未闭合
    #[error("文档提前结束，<{element}> 未闭合")]
    UnclosedElement { element: String },
    /// 根元素不是 quiz
    #[error("根元素应为 <quiz>，实际为 <{found}>")]
    UnexpectedRoot { found: String },
    /// 缺少必需属性
    #[error("<{element}> 缺少必需属性 `{attribute}`")]
    MissingAttribute {
        element: String,
        attribute: &'static str,
    },
    /// 数值属性无法解析
    #[error("<{element}> 的属性 `{attribute}` 不是合法数字: '{value}'")]
    InvalidNumber {
        element: String,
        attribute: &'static str,
        value: String,
    },
    /// 代码类型的片段没有 `<code>` 行，但自身带有文本
    #[error("<{element}> 声明为代码类型，但文本没有放在 <code> 行中")]
    MissingCodeLines { element: String },
    /// 正误标记既不是 correct 也不是 incorrect
    #[error("无法识别的正误标记: '{value}'（应为 correct 或 incorrect）")]
    InvalidCorrectness { value: String },
    /// 语义校验失败
    #[error("测验内容校验失败: {0}")]
    Invalid(#[from] ValidationError),
}

impl From<quick_xml::events::attributes::AttrError> for ParseError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        ParseError::Xml(err.into())
    }
}

/// 测验内容语义校验错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// 测验没有任何题目
    #[error("测验中没有任何题目")]
    NoQuestions,
    /// 题目没有选项
    #[error("第 {question} 题没有任何选项")]
    NoResponses { question: usize },
    /// 题目没有正确选项
    #[error("第 {question} 题没有标记为 correct 的选项")]
    NoCorrectResponse { question: usize },
    /// 未知的内容类型
    #[error("第 {question} 题包含未知的内容类型 '{content_type}'")]
    UnknownContentType {
        question: usize,
        content_type: String,
    },
}

/// 页面渲染错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderError {
    /// 片段的内容类型无法识别
    #[error("第 {position} 题包含无法渲染的内容类型 '{content_type}'")]
    UnknownContentType {
        position: usize,
        content_type: String,
    },
}

/// 输出写入错误
#[derive(Debug, Error)]
pub enum OutputError {
    /// 样式表不存在
    #[error("样式表不存在: {}", .path.display())]
    StylesheetMissing { path: PathBuf },
    /// 无法创建输出目录
    #[error("无法创建输出目录 ({}): {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// 写入页面失败
    #[error("写入文件失败 ({}): {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// 复制样式表失败
    #[error("复制样式表失败 ({}): {source}", .path.display())]
    CopyStylesheet {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// 写入清单失败
    #[error("写入清单失败 ({}): {source}", .path.display())]
    Manifest {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 读取配置文件失败
    #[error("无法读取配置文件 ({}): {source}", .path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({}): {source}", .path.display())]
    TomlParseFailed {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
