use crate::error::ConfigError;
use serde::Deserialize;
use std::path::Path;

/// 程序配置
///
/// 加载顺序：默认值 → TOML 配置文件 → 环境变量 → 命令行参数
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 样式表路径（会被复制到输出目录）
    pub stylesheet_path: String,
    /// 页面文件名前缀
    pub file_prefix: String,
    /// 页面标题中的课程名
    pub course_title: String,
    /// 随机种子，未设置时使用系统熵
    pub seed: Option<u64>,
    /// 是否在解析后进行语义校验
    pub strict_validation: bool,
    /// 清单文件名，最后写出，标志输出完整
    pub manifest_file: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            stylesheet_path: "style.css".to_string(),
            file_prefix: "lecture".to_string(),
            course_title: "RPI CS1".to_string(),
            seed: None,
            strict_validation: true,
            manifest_file: "manifest.json".to_string(),
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 读取 TOML 配置文件，缺省字段使用默认值
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|source| ConfigError::TomlParseFailed {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// 从默认值与环境变量构建配置
    pub fn from_env() -> Self {
        Self::default().with_env()
    }

    /// 加载配置：可选的配置文件，再叠加环境变量
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let base = match config_file {
            Some(path) => Self::from_toml_file(path)?,
            None => Self::default(),
        };
        Ok(base.with_env())
    }

    /// 用环境变量覆盖已有配置，无法解析的值会被忽略
    pub fn with_env(self) -> Self {
        Self {
            stylesheet_path: std::env::var("QUIZ_STYLESHEET").unwrap_or(self.stylesheet_path),
            file_prefix: std::env::var("QUIZ_FILE_PREFIX").unwrap_or(self.file_prefix),
            course_title: std::env::var("QUIZ_COURSE_TITLE").unwrap_or(self.course_title),
            seed: std::env::var("QUIZ_SEED").ok().and_then(|v| v.parse().ok()).or(self.seed),
            strict_validation: std::env::var("QUIZ_STRICT").ok().and_then(|v| v.parse().ok()).unwrap_or(self.strict_validation),
            manifest_file: std::env::var("QUIZ_MANIFEST").unwrap_or(self.manifest_file),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(self.verbose_logging),
        }
    }
}
