use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Generate navigable HTML quiz pages from an XML quiz", long_about = None)]
pub struct Cli {
    /// The source XML file containing the quiz
    #[arg(short, long)]
    pub source: PathBuf,
    /// The destination directory for the generated HTML files
    #[arg(short, long)]
    pub destination: PathBuf,
    /// Stylesheet copied next to the generated pages
    #[arg(long)]
    pub stylesheet: Option<String>,
    /// Optional TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Seed for a reproducible question and response order
    #[arg(long)]
    pub seed: Option<u64>,
    /// File name prefix for generated pages
    #[arg(long)]
    pub prefix: Option<String>,
    /// Skip checking that every question has a correct response
    #[arg(long)]
    pub no_validate: bool,
    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// 命令行参数优先级最高，覆盖配置文件与环境变量
    pub fn apply_to(&self, config: &mut crate::config::Config) {
        if let Some(stylesheet) = &self.stylesheet {
            config.stylesheet_path = stylesheet.clone();
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(prefix) = &self.prefix {
            config.file_prefix = prefix.clone();
        }
        if self.no_validate {
            config.strict_validation = false;
        }
        if self.verbose {
            config.verbose_logging = true;
        }
    }
}
