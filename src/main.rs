use anyhow::{Context, Result};
use clap::Parser;
use quiz_html_generator::cli::Cli;
use quiz_html_generator::utils::logging;
use quiz_html_generator::{App, Config};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // 加载配置
    let mut config = Config::load(cli.config.as_deref()).context("加载配置失败")?;
    cli.apply_to(&mut config);

    // 初始化日志
    logging::init(config.verbose_logging);

    // 运行
    let app = App::new(config, &cli.source, &cli.destination);
    app.run()
        .with_context(|| format!("生成测验页面失败: {}", cli.source.display()))?;

    Ok(())
}
