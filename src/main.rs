use anyhow::Result;
use informe_generator::utils::logging;
use informe_generator::{App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置
    let config = Config::load()?;

    // 初始化日志（控制台 + 运行日志文件）
    let _log_guard = logging::init(config.verbose_logging, &config.output_log_file)?;

    // 初始化并运行应用
    let _summary = App::initialize(config)?.run().await?;

    Ok(())
}
