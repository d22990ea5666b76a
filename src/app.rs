//! 应用外壳
//!
//! 加载配置与记录、展示待生成列表、启动后台批次，并作为事件消费者：
//! 进度写入日志，错误事件写入日志与错误文件，批次结束后输出统计。

use crate::config::Config;
use crate::infrastructure::JsonDocumentLoader;
use crate::models::load_records;
use crate::orchestrator::{spawn_batch, BatchEvent, BatchOrchestrator, BatchSummary};
use crate::services::ErrorWriter;
use crate::utils::logging;
use anyhow::{Context, Result};
use tracing::{info, warn};

/// 应用主结构
pub struct App {
    config: Config,
    error_writer: ErrorWriter,
}

impl App {
    /// 初始化应用
    ///
    /// 运行日志文件由 `logging::init` 负责，应在此之前调用。
    pub fn initialize(config: Config) -> Result<Self> {
        logging::log_startup(
            &config.template_path.to_string_lossy(),
            &config.output_dir.to_string_lossy(),
        );

        let error_writer = ErrorWriter::with_path(&config.error_log_file);

        Ok(Self {
            config,
            error_writer,
        })
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<BatchSummary> {
        let records = load_records(&self.config.records_path)
            .await
            .with_context(|| format!("无法加载记录: {}", self.config.records_path.display()))?;

        if records.is_empty() {
            warn!("⚠️ 没有找到待生成的记录，程序结束");
            return Ok(BatchSummary::default());
        }

        let orchestrator = BatchOrchestrator::from_config(&self.config, JsonDocumentLoader)
            .context("转换器配置无效")?;
        logging::log_plan(&orchestrator.plan(&records));
        let extension = orchestrator.flow().final_extension().to_string();

        let mut handle = spawn_batch(orchestrator, records);
        while let Some(event) = handle.events.recv().await {
            self.on_event(event);
        }

        let summary = handle.finish().await?;

        logging::print_final_stats(
            &summary,
            &extension,
            &self.config.output_log_file,
            self.error_writer.path(),
        );
        if summary.failed == 0 {
            info!("🎉 全部报告已生成");
        } else {
            warn!(
                "⚠️ {} 份报告已生成，{} 份失败",
                summary.success, summary.failed
            );
        }

        Ok(summary)
    }

    fn on_event(&self, event: BatchEvent) {
        match event {
            BatchEvent::Progress(percent) => info!("📊 进度: {}%", percent),
            BatchEvent::Error { identity, message } => {
                warn!(
                    "⚠️ '{}' 生成失败: {}",
                    identity,
                    logging::one_line(&message, 200)
                );
                if let Err(e) = self.error_writer.write(&identity, &message) {
                    warn!("无法写入错误文件: {}", e);
                }
            }
        }
    }
}
