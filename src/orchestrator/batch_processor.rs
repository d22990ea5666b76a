//! 批量记录处理器 - 编排层
//!
//! ## 职责
//!
//! 按输入顺序逐条处理记录，隔离单条失败，并向消费者按顺序发送进度与错误事件。
//!
//! ## 核心功能
//!
//! 1. **前置检查**：创建输出目录、验证模板可以打开（失败即整批终止）
//! 2. **顺序处理**：委托 `RecordFlow` 处理单条记录，不并行
//! 3. **失败隔离**：单条记录的任何错误只产生一个错误事件
//! 4. **进度上报**：每条记录结束后上报 `floor(100 * 已完成 / 总数)`
//! 5. **让步**：记录之间短暂暂停，让消费者的事件循环保持响应
//! 6. **统计**：返回成功/失败数量

use crate::config::{Config, ConversionMode};
use crate::error::{BatchError, ConversionError};
use crate::infrastructure::{CommandConverter, Converter, DocumentLoader, HtmlConverter};
use crate::models::Record;
use crate::services::IdentityTemplate;
use crate::workflow::{RecordCtx, RecordFlow};
use std::fs;
use std::time::Duration;
use tracing::{error, info};

/// 批次事件的接收方
///
/// 交互外壳（终端、窗口、日志）实现此接口接收事件；回调在后台工作线程上执行。
pub trait BatchListener: Send + Sync {
    /// 进度百分比，0–100，单调不减
    fn on_progress(&self, percent: u8);

    /// 单条记录失败，不中断批次
    fn on_error(&self, identity: &str, message: &str);
}

/// 处理统计
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub success: usize,
    pub failed: usize,
}

/// 批量记录处理器
pub struct BatchOrchestrator<L: DocumentLoader> {
    flow: RecordFlow<L>,
    identity: IdentityTemplate,
    record_pause: Duration,
}

impl<L: DocumentLoader> BatchOrchestrator<L> {
    pub fn new(flow: RecordFlow<L>, identity: IdentityTemplate) -> Self {
        Self {
            flow,
            identity,
            record_pause: Duration::ZERO,
        }
    }

    /// 按配置装配处理器
    pub fn from_config(config: &Config, loader: L) -> Result<Self, ConversionError> {
        let converter: Option<Box<dyn Converter>> = match config.conversion {
            ConversionMode::None => None,
            ConversionMode::Html => Some(Box::new(HtmlConverter)),
            ConversionMode::Command => Some(Box::new(CommandConverter::new(
                &config.convert_command,
                config.final_extension.clone(),
            )?)),
        };

        let flow = RecordFlow::new(loader, converter, &config.template_path, &config.output_dir)
            .with_verbose_logging(config.verbose_logging);
        let identity = IdentityTemplate::new(
            config.name_prefix.clone(),
            config.subject_field.clone(),
            config.period_field.clone(),
        );

        Ok(Self::new(flow, identity).with_record_pause(Duration::from_millis(config.record_pause_ms)))
    }

    pub fn with_record_pause(mut self, pause: Duration) -> Self {
        self.record_pause = pause;
        self
    }

    pub fn flow(&self) -> &RecordFlow<L> {
        &self.flow
    }

    /// 待生成的基础名称列表；缺少标识字段的记录以 `记录 #n` 表示
    pub fn plan(&self, records: &[Record]) -> Vec<String> {
        let total = records.len();
        records
            .iter()
            .enumerate()
            .map(|(idx, record)| {
                self.identity
                    .base_name(record)
                    .unwrap_or_else(|_| RecordCtx::anonymous(idx + 1, total).identity)
            })
            .collect()
    }

    /// 运行整个批次
    ///
    /// 记录为空时立即返回，不发送任何事件。只有输出目录或模板不可用会返回错误。
    pub fn run(
        &self,
        records: &[Record],
        listener: &dyn BatchListener,
    ) -> Result<BatchSummary, BatchError> {
        let total = records.len();
        let mut summary = BatchSummary {
            total,
            ..Default::default()
        };

        if total == 0 {
            return Ok(summary);
        }

        self.prepare()?;
        log_batch_start(total, self.flow.final_extension());

        for (idx, record) in records.iter().enumerate() {
            let record_index = idx + 1;

            match self.process_record(record, record_index, total) {
                Ok(()) => summary.success += 1,
                Err((identity, message)) => {
                    summary.failed += 1;
                    listener.on_error(&identity, &message);
                }
            }

            listener.on_progress(progress_percent(record_index, total));

            if record_index < total {
                self.pause();
            }
        }

        log_batch_complete(&summary);
        Ok(summary)
    }

    /// 输出目录与模板检查
    fn prepare(&self) -> Result<(), BatchError> {
        let output_dir = self.flow.output_dir();
        fs::create_dir_all(output_dir).map_err(|source| BatchError::OutputDir {
            path: output_dir.to_path_buf(),
            source,
        })?;

        let template_path = self.flow.template_path();
        self.flow
            .loader()
            .open(template_path)
            .map_err(|source| BatchError::TemplateLoad {
                path: template_path.to_path_buf(),
                source,
            })?;

        Ok(())
    }

    /// 处理单条记录；失败时返回 (标识, 错误信息)
    fn process_record(
        &self,
        record: &Record,
        record_index: usize,
        total: usize,
    ) -> Result<(), (String, String)> {
        let base_name = match self.identity.base_name(record) {
            Ok(name) => name,
            Err(e) => {
                let ctx = RecordCtx::anonymous(record_index, total);
                error!("{} ❌ {}", ctx, e);
                return Err((ctx.identity, e.to_string()));
            }
        };

        let ctx = RecordCtx::new(record_index, total, base_name.clone());
        info!("{} 🚀 开始生成", ctx);

        match self.flow.run(record, &base_name, &ctx) {
            Ok(outcome) => {
                info!("{} ✓ 已生成: {}", ctx, outcome.artifact.display());
                Ok(())
            }
            Err(e) => {
                error!("{} ❌ 生成失败: {}", ctx, e);
                Err((base_name, e.to_string()))
            }
        }
    }

    fn pause(&self) {
        if self.record_pause.is_zero() {
            std::thread::yield_now();
        } else {
            std::thread::sleep(self.record_pause);
        }
    }
}

/// `floor(100 * completed / total)`
pub fn progress_percent(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    (completed.min(total) * 100 / total) as u8
}

// ========== 日志辅助函数 ==========

fn log_batch_start(total: usize, extension: &str) {
    info!("{}", "=".repeat(60));
    info!("📦 开始生成 {} 份报告 (.{})", total, extension);
    info!("{}", "=".repeat(60));
}

fn log_batch_complete(summary: &BatchSummary) {
    info!("{}", "─".repeat(60));
    info!(
        "✓ 批次完成: 成功 {}/{}，失败 {}",
        summary.success, summary.total, summary.failed
    );
    info!("{}", "─".repeat(60));
}
