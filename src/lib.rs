//! # Informe Generator
//!
//! 按模板批量生成个性化报告：把每条记录的字段值填入模板中的 `[字段名]`
//! 占位符，可选地再转换为最终分发格式。
//!
//! ## 架构设计
//!
//! 本系统采用四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 文档存取与格式转换，只暴露能力
//! - `DocumentLoader` / `TemplateDocument` - 文档接口，`JsonDocumentLoader` 为其实现
//! - `Converter` - 转换边界，`HtmlConverter` / `CommandConverter`
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单条记录
//! - `FieldDeriver` - 一周时数合计
//! - `NameResolver` - 不覆盖已有文件的输出名称
//! - `TemplateSubstitutor` - 占位符替换
//! - `ErrorWriter` - 写错误日志
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一条记录"的完整处理流程
//! - `RecordCtx` - 上下文封装（序号 + 标识）
//! - `RecordFlow` - 流程编排（derive → resolve → fill → save → convert → cleanup）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 顺序批处理、失败隔离、进度与错误事件
//! - `orchestrator/worker` - 后台线程运行批次，通过通道把事件交给消费者

pub mod app;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use app::App;
pub use config::{Config, ConversionMode};
pub use error::{BatchError, ConversionError, DocumentError, RecordError};
pub use infrastructure::{Converter, DocumentLoader, JsonDocumentLoader, TemplateDocument};
pub use models::Record;
pub use orchestrator::{spawn_batch, BatchEvent, BatchListener, BatchOrchestrator, BatchSummary};
pub use workflow::{RecordCtx, RecordFlow, RecordOutcome};
