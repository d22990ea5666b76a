//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责批量处理和调度，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `batch_processor` - 批量记录处理器
//! - 按输入顺序遍历记录（`&[Record]`）
//! - 创建输出目录、验证模板
//! - 隔离单条失败，发送进度与错误事件
//! - 汇总成功/失败统计
//!
//! ### `worker` - 后台任务
//! - 把批次放到后台线程运行
//! - 通过通道把事件交给消费者
//!
//! ## 层次关系
//!
//! ```text
//! worker (后台线程 + 事件通道)
//!     ↓
//! batch_processor (处理 Vec<Record>)
//!     ↓
//! workflow::RecordFlow (处理单条 Record)
//!     ↓
//! services (能力层：derive / resolve / substitute)
//!     ↓
//! infrastructure (基础设施：文档存取、格式转换)
//! ```

pub mod batch_processor;
pub mod worker;

// 重新导出主要类型
pub use batch_processor::{progress_percent, BatchListener, BatchOrchestrator, BatchSummary};
pub use worker::{spawn_batch, BatchEvent, BatchHandle, ChannelListener};
