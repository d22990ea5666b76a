//! 后台批次任务
//!
//! 批次在独立的阻塞线程上顺序运行，消费者只通过通道接收事件，
//! 因此终端/窗口的事件循环在整个批次期间保持响应。批次一旦开始就会跑完。

use crate::error::BatchError;
use crate::infrastructure::DocumentLoader;
use crate::models::Record;
use crate::orchestrator::batch_processor::{BatchListener, BatchOrchestrator, BatchSummary};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

/// 发送给消费者的事件
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchEvent {
    Progress(u8),
    Error { identity: String, message: String },
}

/// 把回调转成通道消息的监听器
pub struct ChannelListener {
    tx: UnboundedSender<BatchEvent>,
}

impl ChannelListener {
    pub fn new(tx: UnboundedSender<BatchEvent>) -> Self {
        Self { tx }
    }
}

impl BatchListener for ChannelListener {
    fn on_progress(&self, percent: u8) {
        // 接收方已关闭时丢弃事件，批次照常跑完
        let _ = self.tx.send(BatchEvent::Progress(percent));
    }

    fn on_error(&self, identity: &str, message: &str) {
        let _ = self.tx.send(BatchEvent::Error {
            identity: identity.to_string(),
            message: message.to_string(),
        });
    }
}

/// 运行中的批次
pub struct BatchHandle {
    /// 事件流；批次结束后通道关闭
    pub events: UnboundedReceiver<BatchEvent>,
    join: JoinHandle<Result<BatchSummary, BatchError>>,
}

impl BatchHandle {
    /// 等待批次结束并取得统计
    pub async fn finish(self) -> Result<BatchSummary, BatchError> {
        self.join
            .await
            .map_err(|e| BatchError::Worker(e.to_string()))?
    }
}

/// 在后台线程启动批次
pub fn spawn_batch<L>(orchestrator: BatchOrchestrator<L>, records: Vec<Record>) -> BatchHandle
where
    L: DocumentLoader + 'static,
{
    let (tx, rx) = unbounded_channel();
    let join = tokio::task::spawn_blocking(move || {
        let listener = ChannelListener::new(tx);
        orchestrator.run(&records, &listener)
    });

    BatchHandle { events: rx, join }
}
