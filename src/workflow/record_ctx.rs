//! 记录处理上下文
//!
//! 封装"我正在处理第几条记录、它叫什么"这一信息

use std::fmt::Display;

/// 记录处理上下文
#[derive(Debug, Clone)]
pub struct RecordCtx {
    /// 记录在批次中的序号（从1开始）
    pub record_index: usize,

    /// 批次记录总数（仅用于日志显示）
    pub total: usize,

    /// 记录标识：能算出基础名称时为基础名称，否则为 `记录 #n`
    pub identity: String,
}

impl RecordCtx {
    /// 创建新的记录上下文
    pub fn new(record_index: usize, total: usize, identity: impl Into<String>) -> Self {
        Self {
            record_index,
            total,
            identity: identity.into(),
        }
    }

    /// 无法得到基础名称时使用的标识
    pub fn anonymous(record_index: usize, total: usize) -> Self {
        Self::new(record_index, total, format!("记录 #{}", record_index))
    }
}

impl Display for RecordCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[记录 {}/{} {}]",
            self.record_index, self.total, self.identity
        )
    }
}
