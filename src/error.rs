//! 错误类型
//!
//! 按关注点划分：
//! - `DocumentError`：模板/文档的读取、解析、写入
//! - `ConversionError`：格式转换边界
//! - `RecordError`：单条记录失败（被编排层捕获并上报，不中断批次）
//! - `BatchError`：整批致命错误（模板无法加载、输出目录不可用）
//! - `ConfigError`：配置文件错误

use std::path::PathBuf;
use thiserror::Error;

/// 文档模型错误
#[derive(Debug, Error)]
pub enum DocumentError {
    /// 文件不存在
    #[error("文件不存在: {}", path.display())]
    NotFound { path: PathBuf },

    /// 读取失败
    #[error("读取文件失败 ({}): {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// 文档结构无法解析
    #[error("文档解析失败 ({}): {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// 序列化失败
    #[error("文档序列化失败: {0}")]
    Serialize(#[source] serde_json::Error),

    /// 写入失败
    #[error("写入文件失败 ({}): {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// 格式转换错误
#[derive(Debug, Error)]
pub enum ConversionError {
    /// 无法启动外部转换程序
    #[error("无法启动转换程序 {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// 外部程序返回非零状态
    #[error("转换程序 {program} 退出码 {code}")]
    Exit { program: String, code: i32 },

    /// 转换结束但目标文件不存在
    #[error("转换完成但未找到输出文件: {}", path.display())]
    MissingOutput { path: PathBuf },

    /// 转换命令为空
    #[error("未配置转换命令")]
    EmptyCommand,

    /// 内置渲染器读取中间文件失败
    #[error("无法读取中间文件: {0}")]
    Source(#[source] DocumentError),

    /// 内置渲染器写出失败
    #[error("写入输出文件失败 ({}): {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// 单条记录处理失败
///
/// 只影响当前记录，由编排层转为错误事件后继续下一条。
#[derive(Debug, Error)]
pub enum RecordError {
    /// 缺少构成输出名称的标识字段
    #[error("记录缺少标识字段 '{field}'")]
    MissingIdentity { field: String },

    /// 为本条记录重新打开模板失败
    #[error("无法打开模板: {0}")]
    TemplateOpen(#[source] DocumentError),

    /// 替换占位符失败
    #[error("占位符替换失败: {0}")]
    Substitution(#[source] DocumentError),

    /// 保存中间文件失败
    #[error("保存失败: {0}")]
    Save(#[source] DocumentError),

    /// 转换失败
    #[error("转换失败: {0}")]
    Conversion(#[source] ConversionError),

    /// 删除中间文件失败
    #[error("删除中间文件失败 ({}): {source}", path.display())]
    Cleanup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// 整批致命错误
#[derive(Debug, Error)]
pub enum BatchError {
    /// 模板缺失或损坏，任何记录都无法继续
    #[error("模板加载失败 ({}): {source}", path.display())]
    TemplateLoad {
        path: PathBuf,
        #[source]
        source: DocumentError,
    },

    /// 输出目录无法创建
    #[error("无法创建输出目录 ({}): {source}", path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// 后台任务异常结束
    #[error("后台任务异常结束: {0}")]
    Worker(String),
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 读取配置文件失败
    #[error("读取配置文件失败 ({}): {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// TOML 解析失败
    #[error("配置文件解析失败 ({}): {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// 记录级结果类型
pub type RecordResult<T> = Result<T, RecordError>;
