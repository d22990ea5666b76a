//! 错误记录服务 - 业务能力层
//!
//! 只负责把错误事件追加写入错误日志文件，不关心流程

use anyhow::Result;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// 错误记录服务
///
/// 职责：
/// - 将生成失败的记录写入错误日志
/// - 每次只写一条
/// - 不中断批次
pub struct ErrorWriter {
    error_file_path: PathBuf,
}

impl ErrorWriter {
    /// 使用默认文件名创建
    pub fn new() -> Self {
        Self::with_path("informe_errores.txt")
    }

    /// 使用自定义文件路径创建
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            error_file_path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.error_file_path
    }

    /// 追加一条错误
    ///
    /// # 参数
    /// - `identity`: 记录标识（基础名称）
    /// - `message`: 错误信息
    pub fn write(&self, identity: &str, message: &str) -> Result<()> {
        debug!("写入错误: {} | {}", identity, message);

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.error_file_path)?;

        let line = format!(
            "[{}] {} | {}\n",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            identity,
            message
        );

        file.write_all(line.as_bytes())?;

        Ok(())
    }
}

impl Default for ErrorWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_appends_lines() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ErrorWriter::with_path(dir.path().join("errores.txt"));

        writer.write("informe_Ana_5", "保存失败").unwrap();
        writer.write("informe_Luis_5", "转换失败").unwrap();

        let content = std::fs::read_to_string(writer.path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("informe_Ana_5 | 保存失败"));
        assert!(lines[1].ends_with("informe_Luis_5 | 转换失败"));
    }
}
