//! 输出命名服务 - 业务能力层
//!
//! 负责两件事：由记录的标识字段拼出基础名称，以及在输出目录中为它
//! 找到一个不会覆盖已有文件的名称（`_v2`、`_v3`……）。

use crate::error::RecordError;
use crate::models::Record;
use std::path::Path;

/// 基础名称的组成：`{prefix}_{subject}_{period}`
#[derive(Debug, Clone)]
pub struct IdentityTemplate {
    prefix: String,
    subject_field: String,
    period_field: String,
}

impl IdentityTemplate {
    pub fn new(
        prefix: impl Into<String>,
        subject_field: impl Into<String>,
        period_field: impl Into<String>,
    ) -> Self {
        Self {
            prefix: prefix.into(),
            subject_field: subject_field.into(),
            period_field: period_field.into(),
        }
    }

    /// 由记录生成基础名称
    pub fn base_name(&self, record: &Record) -> Result<String, RecordError> {
        let subject = self.identity_value(record, &self.subject_field)?;
        let period = self.identity_value(record, &self.period_field)?;
        Ok(format!("{}_{}_{}", self.prefix, subject, period))
    }

    fn identity_value(&self, record: &Record, field: &str) -> Result<String, RecordError> {
        record
            .get_text(field)
            .map(|value| sanitize_component(&value))
            .ok_or_else(|| RecordError::MissingIdentity {
                field: field.to_string(),
            })
    }
}

impl Default for IdentityTemplate {
    fn default() -> Self {
        Self::new("informe", "estudiante", "numero_semana")
    }
}

/// 替换文件名中不允许出现的字符，保留大小写与空格
pub fn sanitize_component(value: &str) -> String {
    value
        .trim()
        .chars()
        .map(|ch| match ch {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

/// 输出名称去重
///
/// 检查与使用之间不是原子的：同一目录只能有一个批次在运行。
#[derive(Debug, Clone, Copy, Default)]
pub struct NameResolver;

impl NameResolver {
    /// 以单一扩展名检查冲突
    pub fn resolve(base_name: &str, output_dir: &Path, extension: &str) -> String {
        Self::resolve_against(base_name, output_dir, &[extension])
    }

    /// 候选名称在所有给定扩展名下都不存在时才算可用
    ///
    /// 最终文件的扩展名必须在其中；有转换步骤时把中间文件扩展名也传进来。
    pub fn resolve_against(base_name: &str, output_dir: &Path, extensions: &[&str]) -> String {
        let taken = |candidate: &str| {
            extensions
                .iter()
                .any(|ext| output_dir.join(format!("{candidate}.{ext}")).exists())
        };

        let mut candidate = base_name.to_string();
        let mut version = 1;
        while taken(&candidate) {
            version += 1;
            candidate = format!("{base_name}_v{version}");
        }
        candidate
    }
}
