//! 占位符替换服务 - 业务能力层
//!
//! 对记录中的每个字段构造 `[字段名]`，在文档的每个正文文本块和每个表格
//! 单元格中做字面、区分大小写的替换。
//!
//! 检查占位符时使用整块拼接后的文本，因为一个占位符可能被格式边界切成
//! 多个 run。命中的文本块会被重写为单个 run（沿用首个 run 的格式），
//! 块内原有的逐 run 格式不再保留。文档标题属于元数据，不参与替换。

use crate::error::DocumentError;
use crate::infrastructure::TemplateDocument;
use crate::models::Record;
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::OnceLock;

/// 一次替换的统计
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SubstitutionReport {
    /// 被重写的正文文本块次数
    pub blocks_rewritten: usize,
    /// 被重写的单元格次数
    pub cells_rewritten: usize,
}

impl SubstitutionReport {
    pub fn total(&self) -> usize {
        self.blocks_rewritten + self.cells_rewritten
    }
}

/// 占位符替换
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateSubstitutor;

impl TemplateSubstitutor {
    /// 把记录中每个字段写入文档
    ///
    /// 文档中不存在的字段直接跳过；记录中不存在的占位符原样保留。
    pub fn substitute<D: TemplateDocument + ?Sized>(
        document: &mut D,
        record: &Record,
    ) -> Result<SubstitutionReport, DocumentError> {
        let mut report = SubstitutionReport::default();

        for (field, value) in record.text_fields() {
            let token = placeholder(field);

            for block in document.text_blocks_mut() {
                let text = block.text();
                if text.contains(&token) {
                    block.set_text(text.replace(&token, &value))?;
                    report.blocks_rewritten += 1;
                }
            }

            for cell in document.table_cells_mut() {
                let text = cell.text();
                if text.contains(&token) {
                    cell.set_text(text.replace(&token, &value))?;
                    report.cells_rewritten += 1;
                }
            }
        }

        Ok(report)
    }

    /// 文档中仍然存在的 `[名称]` 形式占位符（去重、排序）
    pub fn unresolved_placeholders<D: TemplateDocument + ?Sized>(document: &D) -> BTreeSet<String> {
        document
            .visible_text()
            .iter()
            .flat_map(|text| {
                placeholder_pattern()
                    .captures_iter(text)
                    .map(|caps| caps[1].to_string())
                    .collect::<Vec<_>>()
            })
            .collect()
    }
}

/// 字段名对应的占位符
pub fn placeholder(field: &str) -> String {
    format!("[{field}]")
}

fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\[([^\[\]\s]+)\]").expect("placeholder pattern is valid"))
}
