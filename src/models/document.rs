//! 模板文档模型
//!
//! 一个文档是有序的正文元素序列：段落或表格。段落由保留格式的文本片段（run）
//! 组成；表格是单元格网格，每个单元格又包含若干段落。

use serde::{Deserialize, Serialize};

/// 文本片段格式
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunStyle {
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub bold: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub italic: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub underline: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<f32>,
}

/// 格式一致的文本片段
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Run {
    pub text: String,
    #[serde(flatten)]
    pub style: RunStyle,
}

impl Run {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: RunStyle::default(),
        }
    }

    pub fn styled(text: impl Into<String>, style: RunStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }
}

/// 段落
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    /// 段落样式名（如 "Heading1"）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    /// 对齐方式
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<String>,
    #[serde(default)]
    pub runs: Vec<Run>,
}

impl Paragraph {
    pub fn from_runs(runs: Vec<Run>) -> Self {
        Self {
            runs,
            ..Default::default()
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::from_runs(vec![Run::plain(text)])
    }

    /// 所有 run 拼接后的文本
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    /// 首个 run 的格式
    pub fn leading_style(&self) -> RunStyle {
        self.runs.first().map(|r| r.style.clone()).unwrap_or_default()
    }
}

/// 表格单元格
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableCell {
    #[serde(default)]
    pub paragraphs: Vec<Paragraph>,
}

impl TableCell {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            paragraphs: vec![Paragraph::plain(text)],
        }
    }
}

/// 表格行
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    #[serde(default)]
    pub cells: Vec<TableCell>,
}

/// 表格
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    #[serde(default)]
    pub rows: Vec<TableRow>,
}

/// 正文元素
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BodyElement {
    Paragraph(Paragraph),
    Table(Table),
}

/// 模板文档
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemplateDoc {
    /// 文档元数据标题，原样保留；不是正文文本块，不参与占位符替换与残留检查
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Vec<BodyElement>,
}

impl TemplateDoc {
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.body.iter().filter_map(|e| match e {
            BodyElement::Paragraph(p) => Some(p),
            BodyElement::Table(_) => None,
        })
    }

    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.body.iter().filter_map(|e| match e {
            BodyElement::Table(t) => Some(t),
            BodyElement::Paragraph(_) => None,
        })
    }

    /// 文档中全部文本（正文段落与单元格），用于扫描残留占位符
    pub fn all_text(&self) -> Vec<String> {
        let mut texts: Vec<String> = self.paragraphs().map(Paragraph::text).collect();
        for table in self.tables() {
            for row in &table.rows {
                for cell in &row.cells {
                    texts.extend(cell.paragraphs.iter().map(Paragraph::text));
                }
            }
        }
        texts
    }
}
