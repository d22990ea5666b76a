//! 文档存取 - 基础设施层
//!
//! 上层只通过这里的接口接触文档：列出正文文本块、列出表格单元格、
//! 读写文本、保存。`JsonDocumentLoader` 是基于 JSON 文档模型的实现；
//! 其他文档库只需实现同一组 trait 即可接入。

use crate::error::DocumentError;
use crate::models::{BodyElement, Paragraph, Run, TableCell, TemplateDoc};
use std::fs;
use std::path::Path;

/// 正文文本块（段落）
pub trait TextBlock {
    /// 全部 run 拼接后的文本
    fn text(&self) -> String;

    /// 用单个 run 替换块内全部 run，沿用首个 run 的格式
    fn set_text(&mut self, text: String) -> Result<(), DocumentError>;
}

/// 表格单元格，整体作为一个文本容器
pub trait TextCell {
    /// 单元格文本，段落之间以 `\n` 连接
    fn text(&self) -> String;

    /// 整体替换单元格文本
    fn set_text(&mut self, text: String) -> Result<(), DocumentError>;
}

/// 已打开的模板文档
pub trait TemplateDocument: Send {
    /// 正文中的文本块（不含表格内的段落），按文档顺序
    fn text_blocks_mut(&mut self) -> Vec<&mut dyn TextBlock>;

    /// 所有表格的所有单元格，按表格、行、列顺序
    fn table_cells_mut(&mut self) -> Vec<&mut dyn TextCell>;

    /// 当前全部可见文本，用于检查残留占位符
    fn visible_text(&self) -> Vec<String>;

    /// 保存为新文件
    fn save(&self, path: &Path) -> Result<(), DocumentError>;
}

/// 模板加载器：每次调用都得到一份全新的文档实例
pub trait DocumentLoader: Send + Sync {
    type Document: TemplateDocument;

    /// 此加载器保存文件时使用的扩展名
    fn extension(&self) -> &str;

    fn open(&self, path: &Path) -> Result<Self::Document, DocumentError>;
}

impl TextBlock for Paragraph {
    fn text(&self) -> String {
        Paragraph::text(self)
    }

    fn set_text(&mut self, text: String) -> Result<(), DocumentError> {
        let style = self.leading_style();
        self.runs = vec![Run::styled(text, style)];
        Ok(())
    }
}

impl TextCell for TableCell {
    fn text(&self) -> String {
        self.paragraphs
            .iter()
            .map(Paragraph::text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn set_text(&mut self, text: String) -> Result<(), DocumentError> {
        // 行数不变时，每个段落保留自己的段落属性与首个 run 的格式
        let template = self.paragraphs.first().cloned().unwrap_or_default();
        let paragraphs = text
            .split('\n')
            .enumerate()
            .map(|(i, line)| {
                let original = self.paragraphs.get(i).unwrap_or(&template);
                Paragraph {
                    style: original.style.clone(),
                    align: original.align.clone(),
                    runs: vec![Run::styled(line, original.leading_style())],
                }
            })
            .collect();
        self.paragraphs = paragraphs;
        Ok(())
    }
}

/// JSON 模型文档
#[derive(Debug, Clone)]
pub struct JsonDocument {
    doc: TemplateDoc,
}

impl JsonDocument {
    pub fn new(doc: TemplateDoc) -> Self {
        Self { doc }
    }

    pub fn inner(&self) -> &TemplateDoc {
        &self.doc
    }

    /// 从文件读取
    pub fn read(path: &Path) -> Result<Self, DocumentError> {
        if !path.exists() {
            return Err(DocumentError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let content = fs::read_to_string(path).map_err(|source| DocumentError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let doc = serde_json::from_str(&content).map_err(|source| DocumentError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Self { doc })
    }
}

impl TemplateDocument for JsonDocument {
    fn text_blocks_mut(&mut self) -> Vec<&mut dyn TextBlock> {
        self.doc
            .body
            .iter_mut()
            .filter_map(|element| match element {
                BodyElement::Paragraph(p) => Some(p as &mut dyn TextBlock),
                BodyElement::Table(_) => None,
            })
            .collect()
    }

    fn table_cells_mut(&mut self) -> Vec<&mut dyn TextCell> {
        self.doc
            .body
            .iter_mut()
            .filter_map(|element| match element {
                BodyElement::Table(t) => Some(t),
                BodyElement::Paragraph(_) => None,
            })
            .flat_map(|table| table.rows.iter_mut())
            .flat_map(|row| row.cells.iter_mut())
            .map(|cell| cell as &mut dyn TextCell)
            .collect()
    }

    fn visible_text(&self) -> Vec<String> {
        self.doc.all_text()
    }

    fn save(&self, path: &Path) -> Result<(), DocumentError> {
        let json = serde_json::to_string_pretty(&self.doc).map_err(DocumentError::Serialize)?;
        fs::write(path, json).map_err(|source| DocumentError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// 读取 JSON 模型模板的加载器
#[derive(Debug, Clone, Default)]
pub struct JsonDocumentLoader;

impl DocumentLoader for JsonDocumentLoader {
    type Document = JsonDocument;

    fn extension(&self) -> &str {
        "json"
    }

    fn open(&self, path: &Path) -> Result<JsonDocument, DocumentError> {
        JsonDocument::read(path)
    }
}
