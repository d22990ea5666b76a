//! 基础设施层
//!
//! 持有与外部世界打交道的能力：文档读写与格式转换。
//! 不认识记录，也不关心批处理流程。

pub mod converter;
pub mod document_store;

pub use converter::{render_html, CommandConverter, Converter, HtmlConverter};
pub use document_store::{
    DocumentLoader, JsonDocument, JsonDocumentLoader, TemplateDocument, TextBlock, TextCell,
};
