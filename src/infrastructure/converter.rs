//! 格式转换边界 - 基础设施层
//!
//! 输入中间文件路径，输出最终文件路径。转换失败只影响当前记录。

use crate::error::ConversionError;
use crate::infrastructure::document_store::JsonDocument;
use crate::models::{BodyElement, Paragraph, Run, TemplateDoc};
use std::fs;
use std::path::Path;
use std::process::Command;
use tracing::debug;

/// 转换器
pub trait Converter: Send + Sync {
    /// 最终文件扩展名
    fn extension(&self) -> &str;

    fn convert(&self, input: &Path, output: &Path) -> Result<(), ConversionError>;
}

/// 调用外部程序转换
///
/// 参数中的 `{input}` `{output}` `{outdir}` 会被替换为实际路径，
/// 例如 `typst compile {input} {output}` 或
/// `soffice --headless --convert-to pdf --outdir {outdir} {input}`。
#[derive(Debug, Clone)]
pub struct CommandConverter {
    program: String,
    args: Vec<String>,
    extension: String,
}

impl CommandConverter {
    /// `command` 第一个元素为程序名，其余为参数模板
    pub fn new(command: &[String], extension: impl Into<String>) -> Result<Self, ConversionError> {
        let (program, args) = command.split_first().ok_or(ConversionError::EmptyCommand)?;
        Ok(Self {
            program: program.clone(),
            args: args.to_vec(),
            extension: extension.into(),
        })
    }

    fn render_args(&self, input: &Path, output: &Path) -> Vec<String> {
        let outdir = output.parent().unwrap_or_else(|| Path::new("."));
        self.args
            .iter()
            .map(|arg| {
                arg.replace("{input}", &input.to_string_lossy())
                    .replace("{output}", &output.to_string_lossy())
                    .replace("{outdir}", &outdir.to_string_lossy())
            })
            .collect()
    }
}

impl Converter for CommandConverter {
    fn extension(&self) -> &str {
        &self.extension
    }

    fn convert(&self, input: &Path, output: &Path) -> Result<(), ConversionError> {
        let args = self.render_args(input, output);
        debug!("执行转换: {} {}", self.program, args.join(" "));

        let status = Command::new(&self.program)
            .args(&args)
            .status()
            .map_err(|source| ConversionError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !status.success() {
            return Err(ConversionError::Exit {
                program: self.program.clone(),
                code: status.code().unwrap_or(-1),
            });
        }

        if !output.exists() {
            return Err(ConversionError::MissingOutput {
                path: output.to_path_buf(),
            });
        }

        Ok(())
    }
}

/// 内置 HTML 渲染，把 JSON 模型文档输出为独立的 HTML 文件
#[derive(Debug, Clone, Default)]
pub struct HtmlConverter;

impl Converter for HtmlConverter {
    fn extension(&self) -> &str {
        "html"
    }

    fn convert(&self, input: &Path, output: &Path) -> Result<(), ConversionError> {
        let document = JsonDocument::read(input).map_err(ConversionError::Source)?;
        let html = render_html(document.inner());
        fs::write(output, html).map_err(|source| ConversionError::Write {
            path: output.to_path_buf(),
            source,
        })
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn render_run(run: &Run) -> String {
    let mut html = escape_html(&run.text);
    if run.style.underline {
        html = format!("<u>{html}</u>");
    }
    if run.style.italic {
        html = format!("<em>{html}</em>");
    }
    if run.style.bold {
        html = format!("<strong>{html}</strong>");
    }

    let mut css = Vec::new();
    if let Some(font) = &run.style.font {
        css.push(format!("font-family: {}", escape_html(font)));
    }
    if let Some(size) = run.style.size {
        css.push(format!("font-size: {size}pt"));
    }
    if css.is_empty() {
        html
    } else {
        format!("<span style=\"{}\">{html}</span>", css.join("; "))
    }
}

fn render_paragraph(paragraph: &Paragraph) -> String {
    let content: String = paragraph.runs.iter().map(render_run).collect();
    let tag = match paragraph.style.as_deref() {
        Some("Title") => "h1",
        Some("Heading1") => "h2",
        Some("Heading2") => "h3",
        _ => "p",
    };
    match paragraph.align.as_deref() {
        Some(align) => format!(
            "<{tag} style=\"text-align: {}\">{content}</{tag}>",
            escape_html(align)
        ),
        None => format!("<{tag}>{content}</{tag}>"),
    }
}

/// 渲染整份文档
pub fn render_html(doc: &TemplateDoc) -> String {
    let title = escape_html(doc.title.as_deref().unwrap_or("Informe"));
    let mut body = String::new();

    for element in &doc.body {
        match element {
            BodyElement::Paragraph(p) => {
                body.push_str(&render_paragraph(p));
                body.push('\n');
            }
            BodyElement::Table(table) => {
                body.push_str("<table>\n");
                for row in &table.rows {
                    body.push_str("<tr>");
                    for cell in &row.cells {
                        let content: String =
                            cell.paragraphs.iter().map(render_paragraph).collect();
                        body.push_str(&format!("<td>{content}</td>"));
                    }
                    body.push_str("</tr>\n");
                }
                body.push_str("</table>\n");
            }
        }
    }

    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n\
         <style>table {{ border-collapse: collapse; }} td {{ border: 1px solid #999; padding: 4px; }}</style>\n\
         </head>\n<body>\n{body}</body>\n</html>\n"
    )
}
