#![allow(dead_code)]

use informe_generator::error::DocumentError;
use informe_generator::infrastructure::{
    DocumentLoader, JsonDocument, JsonDocumentLoader, TemplateDocument, TextBlock, TextCell,
};
use informe_generator::models::{BodyElement, Paragraph, Run, RunStyle, Table, TableCell, TableRow, TemplateDoc};
use informe_generator::{BatchListener, Record};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::TempDir;

/// 收集所有事件的监听器
#[derive(Default)]
pub struct RecordingListener {
    pub progress: Mutex<Vec<u8>>,
    pub errors: Mutex<Vec<(String, String)>>,
}

impl RecordingListener {
    pub fn progress(&self) -> Vec<u8> {
        self.progress.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<(String, String)> {
        self.errors.lock().unwrap().clone()
    }
}

impl BatchListener for RecordingListener {
    fn on_progress(&self, percent: u8) {
        self.progress.lock().unwrap().push(percent);
    }

    fn on_error(&self, identity: &str, message: &str) {
        self.errors
            .lock()
            .unwrap()
            .push((identity.to_string(), message.to_string()));
    }
}

/// 保存路径包含指定片段时失败的文档
pub struct FlakyDocument {
    inner: JsonDocument,
    fail_on: String,
}

impl TemplateDocument for FlakyDocument {
    fn text_blocks_mut(&mut self) -> Vec<&mut dyn TextBlock> {
        self.inner.text_blocks_mut()
    }

    fn table_cells_mut(&mut self) -> Vec<&mut dyn TextCell> {
        self.inner.table_cells_mut()
    }

    fn visible_text(&self) -> Vec<String> {
        self.inner.visible_text()
    }

    fn save(&self, path: &Path) -> Result<(), DocumentError> {
        let file_name = path.file_name().unwrap_or_default().to_string_lossy();
        if file_name.contains(&self.fail_on) {
            return Err(DocumentError::Write {
                path: path.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "disco lleno"),
            });
        }
        self.inner.save(path)
    }
}

/// 为名称中含 `fail_on` 的输出文件模拟保存失败的加载器
pub struct FlakyLoader {
    pub fail_on: String,
}

impl DocumentLoader for FlakyLoader {
    type Document = FlakyDocument;

    fn extension(&self) -> &str {
        "json"
    }

    fn open(&self, path: &Path) -> Result<FlakyDocument, DocumentError> {
        Ok(FlakyDocument {
            inner: JsonDocumentLoader.open(path)?,
            fail_on: self.fail_on.clone(),
        })
    }
}

/// 周报模板：标题段落中的占位符跨越两个 run，表格中有每日时数
pub fn weekly_template() -> TemplateDoc {
    TemplateDoc {
        title: Some("Informe semanal".to_string()),
        body: vec![
            BodyElement::Paragraph(Paragraph::from_runs(vec![
                Run::styled(
                    "Informe de [estu",
                    RunStyle {
                        bold: true,
                        ..Default::default()
                    },
                ),
                Run::plain("diante] - semana [numero_semana]"),
            ])),
            BodyElement::Table(Table {
                rows: vec![
                    TableRow {
                        cells: vec![TableCell::plain("Lunes"), TableCell::plain("[hora_lunes]")],
                    },
                    TableRow {
                        cells: vec![TableCell::plain("Total"), TableCell::plain("[hora_total]")],
                    },
                ],
            }),
            BodyElement::Paragraph(Paragraph::plain("Observaciones: [observaciones]")),
        ],
    }
}

/// 临时工作区：模板文件与输出目录
pub struct Workspace {
    pub dir: TempDir,
    pub template: PathBuf,
    pub output: PathBuf,
}

impl Workspace {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let template = dir.path().join("plantilla.json");
        std::fs::write(&template, serde_json::to_string_pretty(&weekly_template()).unwrap()).unwrap();
        let output = dir.path().join("informe_out");
        Self {
            dir,
            template,
            output,
        }
    }
}

pub fn student(name: &str, week: u32, monday: &str) -> Record {
    Record::new()
        .with("estudiante", name)
        .with("numero_semana", week)
        .with("hora_lunes", monday)
}
