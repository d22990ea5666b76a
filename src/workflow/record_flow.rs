//! 记录处理流程 - 流程层
//!
//! 核心职责：定义"一条记录"的完整处理流程
//!
//! 流程顺序：
//! 1. Derive：计算派生字段
//! 2. ResolveName：确定不冲突的输出名称
//! 3. Fill：打开全新的模板实例并替换占位符
//! 4. Save：保存中间文件
//! 5. Convert：转换为最终格式（可选）
//! 6. Cleanup：转换成功后删除中间文件

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::{RecordError, RecordResult};
use crate::infrastructure::{Converter, DocumentLoader, TemplateDocument};
use crate::models::Record;
use crate::services::{FieldDeriver, NameResolver, TemplateSubstitutor};
use crate::workflow::record_ctx::RecordCtx;

/// 单条记录的处理结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordOutcome {
    /// 实际使用的输出名称（可能带 `_vN` 后缀）
    pub name: String,
    /// 最终文件
    pub artifact: PathBuf,
    /// 是否经过格式转换
    pub converted: bool,
}

/// 记录处理流程
///
/// - 编排单条记录的完整处理
/// - 不持有记录集合，不关心进度
/// - 任何一步失败都以 `RecordError` 返回，由编排层决定如何上报
pub struct RecordFlow<L: DocumentLoader> {
    loader: L,
    converter: Option<Box<dyn Converter>>,
    deriver: FieldDeriver,
    template_path: PathBuf,
    output_dir: PathBuf,
    verbose_logging: bool,
}

impl<L: DocumentLoader> RecordFlow<L> {
    /// 创建新的记录处理流程
    pub fn new(
        loader: L,
        converter: Option<Box<dyn Converter>>,
        template_path: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            loader,
            converter,
            deriver: FieldDeriver::weekly_hours(),
            template_path: template_path.into(),
            output_dir: output_dir.into(),
            verbose_logging: false,
        }
    }

    pub fn with_deriver(mut self, deriver: FieldDeriver) -> Self {
        self.deriver = deriver;
        self
    }

    pub fn with_verbose_logging(mut self, verbose: bool) -> Self {
        self.verbose_logging = verbose;
        self
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    pub fn template_path(&self) -> &Path {
        &self.template_path
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// 中间文件扩展名
    pub fn intermediate_extension(&self) -> &str {
        self.loader.extension()
    }

    /// 最终文件扩展名：有转换器时取转换器的，否则即中间文件扩展名
    pub fn final_extension(&self) -> &str {
        match &self.converter {
            Some(converter) => converter.extension(),
            None => self.loader.extension(),
        }
    }

    pub fn run(&self, record: &Record, base_name: &str, ctx: &RecordCtx) -> RecordResult<RecordOutcome> {
        // ========== Derive ==========
        let filled = self.deriver.derive(record);
        debug!(
            "{} {} = {:?}",
            ctx,
            self.deriver.target_field(),
            filled.get_text(self.deriver.target_field())
        );

        // ========== ResolveName ==========
        let name = self.resolve_name(base_name);
        if name != base_name {
            info!("{} 📝 已存在同名文件，改用 {}", ctx, name);
        }

        // ========== Fill ==========
        let mut document = self
            .loader
            .open(&self.template_path)
            .map_err(RecordError::TemplateOpen)?;

        let report = TemplateSubstitutor::substitute(&mut document, &filled)
            .map_err(RecordError::Substitution)?;
        debug!(
            "{} 替换完成: 文本块 {} 次, 单元格 {} 次",
            ctx, report.blocks_rewritten, report.cells_rewritten
        );

        let unresolved = TemplateSubstitutor::unresolved_placeholders(&document);
        if !unresolved.is_empty() {
            warn!(
                "{} ⚠️ 模板中仍有未填充的占位符: {}",
                ctx,
                unresolved.into_iter().collect::<Vec<_>>().join(", ")
            );
        }

        // ========== Save ==========
        let intermediate = self
            .output_dir
            .join(format!("{}.{}", name, self.intermediate_extension()));
        document.save(&intermediate).map_err(RecordError::Save)?;

        if self.verbose_logging {
            info!("{} 💾 已保存: {}", ctx, intermediate.display());
        }

        let Some(converter) = &self.converter else {
            return Ok(RecordOutcome {
                name,
                artifact: intermediate,
                converted: false,
            });
        };

        // ========== Convert ==========
        let artifact = self
            .output_dir
            .join(format!("{}.{}", name, converter.extension()));
        converter
            .convert(&intermediate, &artifact)
            .map_err(RecordError::Conversion)?;

        // ========== Cleanup ==========
        if artifact != intermediate {
            remove_intermediate(&intermediate)?;
        }

        Ok(RecordOutcome {
            name,
            artifact,
            converted: true,
        })
    }

    fn resolve_name(&self, base_name: &str) -> String {
        let final_ext = self.final_extension();
        let intermediate_ext = self.intermediate_extension();
        if final_ext == intermediate_ext {
            NameResolver::resolve(base_name, &self.output_dir, final_ext)
        } else {
            NameResolver::resolve_against(base_name, &self.output_dir, &[final_ext, intermediate_ext])
        }
    }
}

/// 删除中间文件；转换器已经移走它时视为成功
fn remove_intermediate(path: &Path) -> RecordResult<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(source) => Err(RecordError::Cleanup {
            path: path.to_path_buf(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConversionError;
    use crate::infrastructure::{HtmlConverter, JsonDocumentLoader};
    use crate::models::{BodyElement, Paragraph, TemplateDoc};
    use tempfile::TempDir;

    struct FailingConverter;

    impl Converter for FailingConverter {
        fn extension(&self) -> &str {
            "pdf"
        }

        fn convert(&self, _input: &Path, output: &Path) -> Result<(), ConversionError> {
            Err(ConversionError::MissingOutput {
                path: output.to_path_buf(),
            })
        }
    }

    fn setup() -> (TempDir, PathBuf, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let template = dir.path().join("plantilla.json");
        let doc = TemplateDoc {
            title: None,
            body: vec![BodyElement::Paragraph(Paragraph::plain(
                "[estudiante] trabajó [hora_total] horas",
            ))],
        };
        fs::write(&template, serde_json::to_string(&doc).unwrap()).unwrap();
        let out = dir.path().join("out");
        fs::create_dir_all(&out).unwrap();
        (dir, template, out)
    }

    fn ana() -> Record {
        Record::new()
            .with("estudiante", "Ana")
            .with("numero_semana", "5")
            .with("hora_lunes", "8")
            .with("hora_martes", "abc")
    }

    #[test]
    fn test_without_conversion_keeps_intermediate() {
        let (_dir, template, out) = setup();
        let flow = RecordFlow::new(JsonDocumentLoader, None, &template, &out);

        let outcome = flow
            .run(&ana(), "informe_Ana_5", &RecordCtx::new(1, 1, "informe_Ana_5"))
            .unwrap();

        assert_eq!(outcome.name, "informe_Ana_5");
        assert_eq!(outcome.artifact, out.join("informe_Ana_5.json"));
        assert!(!outcome.converted);

        let saved = JsonDocumentLoader.open(&outcome.artifact).unwrap();
        assert_eq!(saved.visible_text(), vec!["Ana trabajó 8.0 horas"]);
    }

    #[test]
    fn test_conversion_removes_intermediate() {
        let (_dir, template, out) = setup();
        let flow = RecordFlow::new(JsonDocumentLoader, Some(Box::new(HtmlConverter)), &template, &out);

        let outcome = flow
            .run(&ana(), "informe_Ana_5", &RecordCtx::new(1, 1, "informe_Ana_5"))
            .unwrap();

        assert!(outcome.converted);
        assert_eq!(outcome.artifact, out.join("informe_Ana_5.html"));
        assert!(outcome.artifact.exists());
        assert!(!out.join("informe_Ana_5.json").exists());
    }

    #[test]
    fn test_existing_final_artifact_gets_suffix() {
        let (_dir, template, out) = setup();
        fs::write(out.join("informe_Ana_5.html"), "previo").unwrap();
        let flow = RecordFlow::new(JsonDocumentLoader, Some(Box::new(HtmlConverter)), &template, &out);

        let outcome = flow
            .run(&ana(), "informe_Ana_5", &RecordCtx::new(1, 1, "informe_Ana_5"))
            .unwrap();

        assert_eq!(outcome.name, "informe_Ana_5_v2");
        assert_eq!(fs::read_to_string(out.join("informe_Ana_5.html")).unwrap(), "previo");
    }

    #[test]
    fn test_conversion_failure_leaves_intermediate() {
        let (_dir, template, out) = setup();
        let flow = RecordFlow::new(JsonDocumentLoader, Some(Box::new(FailingConverter)), &template, &out);

        let err = flow
            .run(&ana(), "informe_Ana_5", &RecordCtx::new(1, 1, "informe_Ana_5"))
            .unwrap_err();

        assert!(matches!(err, RecordError::Conversion(_)));
        assert!(out.join("informe_Ana_5.json").exists());
    }

    #[test]
    fn test_save_failure_is_reported() {
        let (dir, template, _out) = setup();
        let missing = dir.path().join("no_existe");
        let flow = RecordFlow::new(JsonDocumentLoader, None, &template, &missing);

        let err = flow
            .run(&ana(), "informe_Ana_5", &RecordCtx::new(1, 1, "informe_Ana_5"))
            .unwrap_err();

        assert!(matches!(err, RecordError::Save(_)));
    }

    /// 把中间文件移动为最终文件的转换器
    struct MovingConverter;

    impl Converter for MovingConverter {
        fn extension(&self) -> &str {
            "txt"
        }

        fn convert(&self, input: &Path, output: &Path) -> Result<(), ConversionError> {
            fs::rename(input, output).map_err(|source| ConversionError::Write {
                path: output.to_path_buf(),
                source,
            })
        }
    }

    #[test]
    fn test_consumed_intermediate_counts_as_cleaned() {
        let (_dir, template, out) = setup();
        let flow = RecordFlow::new(JsonDocumentLoader, Some(Box::new(MovingConverter)), &template, &out);

        let outcome = flow
            .run(&ana(), "informe_Ana_5", &RecordCtx::new(1, 1, "informe_Ana_5"))
            .unwrap();

        assert!(outcome.converted);
        assert_eq!(outcome.artifact, out.join("informe_Ana_5.txt"));
        assert!(outcome.artifact.exists());
        assert!(!out.join("informe_Ana_5.json").exists());
    }

    #[test]
    fn test_remove_missing_intermediate_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        assert!(remove_intermediate(&dir.path().join("informe_Ana_5.json")).is_ok());
    }
}
