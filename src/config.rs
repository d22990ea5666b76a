use crate::error::ConfigError;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// 转换模式
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ConversionMode {
    /// 不转换，中间文件即最终文件
    #[default]
    None,
    /// 内置 HTML 渲染
    Html,
    /// 调用外部命令
    Command,
}

impl ConversionMode {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "none" | "" => Some(Self::None),
            "html" => Some(Self::Html),
            "command" => Some(Self::Command),
            _ => None,
        }
    }
}

/// 程序配置文件
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 记录来源（JSON/TOML 文件，或包含它们的目录）
    pub records_path: PathBuf,
    /// 模板文件
    pub template_path: PathBuf,
    /// 输出目录
    pub output_dir: PathBuf,
    /// 输出文件名前缀
    pub name_prefix: String,
    /// 标识字段：对象（学生）
    pub subject_field: String,
    /// 标识字段：周期（周次）
    pub period_field: String,
    /// 转换模式
    pub conversion: ConversionMode,
    /// 外部转换命令，支持 {input} {output} {outdir} 占位
    pub convert_command: Vec<String>,
    /// 外部转换的目标扩展名
    pub final_extension: String,
    /// 每条记录之间的让步间隔（毫秒）
    pub record_pause_ms: u64,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 运行日志文件
    pub output_log_file: String,
    /// 错误事件日志文件
    pub error_log_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            records_path: PathBuf::from("informe_json"),
            template_path: PathBuf::from("informe_plantilla/plantilla.json"),
            output_dir: PathBuf::from("informe_out"),
            name_prefix: "informe".to_string(),
            subject_field: "estudiante".to_string(),
            period_field: "numero_semana".to_string(),
            conversion: ConversionMode::None,
            convert_command: Vec::new(),
            final_extension: "pdf".to_string(),
            record_pause_ms: 50,
            verbose_logging: false,
            output_log_file: "informe_log.txt".to_string(),
            error_log_file: "informe_errores.txt".to_string(),
        }
    }
}

impl Config {
    /// 读取 `INFORME_CONFIG` 指向的 TOML（若有），再叠加环境变量
    pub fn load() -> Result<Self, ConfigError> {
        let base = match std::env::var("INFORME_CONFIG") {
            Ok(path) if !path.trim().is_empty() => Self::from_file(Path::new(&path))?,
            _ => Self::default(),
        };
        Ok(base.with_env_overrides())
    }

    /// 仅从环境变量构造
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// 从 TOML 文件构造，缺失的键使用默认值
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn with_env_overrides(self) -> Self {
        let env = |key: &str| std::env::var(key).ok();
        Self {
            records_path: env("RECORDS_PATH").map(PathBuf::from).unwrap_or(self.records_path),
            template_path: env("TEMPLATE_PATH").map(PathBuf::from).unwrap_or(self.template_path),
            output_dir: env("OUTPUT_DIR").map(PathBuf::from).unwrap_or(self.output_dir),
            name_prefix: env("NAME_PREFIX").unwrap_or(self.name_prefix),
            subject_field: env("SUBJECT_FIELD").unwrap_or(self.subject_field),
            period_field: env("PERIOD_FIELD").unwrap_or(self.period_field),
            conversion: env("CONVERSION").and_then(|v| ConversionMode::parse(&v)).unwrap_or(self.conversion),
            convert_command: env("CONVERT_COMMAND")
                .map(|v| v.split_whitespace().map(str::to_string).collect())
                .unwrap_or(self.convert_command),
            final_extension: env("FINAL_EXTENSION").unwrap_or(self.final_extension),
            record_pause_ms: env("RECORD_PAUSE_MS").and_then(|v| v.parse().ok()).unwrap_or(self.record_pause_ms),
            verbose_logging: env("VERBOSE_LOGGING").and_then(|v| v.parse().ok()).unwrap_or(self.verbose_logging),
            output_log_file: env("OUTPUT_LOG_FILE").unwrap_or(self.output_log_file),
            error_log_file: env("ERROR_LOG_FILE").unwrap_or(self.error_log_file),
        }
    }
}
