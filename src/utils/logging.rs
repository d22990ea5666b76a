use anyhow::{Context, Result};
/// 日志工具模块
///
/// 控制台与运行日志文件同时输出，外加批次各阶段的横幅
use std::fs::{self, OpenOptions};
use std::path::Path;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::orchestrator::BatchSummary;

/// 优先使用 `RUST_LOG`；未设置时详细模式为 debug，否则为 info
fn level_filter(verbose: bool) -> EnvFilter {
    let default_level = if verbose { "debug" } else { "info" };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// 初始化日志：控制台 + 运行日志文件
///
/// 先写入日志文件头，之后所有事件同时追加到该文件。返回的 guard 必须
/// 保持存活到程序结束，丢弃时会把缓冲中的日志写完。
/// 重复调用（例如测试中）不会报错，已有的全局订阅者保持不变。
pub fn init(verbose: bool, log_file_path: &str) -> Result<WorkerGuard> {
    init_log_file(log_file_path)?;

    let file = OpenOptions::new()
        .append(true)
        .open(log_file_path)
        .with_context(|| format!("无法打开日志文件: {}", log_file_path))?;
    let (file_writer, guard) = tracing_appender::non_blocking(file);

    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_filter(level_filter(verbose)),
        )
        .with(
            fmt::layer()
                .with_writer(file_writer)
                .with_target(false)
                .with_ansi(false)
                .with_filter(level_filter(verbose)),
        )
        .try_init();

    Ok(guard)
}

/// 初始化日志文件（覆盖旧内容，写入文件头）
pub fn init_log_file(log_file_path: &str) -> Result<()> {
    let log_header = format!(
        "{}\n报告生成日志 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header)
        .with_context(|| format!("无法写入日志文件: {}", log_file_path))?;
    Ok(())
}

/// 记录程序启动信息
///
/// # 参数
/// - `template`: 模板路径
/// - `output_dir`: 输出目录
pub fn log_startup(template: &str, output_dir: &str) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 报告批量生成");
    info!("📄 模板: {}", template);
    info!("📁 输出目录: {}", output_dir);
    info!("{}", "=".repeat(60));
}

/// 记录待生成列表
pub fn log_plan(names: &[String]) {
    info!("✓ 找到 {} 条记录，待生成:", names.len());
    for name in names {
        info!("  • {}", name);
    }
}

/// 批次结束后的统计横幅
///
/// # 参数
/// - `summary`: 批次统计
/// - `extension`: 最终文件扩展名
/// - `log_file_path`: 运行日志文件
/// - `error_log_path`: 错误日志文件，仅在有失败时提示
pub fn print_final_stats(
    summary: &BatchSummary,
    extension: &str,
    log_file_path: &str,
    error_log_path: &Path,
) {
    info!("{}", "=".repeat(60));
    info!(
        "📊 报告生成统计 - {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("📄 输出格式: .{}", extension);
    info!("✅ 成功: {}/{}", summary.success, summary.total);
    if summary.failed > 0 {
        warn!("❌ 失败: {}，错误明细见: {}", summary.failed, error_log_path.display());
    }
    info!("{}", "=".repeat(60));
    info!("📝 运行日志: {}", log_file_path);
}

/// 把错误信息压成单行并限制长度，用于控制台显示
///
/// 外部转换程序的输出常带换行，连续空白合并为一个空格。
pub fn one_line(text: &str, max_chars: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() > max_chars {
        flat.chars().take(max_chars).collect::<String>() + "…"
    } else {
        flat
    }
}
