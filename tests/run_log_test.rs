use informe_generator::utils::logging;
use informe_generator::{App, Config};
use std::fs;
use std::path::{Path, PathBuf};

fn demo(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("demos").join(name)
}

fn config_for(dir: &Path, records: PathBuf, log_file: &Path) -> Config {
    Config {
        records_path: records,
        template_path: demo("plantilla.json"),
        output_dir: dir.join("informe_out"),
        record_pause_ms: 0,
        output_log_file: log_file.to_string_lossy().into_owned(),
        error_log_file: dir.join("errores.txt").to_string_lossy().into_owned(),
        ..Config::default()
    }
}

// 同一个测试内完成：全局日志订阅者每个进程只能设置一次
#[tokio::test]
async fn test_run_log_file_records_the_whole_batch() {
    let dir = tempfile::tempdir().unwrap();
    let log_file = dir.path().join("run.log");
    let guard = logging::init(false, log_file.to_str().unwrap()).unwrap();

    // 第一批：一条记录缺少周次
    let records = dir.path().join("con_error.json");
    fs::write(
        &records,
        r#"[{"estudiante": "Ana", "numero_semana": 5, "hora_lunes": "8"},
            {"estudiante": "Sin semana"}]"#,
    )
    .unwrap();
    let summary = App::initialize(config_for(dir.path(), records, &log_file))
        .unwrap()
        .run()
        .await
        .unwrap();
    assert_eq!(summary.failed, 1);

    // 第二批：全部成功
    let summary = App::initialize(config_for(dir.path(), demo("informes.json"), &log_file))
        .unwrap()
        .run()
        .await
        .unwrap();
    assert_eq!(summary.failed, 0);

    drop(guard);
    let content = fs::read_to_string(&log_file).unwrap();

    assert!(content.starts_with(&"=".repeat(60)));
    assert!(content.contains("报告生成日志"));
    assert!(content.contains("开始生成 2 份报告"));
    assert!(content.contains("informe_Ana_5"));
    assert!(content.contains("'记录 #2' 生成失败"));
    assert!(content.contains("进度: 100%"));
    assert!(content.contains("✅ 成功: 1/2"));
    assert!(content.contains("✅ 成功: 2/2"));
    assert!(content.contains("errores.txt"));

    let partial = content.find("1 份报告已生成，1 份失败").unwrap();
    let complete = content.find("🎉 全部报告已生成").unwrap();
    assert!(partial < complete);
    assert_eq!(content.matches("🎉 全部报告已生成").count(), 1);
}
