use crate::models::record::Record;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tokio::fs;

/// TOML 记录文件的结构：`[[records]]` 表数组
#[derive(Debug, Deserialize)]
struct TomlRecordFile {
    #[serde(default)]
    records: Vec<Record>,
}

fn is_record_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|s| s.to_str()),
        Some("json") | Some("toml")
    )
}

/// 从单个 JSON / TOML 文件加载记录列表
pub async fn load_records_file(path: &Path) -> Result<Vec<Record>> {
    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("无法读取记录文件: {}", path.display()))?;

    let records = match path.extension().and_then(|s| s.to_str()) {
        Some("toml") => {
            let file: TomlRecordFile = toml::from_str(&content)
                .with_context(|| format!("无法解析TOML文件: {}", path.display()))?;
            file.records
        }
        _ => serde_json::from_str::<Vec<Record>>(&content)
            .with_context(|| format!("无法解析JSON文件: {}", path.display()))?,
    };

    Ok(records)
}

/// 列出目录中的记录文件（按文件名排序）
pub async fn list_record_files(folder: &Path) -> Result<Vec<PathBuf>> {
    if !folder.exists() {
        anyhow::bail!("文件夹不存在: {}", folder.display());
    }

    let mut files = Vec::new();
    let mut entries = fs::read_dir(folder)
        .await
        .with_context(|| format!("无法读取文件夹: {}", folder.display()))?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.is_file() && is_record_file(&path) {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

/// 加载记录：文件直接读取，目录则按文件名顺序合并其中所有记录文件
pub async fn load_records(path: &Path) -> Result<Vec<Record>> {
    if !path.is_dir() {
        return load_records_file(path).await;
    }

    let files = list_record_files(path).await?;
    if files.is_empty() {
        tracing::warn!("在文件夹 {} 中没有找到记录文件", path.display());
    }

    let mut records = Vec::new();
    for file in files {
        tracing::info!(
            "正在加载: {}",
            file.file_name().unwrap_or_default().to_string_lossy()
        );
        let loaded = load_records_file(&file).await?;
        tracing::info!("成功加载 {} 条记录", loaded.len());
        records.extend(loaded);
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_load_json_array() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("semana.json");
        std::fs::write(
            &path,
            r#"[{"estudiante": "Ana", "numero_semana": 5}, {"estudiante": "Luis", "numero_semana": "6"}]"#,
        )
        .unwrap();

        let records = load_records(&path).await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get_text("numero_semana").as_deref(), Some("5"));
        assert_eq!(records[1].get_text("estudiante").as_deref(), Some("Luis"));
    }

    #[tokio::test]
    async fn test_load_toml_records() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("semana.toml");
        std::fs::write(
            &path,
            "[[records]]\nestudiante = \"Ana\"\nnumero_semana = 5\nhora_lunes = 8.5\n",
        )
        .unwrap();

        let records = load_records(&path).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get_text("hora_lunes").as_deref(), Some("8.5"));
    }

    #[tokio::test]
    async fn test_load_directory_in_name_order() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("b.json"), r#"[{"estudiante": "B"}]"#).unwrap();
        std::fs::write(dir.path().join("a.json"), r#"[{"estudiante": "A"}]"#).unwrap();
        std::fs::write(dir.path().join("notas.txt"), "ignorar").unwrap();

        let records = load_records(dir.path()).await.unwrap();
        let names: Vec<String> = records
            .iter()
            .filter_map(|r| r.get_text("estudiante"))
            .collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[tokio::test]
    async fn test_invalid_json_reports_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("roto.json");
        std::fs::write(&path, "{no es json").unwrap();

        let err = load_records(&path).await.unwrap_err();
        assert!(err.to_string().contains("roto.json"));
    }
}
