use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::info;

use crate::error::{AppError, AppResult, FileError};
use crate::models::entry::TranslationEntry;

/// 从 JSON 文件加载一个分类的全部记录
///
/// 文件内容必须是一个对象数组；记录顺序与文件中的顺序一致。
pub async fn load_entries(path: &Path) -> AppResult<Vec<TranslationEntry>> {
    if !path.exists() {
        return Err(AppError::File(FileError::NotFound {
            path: path.display().to_string(),
        }));
    }

    let content = fs::read_to_string(path)
        .await
        .map_err(|e| AppError::file_read_failed(path.display().to_string(), e))?;

    let entries: Vec<TranslationEntry> = serde_json::from_str(&content)
        .map_err(|e| AppError::json_parse_failed(path.display().to_string(), e))?;

    Ok(entries)
}

/// 把一个分类的全部记录整体写回 JSON 文件
///
/// 每次保存都是完整快照，直接覆盖原文件；输出与 Python 的
/// `json.dump(..., ensure_ascii=False, indent=2)` 一致（2 空格缩进、
/// 非 ASCII 字符不转义），字段顺序按插入顺序原样输出。
pub async fn save_entries(path: &Path, entries: &[TranslationEntry]) -> AppResult<()> {
    let content = serde_json::to_string_pretty(entries)?;

    fs::write(path, content)
        .await
        .map_err(|e| AppError::file_write_failed(path.display().to_string(), e))?;

    Ok(())
}

/// 扫描数据目录下的所有 JSON 分类文件
///
/// 返回按文件名排序的路径列表，保证多次运行处理顺序一致。
pub async fn find_category_files(folder_path: &str) -> AppResult<Vec<PathBuf>> {
    let folder = PathBuf::from(folder_path);

    if !folder.exists() {
        return Err(AppError::File(FileError::DirectoryNotFound {
            path: folder_path.to_string(),
        }));
    }

    let mut json_files = Vec::new();
    let mut entries = fs::read_dir(&folder)
        .await
        .map_err(|e| AppError::file_read_failed(folder_path, e))?;

    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| AppError::file_read_failed(folder_path, e))?
    {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) == Some("json") {
            json_files.push(path);
        }
    }

    json_files.sort();

    info!("📁 在 {} 中找到 {} 个分类文件", folder_path, json_files.len());

    Ok(json_files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FileError;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("generate_keywords_{}_{}", std::process::id(), name))
    }

    #[tokio::test]
    async fn test_load_not_found() {
        let path = temp_path("missing.json");
        let err = load_entries(&path).await.unwrap_err();
        assert!(matches!(err, AppError::File(FileError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_load_malformed_data() {
        let path = temp_path("malformed.json");
        fs::write(&path, "{ not a json array").await.unwrap();

        let err = load_entries(&path).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::File(FileError::JsonParseFailed { .. })
        ));

        fs::remove_file(&path).await.ok();
    }

    #[tokio::test]
    async fn test_save_load_preserves_order() {
        let path = temp_path("round_trip.json");
        // 字段顺序故意打乱，且带有引擎不认识的透传字段
        let original = r#"[
  {
    "category": "menu",
    "jp": "お冷",
    "romaji": "ohiya",
    "en": "cold water",
    "keywords": "water, 水, お冷"
  },
  {
    "en": "check please",
    "jp": "お会計",
    "verified": true
  }
]"#;
        fs::write(&path, original).await.unwrap();

        let entries = load_entries(&path).await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(
            entries[0].field_names(),
            vec!["category", "jp", "romaji", "en", "keywords"]
        );
        assert_eq!(entries[1].field_names(), vec!["en", "jp", "verified"]);

        save_entries(&path, &entries).await.unwrap();
        let written = fs::read_to_string(&path).await.unwrap();
        // 非 ASCII 原样输出，不转义
        assert!(written.contains("お会計"));

        // 再次往返必须逐字节一致
        let reloaded = load_entries(&path).await.unwrap();
        save_entries(&path, &reloaded).await.unwrap();
        let rewritten = fs::read_to_string(&path).await.unwrap();
        assert_eq!(written, rewritten);

        fs::remove_file(&path).await.ok();
    }

    #[tokio::test]
    async fn test_find_category_files_sorted() {
        let folder = temp_path("data_dir");
        fs::create_dir_all(&folder).await.unwrap();
        fs::write(folder.join("menu.json"), "[]").await.unwrap();
        fs::write(folder.join("admin.json"), "[]").await.unwrap();
        fs::write(folder.join("notes.txt"), "ignored").await.unwrap();

        let files = find_category_files(folder.to_str().unwrap()).await.unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["admin.json", "menu.json"]);

        fs::remove_dir_all(&folder).await.ok();
    }

    #[tokio::test]
    async fn test_find_category_files_missing_folder() {
        let folder = temp_path("no_such_dir");
        let err = find_category_files(folder.to_str().unwrap())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::File(FileError::DirectoryNotFound { .. })
        ));
    }
}
