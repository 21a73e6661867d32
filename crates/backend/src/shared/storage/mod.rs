//! Файловое хранилище загруженных картинок.
//!
//! Путь объекта всегда относительный (`market_banners/1700000000000_a.png`),
//! публичный URL получается приклеиванием префикса из конфигурации.
//! Файлы раздаются статикой по этому же префиксу.

pub mod color;

use anyhow::Context;
use contracts::domain::a001_banner::aggregate::BannerKind;
use std::path::{Component, Path, PathBuf};

/// Maximum upload size (5MB)
pub const MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

/// Supported image formats
pub const SUPPORTED_FORMATS: &[&str] = &["png", "jpg", "jpeg", "webp"];

#[derive(Debug, Clone)]
pub struct BlobStorage {
    root: PathBuf,
    public_prefix: String,
}

impl BlobStorage {
    pub fn new(root: impl Into<PathBuf>, public_prefix: &str) -> Self {
        Self {
            root: root.into(),
            public_prefix: public_prefix.trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn public_url(&self, path: &str) -> String {
        format!("{}/{}", self.public_prefix, path.trim_start_matches('/'))
    }

    /// Абсолютный путь на диске; выход за пределы корня запрещён
    fn resolve(&self, path: &str) -> anyhow::Result<PathBuf> {
        let relative = Path::new(path);
        let safe = !path.is_empty()
            && !path.contains('\\')
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !safe {
            anyhow::bail!("Invalid storage path: {}", path);
        }
        Ok(self.root.join(relative))
    }

    pub async fn put(&self, path: &str, data: &[u8]) -> anyhow::Result<()> {
        let target = self.resolve(path)?;
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
        tokio::fs::write(&target, data)
            .await
            .with_context(|| format!("Failed to write {}", target.display()))?;
        tracing::info!("Stored {} ({} bytes)", path, data.len());
        Ok(())
    }

    pub async fn read(&self, path: &str) -> anyhow::Result<Vec<u8>> {
        let target = self.resolve(path)?;
        tokio::fs::read(&target)
            .await
            .with_context(|| format!("Failed to read {}", target.display()))
    }

    /// Удаляет объект. `Ok(false)`, если его уже не было.
    pub async fn delete(&self, path: &str) -> anyhow::Result<bool> {
        let target = self.resolve(path)?;
        match tokio::fs::remove_file(&target).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(anyhow::anyhow!("Failed to delete {}: {}", target.display(), e)),
        }
    }
}

/// Путь нового баннера: `<prefix>/<unix millis>_<имя>`
pub fn banner_blob_path(kind: BannerKind, filename: &str, unix_millis: i64) -> String {
    format!(
        "{}/{}_{}",
        kind.storage_prefix(),
        unix_millis,
        sanitize_filename(filename)
    )
}

/// Оставляет от имени файла только безопасные символы
pub fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "file".to_string()
    } else {
        cleaned.to_string()
    }
}

/// Расширение файла в нижнем регистре
pub fn file_extension(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}

/// Проверка загружаемой картинки: размер, расширение, декодируемость
pub fn validate_image(data: &[u8], filename: &str) -> Result<(), String> {
    if data.is_empty() {
        return Err("Empty file provided".to_string());
    }
    if data.len() > MAX_FILE_SIZE {
        return Err(format!(
            "File too large. Maximum size is {}MB",
            MAX_FILE_SIZE / 1024 / 1024
        ));
    }

    let ext = file_extension(filename)
        .ok_or_else(|| format!("Invalid file extension for: {}", filename))?;
    if !SUPPORTED_FORMATS.contains(&ext.as_str()) {
        return Err(format!(
            "Unsupported file format '{}'. Supported: {}",
            ext,
            SUPPORTED_FORMATS.join(", ")
        ));
    }

    if let Err(e) = image::load_from_memory(data) {
        return Err(format!("Invalid image file ({}): {}", ext, e));
    }
    Ok(())
}
