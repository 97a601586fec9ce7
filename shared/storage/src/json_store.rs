//! Flat JSON file helpers
//!
//! Every collection lives in a single pretty-printed JSON file that is read
//! fully and rewritten fully. Missing or unparsable files read as the type's
//! default value.

use serde::{de::DeserializeOwned, Serialize};
use std::path::Path;
use tokio::io::AsyncWriteExt;

use healthbot_utils::{HealthBotError, HealthBotResult};

/// Loads `path`, falling back to `T::default()` when the file is absent or corrupt.
pub async fn load_json<T>(path: &Path) -> T
where
    T: DeserializeOwned + Default,
{
    let raw = match tokio::fs::read(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return T::default(),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Failed to read JSON file, using empty default");
            return T::default();
        }
    };

    match serde_json::from_slice(&raw) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Corrupt JSON file, using empty default");
            T::default()
        }
    }
}

/// Serializes `value` with two-space indentation and overwrites `path`.
pub async fn save_json<T>(path: &Path, value: &T) -> HealthBotResult<()>
where
    T: Serialize + ?Sized,
{
    let body = serde_json::to_vec_pretty(value)?;
    ensure_parent(path).await?;
    tokio::fs::write(path, body).await.map_err(|e| {
        HealthBotError::storage(format!("Failed to write {}: {}", path.display(), e))
    })?;
    tracing::debug!(path = %path.display(), "Saved JSON file");
    Ok(())
}

/// Appends `text` to `path`, creating the file if needed.
pub async fn append_line(path: &Path, text: &str) -> HealthBotResult<()> {
    ensure_parent(path).await?;
    let mut file = tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await
        .map_err(|e| HealthBotError::storage(format!("Failed to open {}: {}", path.display(), e)))?;
    file.write_all(text.as_bytes()).await?;
    file.flush().await?;
    Ok(())
}

async fn ensure_parent(path: &Path) -> HealthBotResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(|e| {
            HealthBotError::storage(format!("Failed to create {}: {}", parent.display(), e))
        })?;
    }
    Ok(())
}
