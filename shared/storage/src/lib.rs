pub mod json_store;
pub mod repositories;

pub use json_store::{append_line, load_json, save_json};
pub use repositories::*;

use healthbot_utils::{HealthBotError, HealthBotResult, StorageConfig};

/// All file-backed repositories of one installation.
#[derive(Clone)]
pub struct Storage {
    pub history: HistoryRepository,
    pub user_data: UserDataRepository,
    pub documents: DocumentRepository,
    pub transcript: TranscriptLog,
}

impl Storage {
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            history: HistoryRepository::new(config.chat_history_path()),
            user_data: UserDataRepository::new(config.user_data_path()),
            documents: DocumentRepository::new(config.pdf_data_path()),
            transcript: TranscriptLog::new(config.chat_log_path()),
        }
    }
}

/// Creates the data and upload directories and opens the repositories.
pub async fn initialize_storage(config: &StorageConfig) -> HealthBotResult<Storage> {
    for dir in [&config.data_dir, &config.upload_dir] {
        tokio::fs::create_dir_all(dir).await.map_err(|e| {
            HealthBotError::storage(format!("Failed to create {}: {}", dir.display(), e))
        })?;
    }
    Ok(Storage::new(config))
}
