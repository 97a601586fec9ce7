//! Chat History Repository
//!
//! Ordered list of chat turns in `chat_history.json`.

use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;

use healthbot_models::ChatTurn;
use healthbot_utils::{validate_index, HealthBotResult};

use crate::json_store::{load_json, save_json};

#[derive(Clone)]
pub struct HistoryRepository {
    path: PathBuf,
    lock: Arc<Mutex<()>>,
}

impl HistoryRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Arc::new(Mutex::new(())),
        }
    }

    pub async fn all(&self) -> Vec<ChatTurn> {
        let _guard = self.lock.lock().await;
        load_json(&self.path).await
    }

    pub async fn append(&self, turn: ChatTurn) -> HealthBotResult<usize> {
        let _guard = self.lock.lock().await;
        let mut history: Vec<ChatTurn> = load_json(&self.path).await;
        history.push(turn);
        save_json(&self.path, &history).await?;
        Ok(history.len())
    }

    /// Replaces the user text of turn `index`, keeping the recorded reply.
    pub async fn edit(&self, index: usize, message: &str) -> HealthBotResult<Vec<ChatTurn>> {
        let _guard = self.lock.lock().await;
        let mut history: Vec<ChatTurn> = load_json(&self.path).await;
        validate_index("Message", index, history.len())?;
        history[index].user = message.to_string();
        save_json(&self.path, &history).await?;
        Ok(history)
    }

    pub async fn delete(&self, index: usize) -> HealthBotResult<Vec<ChatTurn>> {
        let _guard = self.lock.lock().await;
        let mut history: Vec<ChatTurn> = load_json(&self.path).await;
        validate_index("Message", index, history.len())?;
        history.remove(index);
        save_json(&self.path, &history).await?;
        Ok(history)
    }

    pub async fn clear(&self) -> HealthBotResult<()> {
        let _guard = self.lock.lock().await;
        save_json(&self.path, &Vec::<ChatTurn>::new()).await
    }
}
