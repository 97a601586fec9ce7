//! Chat Transcript
//!
//! Append-only human-readable log of exchanges in `chat_log.txt`.

use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;

use healthbot_utils::HealthBotResult;

use crate::json_store::append_line;

#[derive(Clone)]
pub struct TranscriptLog {
    path: PathBuf,
    lock: Arc<Mutex<()>>,
}

impl TranscriptLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Arc::new(Mutex::new(())),
        }
    }

    pub async fn record_exchange(&self, user: &str, bot: &str) -> HealthBotResult<()> {
        self.append(&format!("You: {}\nHealthBot: {}\n\n", user, bot)).await
    }

    pub async fn record_error(&self, message: &str) -> HealthBotResult<()> {
        self.append(&format!("Error: {}\n", message)).await
    }

    pub async fn record_exit(&self) -> HealthBotResult<()> {
        self.append("User exited the chat.\n\n").await
    }

    async fn append(&self, text: &str) -> HealthBotResult<()> {
        let _guard = self.lock.lock().await;
        append_line(&self.path, text).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_transcript_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chat_log.txt");
        let log = TranscriptLog::new(&path);

        log.record_exchange("Hi", "Hello! How can I help?").await.unwrap();
        log.record_error("timeout").await.unwrap();
        log.record_exit().await.unwrap();

        let text = tokio::fs::read_to_string(&path).await.unwrap();
        assert_eq!(
            text,
            "You: Hi\nHealthBot: Hello! How can I help?\n\nError: timeout\nUser exited the chat.\n\n"
        );
    }
}
