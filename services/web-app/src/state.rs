use std::sync::Arc;
use tokio::sync::Mutex;

use healthbot_ai_agent::{ChatSession, DocumentAnalyzer, GeminiClient};
use healthbot_document_processing::DocumentExtractor;
use healthbot_storage::{initialize_storage, Storage};
use healthbot_utils::{AppConfig, HealthBotError, HealthBotResult};

use crate::metrics::Metrics;

#[derive(Clone)]
pub struct AppState {
    pub storage: Storage,
    pub gemini: GeminiClient,
    pub extractor: DocumentExtractor,
    /// Multi-turn context shared by every chat request.
    pub session: Arc<Mutex<ChatSession>>,
    pub metrics: Metrics,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Opens storage, builds the model client and replays the saved
    /// conversation into a fresh session.
    pub async fn new(config: AppConfig) -> HealthBotResult<Self> {
        let storage = initialize_storage(&config.storage).await?;
        let gemini = GeminiClient::new(&config.genai)?;
        let analyzer = DocumentAnalyzer::new(gemini.clone(), &config.chat);
        let extractor = DocumentExtractor::new(storage.documents.clone(), analyzer, &config.storage);
        let metrics = Metrics::new()
            .map_err(|e| HealthBotError::internal(format!("Failed to register metrics: {}", e)))?;

        let mut session = ChatSession::new(config.chat.max_context_turns);
        session.replay(&storage.history.all().await);

        Ok(Self {
            storage,
            gemini,
            extractor,
            session: Arc::new(Mutex::new(session)),
            metrics,
            config: Arc::new(config),
        })
    }

    /// Rebuilds the session context after the stored history changed.
    pub async fn replay_session(&self) {
        let history = self.storage.history.all().await;
        self.session.lock().await.replay(&history);
    }
}
