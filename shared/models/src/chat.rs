use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One user message and the bot's reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub user: String,
    pub bot: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl ChatTurn {
    pub fn new(user: impl Into<String>, bot: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            bot: bot.into(),
            timestamp: Some(Utc::now()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AskRequest {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskResponse {
    pub reply: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EditMessageRequest {
    #[serde(default)]
    pub message: String,
}

/// Response for history mutations: the operation outcome plus the new history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub success: bool,
    pub history: Vec<ChatTurn>,
}
