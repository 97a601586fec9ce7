//! Chat Session
//!
//! Bounded multi-turn context for the chat front-ends. The window holds the
//! most recent turns only and can be rebuilt from the persisted history.

use std::collections::VecDeque;

use healthbot_models::ChatTurn;
use healthbot_utils::HealthBotResult;

use crate::gemini_client::{Content, GeminiClient};

pub const PERSONA: &str = "You are HealthBot, a friendly assistant who talks about health and wellness. \
Give clear, practical and supportive answers. You are not a doctor: for diagnoses, medication changes \
or emergencies, tell the user to contact a medical professional.";

#[derive(Debug, Clone)]
pub struct ChatSession {
    window: VecDeque<ChatTurn>,
    max_turns: usize,
}

impl ChatSession {
    pub fn new(max_turns: usize) -> Self {
        let max_turns = max_turns.max(1);
        Self {
            window: VecDeque::with_capacity(max_turns),
            max_turns,
        }
    }

    /// Rebuilds the window from `history`, keeping only its newest turns.
    pub fn replay(&mut self, history: &[ChatTurn]) {
        self.window.clear();
        let start = history.len().saturating_sub(self.max_turns);
        self.window.extend(history[start..].iter().cloned());
        tracing::debug!(turns = self.window.len(), "Replayed chat history into session");
    }

    pub fn push(&mut self, turn: ChatTurn) {
        if self.window.len() == self.max_turns {
            self.window.pop_front();
        }
        self.window.push_back(turn);
    }

    pub fn reset(&mut self) {
        self.window.clear();
    }

    pub fn len(&self) -> usize {
        self.window.len()
    }

    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }

    pub fn turns(&self) -> impl Iterator<Item = &ChatTurn> {
        self.window.iter()
    }

    /// The window as alternating user/model contents, followed by `message`.
    pub fn contents(&self, message: &str) -> Vec<Content> {
        let mut contents = Vec::with_capacity(self.window.len() * 2 + 1);
        for turn in &self.window {
            contents.push(Content::user(turn.user.clone()));
            contents.push(Content::model(turn.bot.clone()));
        }
        contents.push(Content::user(message));
        contents
    }

    /// Sends `message` with the session context. The turn is recorded only
    /// when the model answers.
    pub async fn send(&mut self, client: &GeminiClient, message: &str) -> HealthBotResult<ChatTurn> {
        let reply = client.generate(Some(PERSONA), &self.contents(message)).await?;
        let turn = ChatTurn::new(message, reply);
        self.push(turn.clone());
        Ok(turn)
    }
}
