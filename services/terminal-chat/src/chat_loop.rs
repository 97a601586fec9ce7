//! Interactive read-eval loop for the terminal front-end.

use anyhow::Result;
use console::{style, StyledObject};
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use healthbot_ai_agent::{ChatSession, GeminiClient};
use healthbot_storage::{HistoryRepository, TranscriptLog};
use healthbot_utils::HealthBotResult;

pub const GREETING: &str = "Hello! I'm here to talk about health and wellness. (Type 'exit' to quit)";
pub const FAREWELL: &str = "Take care! Stay healthy!";
pub const FAILURE: &str = "Sorry, something went wrong. Please try again.";

const EXIT_WORDS: &[&str] = &["exit", "quit", "bye", "good bye", "see you later"];

pub fn is_exit_word(input: &str) -> bool {
    let normalized = input.trim().to_lowercase();
    EXIT_WORDS.contains(&normalized.as_str())
}

pub struct ChatLoop {
    client: GeminiClient,
    session: ChatSession,
    history: HistoryRepository,
    transcript: TranscriptLog,
}

impl ChatLoop {
    pub fn new(
        client: GeminiClient,
        session: ChatSession,
        history: HistoryRepository,
        transcript: TranscriptLog,
    ) -> Self {
        Self { client, session, history, transcript }
    }

    /// Reads lines from `input` until an exit word or end of input.
    pub async fn run<R, W>(&mut self, input: R, out: &mut W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        writeln!(out, "{} {}", bot_prefix(), GREETING)?;
        let mut lines = input.lines();

        loop {
            write!(out, "{} ", user_prefix())?;
            out.flush()?;

            let Some(line) = lines.next_line().await? else {
                writeln!(out)?;
                break;
            };
            let message = line.trim();
            if message.is_empty() {
                continue;
            }
            if is_exit_word(message) {
                writeln!(out, "{} {}", bot_prefix(), FAREWELL)?;
                break;
            }

            match self.session.send(&self.client, message).await {
                Ok(turn) => {
                    writeln!(out, "{} {}", bot_prefix(), turn.bot)?;
                    persisted(self.transcript.record_exchange(&turn.user, &turn.bot).await, "transcript");
                    persisted(self.history.append(turn).await.map(|_| ()), "chat history");
                }
                Err(e) => {
                    tracing::error!(error = %e, "Chat request failed");
                    writeln!(out, "{} {}", bot_prefix(), FAILURE)?;
                    persisted(self.transcript.record_error(&e.to_string()).await, "transcript");
                }
            }
        }

        persisted(self.transcript.record_exit().await, "transcript");
        Ok(())
    }
}

/// Storage failures are reported and the conversation goes on.
fn persisted(result: HealthBotResult<()>, store: &str) {
    if let Err(e) = result {
        tracing::error!(error = %e, store, "Failed to save chat");
    }
}

fn bot_prefix() -> StyledObject<&'static str> {
    style("HealthBot:").cyan().bold()
}

fn user_prefix() -> StyledObject<&'static str> {
    style("You:").green().bold()
}

#[cfg(test)]
mod tests {
    use super::*;
    use healthbot_utils::GenAiConfig;
    use httpmock::prelude::*;
    use serde_json::json;

    #[test]
    fn test_exit_words() {
        for word in ["exit", "QUIT", " Bye ", "good bye", "See You Later"] {
            assert!(is_exit_word(word), "{}", word);
        }
        assert!(!is_exit_word("goodbye cruel headache"));
        assert!(!is_exit_word("hello"));
    }

    struct Fixture {
        dir: tempfile::TempDir,
        chat: ChatLoop,
        history: HistoryRepository,
    }

    fn fixture(server: &MockServer) -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let client = GeminiClient::new(&GenAiConfig {
            api_url: server.base_url(),
            api_key: "k".to_string(),
            ..GenAiConfig::default()
        })
        .unwrap();
        let history = HistoryRepository::new(dir.path().join("chat_history.json"));
        let transcript = TranscriptLog::new(dir.path().join("chat_log.txt"));
        let chat = ChatLoop::new(client, ChatSession::new(10), history.clone(), transcript);
        Fixture { dir, chat, history }
    }

    fn transcript(fixture: &Fixture) -> String {
        std::fs::read_to_string(fixture.dir.path().join("chat_log.txt")).unwrap()
    }

    #[tokio::test]
    async fn test_exchange_then_exit() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST);
                then.status(200).json_body(json!({
                    "candidates": [{"content": {"parts": [{"text": "Aim for eight hours."}]}}]
                }));
            })
            .await;
        let mut f = fixture(&server);
        let mut out = Vec::new();

        f.chat.run(&b"How much sleep?\n\n   \nbye\nignored\n"[..], &mut out).await.unwrap();

        let printed = String::from_utf8_lossy(&out);
        assert!(printed.contains(GREETING));
        assert!(printed.contains("Aim for eight hours."));
        assert!(printed.contains(FAREWELL));
        assert_eq!(
            transcript(&f),
            "You: How much sleep?\nHealthBot: Aim for eight hours.\n\nUser exited the chat.\n\n"
        );
        let history = f.history.all().await;
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].user, "How much sleep?");
    }

    #[tokio::test]
    async fn test_failure_is_reported_and_loop_continues() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST);
                then.status(500).body("unavailable");
            })
            .await;
        let mut f = fixture(&server);
        let mut out = Vec::new();

        f.chat.run(&b"first\nsecond\n"[..], &mut out).await.unwrap();

        let printed = String::from_utf8_lossy(&out);
        assert_eq!(printed.matches(FAILURE).count(), 2);
        let log = transcript(&f);
        assert_eq!(log.matches("Error: ").count(), 2);
        assert!(log.ends_with("User exited the chat.\n\n"));
        assert!(f.history.all().await.is_empty());
    }

    #[tokio::test]
    async fn test_storage_failure_does_not_end_session() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST);
                then.status(200).json_body(json!({
                    "candidates": [{"content": {"parts": [{"text": "ok"}]}}]
                }));
            })
            .await;
        let mut f = fixture(&server);
        // A directory where the history file should be makes every write fail.
        std::fs::create_dir(f.dir.path().join("chat_history.json")).unwrap();
        let mut out = Vec::new();

        f.chat.run(&b"first\nsecond\n"[..], &mut out).await.unwrap();

        let printed = String::from_utf8_lossy(&out);
        assert_eq!(printed.matches(" ok\n").count(), 2);
        assert_eq!(
            transcript(&f),
            "You: first\nHealthBot: ok\n\nYou: second\nHealthBot: ok\n\nUser exited the chat.\n\n"
        );
    }
}
