use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::BufReader;

use healthbot_ai_agent::{ChatSession, GeminiClient};
use healthbot_storage::{initialize_storage, TranscriptLog};
use healthbot_utils::{init_logging, AppConfig};

mod chat_loop;
mod cli;

use chat_loop::ChatLoop;
use cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load().context("Failed to load configuration")?;
    let mut logging = config.logging.clone();
    if logging.file_path.is_none() {
        // Only warnings on the terminal the conversation is printed to.
        logging.level = "warn".to_string();
    }
    init_logging(&logging)?;
    config.validate().context("Invalid configuration")?;

    let storage = initialize_storage(&config.storage).await?;
    let transcript = match cli.transcript {
        Some(path) => TranscriptLog::new(path),
        None => storage.transcript.clone(),
    };

    let client = GeminiClient::new(&config.genai)?;
    let mut session = ChatSession::new(config.chat.max_context_turns);
    if !cli.no_replay {
        session.replay(&storage.history.all().await);
    }
    tracing::debug!(turns = session.len(), "Terminal chat session ready");

    let mut chat = ChatLoop::new(client, session, storage.history.clone(), transcript);
    let mut stdout = std::io::stdout();
    chat.run(BufReader::new(tokio::io::stdin()), &mut stdout).await
}
