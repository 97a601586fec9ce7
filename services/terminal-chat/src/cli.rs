use clap::Parser;
use std::path::PathBuf;

/// Talk to HealthBot from the terminal.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Append the conversation to this file instead of the configured chat log.
    #[arg(long, value_name = "PATH")]
    pub transcript: Option<PathBuf>,

    /// Start with an empty context instead of the saved chat history.
    #[arg(long)]
    pub no_replay: bool,
}
