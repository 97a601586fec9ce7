use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

use crate::error::{HealthBotError, HealthBotResult};

/// Fallback variable for the generation-service credential.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub genai: GenAiConfig,
    pub storage: StorageConfig,
    pub chat: ChatConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_request_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenAiConfig {
    pub api_url: String,
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
    pub upload_dir: PathBuf,
    pub max_upload_bytes: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    pub max_context_turns: usize,
    pub analysis_char_limit: usize,
    pub question_char_limit: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub file_path: Option<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        let config = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(
                File::with_name(&format!(
                    "config/{}",
                    env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into())
                ))
                .required(false),
            )
            // Add local config (gitignored)
            .add_source(File::with_name("config/local").required(false))
            .add_source(
                Environment::with_prefix("HEALTHBOT")
                    .separator("__")
                    .try_parsing(true),
            );

        let app_config: AppConfig = config.build()?.try_deserialize()?;
        Ok(app_config.with_env_api_key())
    }

    /// Fills an empty credential from `GEMINI_API_KEY`.
    pub fn with_env_api_key(mut self) -> Self {
        if self.genai.api_key.trim().is_empty() {
            if let Ok(key) = env::var(API_KEY_ENV) {
                self.genai.api_key = key;
            }
        }
        self
    }

    /// Startup checks. A missing credential is fatal.
    pub fn validate(&self) -> HealthBotResult<()> {
        if self.genai.api_key.trim().is_empty() {
            return Err(HealthBotError::configuration(format!(
                "No API key configured. Set HEALTHBOT__GENAI__API_KEY or {}",
                API_KEY_ENV
            )));
        }
        if self.storage.max_upload_bytes == 0 {
            return Err(HealthBotError::configuration(
                "storage.max_upload_bytes must be greater than zero",
            ));
        }
        if self.chat.max_context_turns == 0 {
            return Err(HealthBotError::configuration(
                "chat.max_context_turns must be greater than zero",
            ));
        }
        Ok(())
    }
}

impl StorageConfig {
    pub fn chat_history_path(&self) -> PathBuf {
        self.data_dir.join("chat_history.json")
    }

    pub fn user_data_path(&self) -> PathBuf {
        self.data_dir.join("user_data.json")
    }

    pub fn pdf_data_path(&self) -> PathBuf {
        self.data_dir.join("pdf_data.json")
    }

    pub fn chat_log_path(&self) -> PathBuf {
        self.data_dir.join("chat_log.txt")
    }

    /// Storage rooted at `dir`, with uploads in `dir/uploads`.
    pub fn rooted_at(dir: impl Into<PathBuf>) -> Self {
        let data_dir = dir.into();
        Self {
            upload_dir: data_dir.join("uploads"),
            data_dir,
            ..Self::default()
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            max_request_size: 17 * 1024 * 1024,
        }
    }
}

impl Default for GenAiConfig {
    fn default() -> Self {
        Self {
            api_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            api_key: String::new(),
            model: "gemini-1.5-flash".to_string(),
            temperature: 0.7,
            max_output_tokens: 2048,
            timeout_seconds: 60,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            upload_dir: PathBuf::from("uploads"),
            max_upload_bytes: 16 * 1024 * 1024, // 16MB
        }
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            max_context_turns: 20,
            analysis_char_limit: 4000,
            question_char_limit: 3000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
            file_path: None,
        }
    }
}
