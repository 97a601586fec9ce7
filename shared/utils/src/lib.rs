pub mod config;
pub mod logging;
pub mod error;
pub mod validation;

pub use config::*;
pub use logging::*;
pub use error::*;
pub use validation::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.storage.max_upload_bytes, 16 * 1024 * 1024);
        assert_eq!(config.chat.analysis_char_limit, 4000);
        assert_eq!(config.chat.question_char_limit, 3000);
        assert_eq!(config.genai.model, "gemini-1.5-flash");
    }

    #[test]
    fn test_missing_api_key_is_fatal() {
        let config = AppConfig::default();
        let err = config.validate().unwrap_err();
        assert_eq!(err.error_code(), "CONFIGURATION_ERROR");

        let mut config = AppConfig::default();
        config.genai.api_key = "   ".to_string();
        assert!(config.validate().is_err());

        config.genai.api_key = "test-key".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_storage_paths() {
        let storage = StorageConfig::rooted_at("/tmp/healthbot");
        assert_eq!(storage.chat_history_path(), std::path::Path::new("/tmp/healthbot/chat_history.json"));
        assert_eq!(storage.user_data_path(), std::path::Path::new("/tmp/healthbot/user_data.json"));
        assert_eq!(storage.pdf_data_path(), std::path::Path::new("/tmp/healthbot/pdf_data.json"));
        assert_eq!(storage.chat_log_path(), std::path::Path::new("/tmp/healthbot/chat_log.txt"));
        assert_eq!(storage.upload_dir, std::path::Path::new("/tmp/healthbot/uploads"));
    }

    #[test]
    fn test_partial_config_deserializes_with_defaults() {
        let config: AppConfig = serde_json::from_value(serde_json::json!({
            "genai": {"api_key": "abc"},
            "server": {"port": 8080}
        }))
        .unwrap();
        assert_eq!(config.genai.api_key, "abc");
        assert_eq!(config.genai.model, "gemini-1.5-flash");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
    }

    #[test]
    fn test_error_handling() {
        let error = HealthBotError::validation("message", "Field 'message' must not be empty");
        assert_eq!(error.error_code(), "VALIDATION_ERROR");
        assert_eq!(error.http_status_code(), 400);
        assert_eq!(error.message(), "Field 'message' must not be empty");

        let error = HealthBotError::not_found("PDF 4");
        assert_eq!(error.http_status_code(), 404);
        assert_eq!(error.message(), "PDF 4 not found");

        let error = HealthBotError::external_service("Gemini", "timeout");
        assert_eq!(error.http_status_code(), 502);
    }
}
