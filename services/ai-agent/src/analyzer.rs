//! Document Analyzer
//!
//! Sends extracted document text to the model for a sectioned analysis or
//! for answering a question about it.

use regex::Regex;
use std::sync::{Arc, OnceLock};

use healthbot_utils::{ChatConfig, HealthBotResult};

use crate::gemini_client::GeminiClient;
use crate::prompts::{truncate_chars, PromptEngine, ANALYSIS_SECTIONS};

const SUMMARY_MAX_CHARS: usize = 200;

#[derive(Clone)]
pub struct DocumentAnalyzer {
    client: GeminiClient,
    prompts: Arc<PromptEngine>,
    analysis_char_limit: usize,
    question_char_limit: usize,
}

impl DocumentAnalyzer {
    pub fn new(client: GeminiClient, config: &ChatConfig) -> Self {
        Self {
            client,
            prompts: Arc::new(PromptEngine::new()),
            analysis_char_limit: config.analysis_char_limit,
            question_char_limit: config.question_char_limit,
        }
    }

    /// Six-section analysis of `text`. Failures come back as a readable
    /// message instead of an error so the upload can still be stored.
    pub async fn analyze(&self, text: &str, label: &str) -> String {
        let result = match self.prompts.render_analysis(label, text, self.analysis_char_limit) {
            Ok(prompt) => self.client.generate_text(&prompt).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(analysis) => analysis,
            Err(e) => {
                tracing::error!(error = %e, filename = %label, "Document analysis failed");
                format!("Error analyzing document: {}", e.message())
            }
        }
    }

    pub async fn answer(&self, text: &str, label: &str, question: &str) -> HealthBotResult<String> {
        let prompt = self
            .prompts
            .render_question(label, text, question, self.question_char_limit)?;
        self.client.generate_text(&prompt).await
    }
}

/// One-line summary for document listings.
///
/// Prefers the text of the analysis' SUMMARY section and falls back to the
/// first non-empty line of the document itself.
pub fn summarize_analysis(analysis: &str, text: &str) -> String {
    let line = summary_section_line(analysis)
        .or_else(|| text.lines().map(clean_line).find(|l| !l.is_empty()))
        .unwrap_or_else(|| "No summary available".to_string());
    cap(&line, SUMMARY_MAX_CHARS)
}

fn summary_section_line(analysis: &str) -> Option<String> {
    let mut lines = analysis.lines().map(clean_line);
    for line in lines.by_ref() {
        if let Some(rest) = strip_label(&line, "SUMMARY") {
            if !rest.is_empty() {
                return Some(rest.to_string());
            }
            break;
        }
    }
    lines
        .find(|l| !l.is_empty())
        .filter(|l| !ANALYSIS_SECTIONS.iter().any(|s| strip_label(l, s).is_some()))
}

/// Drops markdown emphasis, heading and list markers plus leading numbering.
fn clean_line(line: &str) -> String {
    static NUMBERING: OnceLock<Regex> = OnceLock::new();
    let numbering = NUMBERING.get_or_init(|| Regex::new(r"^\d+[.)]\s*").expect("static regex"));

    let unmarked = line.replace("**", "").replace("__", "");
    let trimmed = unmarked.trim_start_matches(|c: char| c.is_whitespace() || matches!(c, '#' | '*' | '-' | '>'));
    numbering.replace(trimmed, "").trim().to_string()
}

fn strip_label<'a>(line: &'a str, label: &str) -> Option<&'a str> {
    let head = line.get(..label.len())?;
    if !head.eq_ignore_ascii_case(label) {
        return None;
    }
    let rest = &line[label.len()..];
    // "SUMMARY:" or "SUMMARY" alone, not "SUMMARYX".
    if !(rest.is_empty() || rest.starts_with(':') || rest.starts_with(char::is_whitespace)) {
        return None;
    }
    Some(rest.trim_start_matches(|c: char| c == ':' || c.is_whitespace()))
}

fn cap(line: &str, limit: usize) -> String {
    let head = truncate_chars(line, limit);
    if head.len() < line.len() {
        format!("{}...", head.trim_end())
    } else {
        head.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use healthbot_utils::GenAiConfig;
    use httpmock::prelude::*;
    use serde_json::json;

    #[test]
    fn test_summary_on_same_line_as_label() {
        let analysis = "**1. SUMMARY:** Routine blood panel with normal results.\n**2. KEY TOPICS:** Cholesterol";
        assert_eq!(summarize_analysis(analysis, ""), "Routine blood panel with normal results.");
    }

    #[test]
    fn test_summary_on_following_line() {
        let analysis = "## SUMMARY\n\n- Discharge instructions after knee surgery.\n## KEY TOPICS\n- Recovery";
        assert_eq!(summarize_analysis(analysis, ""), "Discharge instructions after knee surgery.");
    }

    #[test]
    fn test_falls_back_to_document_text() {
        let analysis = "Error analyzing document: Request failed";
        let text = "\n\n   Patient Visit Summary  \nDate: 2024-03-02";
        assert_eq!(summarize_analysis(analysis, text), "Patient Visit Summary");
    }

    #[test]
    fn test_empty_section_followed_by_next_label_falls_back() {
        let analysis = "SUMMARY:\nKEY TOPICS: sleep";
        assert_eq!(summarize_analysis(analysis, "Sleep diary"), "Sleep diary");
    }

    #[test]
    fn test_summary_is_capped() {
        let analysis = format!("SUMMARY: {}", "word ".repeat(100));
        let summary = summarize_analysis(&analysis, "");
        assert!(summary.ends_with("..."));
        assert!(summary.chars().count() <= SUMMARY_MAX_CHARS + 3);
    }

    #[test]
    fn test_nothing_to_summarize() {
        assert_eq!(summarize_analysis("", "  \n "), "No summary available");
    }

    fn analyzer(server: &MockServer) -> DocumentAnalyzer {
        let client = GeminiClient::new(&GenAiConfig {
            api_url: server.base_url(),
            api_key: "k".to_string(),
            ..GenAiConfig::default()
        })
        .unwrap();
        DocumentAnalyzer::new(client, &ChatConfig::default())
    }

    #[tokio::test]
    async fn test_analyze_returns_model_text() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST);
                then.status(200).json_body(json!({
                    "candidates": [{"content": {"parts": [{"text": "SUMMARY: A lab report."}]}}]
                }));
            })
            .await;

        let analysis = analyzer(&server).analyze("Glucose 90 mg/dL", "labs.pdf").await;
        assert_eq!(analysis, "SUMMARY: A lab report.");
    }

    #[tokio::test]
    async fn test_analyze_failure_becomes_message() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST);
                then.status(503).body("overloaded");
            })
            .await;

        let analysis = analyzer(&server).analyze("text", "labs.pdf").await;
        assert!(analysis.starts_with("Error analyzing document:"));
        assert!(analysis.contains("overloaded"));
    }

    #[tokio::test]
    async fn test_answer_failure_propagates() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST);
                then.status(500).body("boom");
            })
            .await;

        let err = analyzer(&server).answer("text", "labs.pdf", "What is my glucose?").await.unwrap_err();
        assert_eq!(err.error_code(), "EXTERNAL_SERVICE_ERROR");
    }
}
