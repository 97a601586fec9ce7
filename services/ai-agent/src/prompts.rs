//! Prompt Templates
//!
//! Handlebars templates for document analysis and document question answering.

use handlebars::Handlebars;
use serde_json::json;

use healthbot_utils::{HealthBotError, HealthBotResult};

/// Section labels the analysis prompt asks the model to produce, in order.
pub const ANALYSIS_SECTIONS: [&str; 6] = [
    "SUMMARY",
    "KEY TOPICS",
    "IMPORTANT FINDINGS",
    "DOCUMENT TYPE",
    "ACTION ITEMS",
    "HEALTH INSIGHTS",
];

const DOCUMENT_ANALYSIS_TEMPLATE: &str = r#"You are HealthBot, a careful health and wellness assistant. Analyze the document "{{filename}}" below and answer using exactly these six sections:

1. SUMMARY: A brief overview of the document in two or three sentences.
2. KEY TOPICS: The main subjects the document covers.
3. IMPORTANT FINDINGS: Notable results, measurements, dates or facts.
4. DOCUMENT TYPE: What kind of document this is (lab report, prescription, discharge summary, article, invoice, ...).
5. ACTION ITEMS: Follow-ups, instructions or deadlines the reader should act on.
6. HEALTH INSIGHTS: Health-related observations and general wellness suggestions. Remind the reader to consult a medical professional for decisions.

Document content:
{{content}}
"#;

const DOCUMENT_QUESTION_TEMPLATE: &str = r#"You are HealthBot, a careful health and wellness assistant. Answer the question using the content of the document "{{filename}}". If the document does not contain the answer, say so.

Document content:
{{content}}

Question: {{question}}
"#;

/// Returns the longest prefix of `text` with at most `limit` characters.
pub fn truncate_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}

/// Template engine
pub struct PromptEngine {
    handlebars: Handlebars<'static>,
}

impl PromptEngine {
    pub fn new() -> Self {
        let mut handlebars = Handlebars::new();
        // Prompts are plain text; HTML escaping would mangle document content.
        handlebars.register_escape_fn(handlebars::no_escape);
        Self { handlebars }
    }

    pub fn render_analysis(&self, filename: &str, text: &str, char_limit: usize) -> HealthBotResult<String> {
        self.render(
            DOCUMENT_ANALYSIS_TEMPLATE,
            json!({
                "filename": filename,
                "content": truncate_chars(text, char_limit),
            }),
        )
    }

    pub fn render_question(
        &self,
        filename: &str,
        text: &str,
        question: &str,
        char_limit: usize,
    ) -> HealthBotResult<String> {
        self.render(
            DOCUMENT_QUESTION_TEMPLATE,
            json!({
                "filename": filename,
                "content": truncate_chars(text, char_limit),
                "question": question,
            }),
        )
    }

    fn render(&self, template: &str, data: serde_json::Value) -> HealthBotResult<String> {
        self.handlebars
            .render_template(template, &data)
            .map_err(|e| HealthBotError::internal(format!("Failed to render prompt: {}", e)))
    }
}

impl Default for PromptEngine {
    fn default() -> Self {
        Self::new()
    }
}
