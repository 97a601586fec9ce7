//! # HealthBot AI Agent
//!
//! Everything that talks to the language model: the Gemini client, the
//! prompt templates, document analysis and the bounded chat session.

pub mod analyzer;
pub mod gemini_client;
pub mod prompts;
pub mod session;

pub use analyzer::{summarize_analysis, DocumentAnalyzer};
pub use gemini_client::{Content, GeminiClient, Part, Role};
pub use prompts::{truncate_chars, PromptEngine, ANALYSIS_SECTIONS};
pub use session::{ChatSession, PERSONA};
