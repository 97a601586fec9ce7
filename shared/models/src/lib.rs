//! # HealthBot Domain Models
//!
//! Records persisted to the flat JSON files and the request/response
//! payloads of the web surface.
//!
//! ## Key Models
//!
//! - **ChatTurn**: one user message and the bot's reply, stored in `chat_history.json`
//! - **UserData**: profile, custom fields, medications and emergency contacts in `user_data.json`
//! - **Document**: uploaded PDF with extracted text and AI analysis, stored in `pdf_data.json`
//! - **DocumentSummary**: the listing projection of a document

pub mod chat;
pub mod document;
pub mod user;


pub use chat::*;
pub use document::*;
pub use user::*;
