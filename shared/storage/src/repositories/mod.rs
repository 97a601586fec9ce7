//! Repository module for the JSON-file collections
//!
//! Each repository owns one file and serializes its read-modify-write
//! cycles behind a lock.

pub mod history;
pub mod user_data;
pub mod documents;
pub mod transcript;

pub use history::HistoryRepository;
pub use user_data::UserDataRepository;
pub use documents::DocumentRepository;
pub use transcript::TranscriptLog;
