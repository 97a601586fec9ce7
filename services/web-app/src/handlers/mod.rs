pub mod chat;
pub mod health;
pub mod index;
pub mod pdf;
pub mod profile;

pub use chat::*;
pub use health::*;
pub use index::*;
pub use pdf::*;
pub use profile::*;
