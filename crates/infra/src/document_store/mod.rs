//! Persistence gateway for the inventory document.
//!
//! The whole document is written and read as one JSON text. Reads never fail
//! outward: a missing or unreadable file yields the seed document together
//! with the reason, so callers can log it without bothering the user.

pub mod in_memory;
pub mod json_file;
pub mod r#trait;

pub use in_memory::InMemoryDocumentStore;
pub use json_file::{DEFAULT_DATA_FILE, JsonFileStore};
pub use r#trait::{DefaultReason, DocumentStore, LoadOutcome, PersistenceError, decode, encode};
