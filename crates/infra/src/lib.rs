//! Infrastructure layer: document persistence, sessions, config.

pub mod config;
pub mod document_store;
pub mod session;

pub use config::AppConfig;
pub use document_store::{
    DefaultReason, DocumentStore, InMemoryDocumentStore, JsonFileStore, LoadOutcome,
    PersistenceError,
};
pub use session::{Export, InventorySession, RefreshOutcome, Saved};
