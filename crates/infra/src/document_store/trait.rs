use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use stockroom_inventory::InventoryDocument;

/// Why a load fell back to the seed document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultReason {
    /// Nothing stored yet (first run).
    Missing,
    /// Stored bytes exist but could not be read.
    Unreadable(String),
    /// Stored text is not a valid document.
    Malformed(String),
}

impl core::fmt::Display for DefaultReason {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DefaultReason::Missing => f.write_str("no stored document"),
            DefaultReason::Unreadable(msg) => write!(f, "stored document unreadable: {msg}"),
            DefaultReason::Malformed(msg) => write!(f, "stored document malformed: {msg}"),
        }
    }
}

/// Result of reading the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded(InventoryDocument),
    Defaulted {
        document: InventoryDocument,
        reason: DefaultReason,
    },
}

impl LoadOutcome {
    pub fn defaulted(reason: DefaultReason) -> Self {
        LoadOutcome::Defaulted {
            document: InventoryDocument::seed(),
            reason,
        }
    }

    pub fn used_defaults(&self) -> bool {
        matches!(self, LoadOutcome::Defaulted { .. })
    }

    pub fn document(&self) -> &InventoryDocument {
        match self {
            LoadOutcome::Loaded(document) | LoadOutcome::Defaulted { document, .. } => document,
        }
    }

    pub fn into_document(self) -> InventoryDocument {
        match self {
            LoadOutcome::Loaded(document) | LoadOutcome::Defaulted { document, .. } => document,
        }
    }
}

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("failed to encode inventory document: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("failed to write inventory document to {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("document store unavailable: {0}")]
    Unavailable(String),
}

/// Storage boundary for the inventory document.
///
/// Overwrite-in-place semantics: `save` replaces whatever was stored, with no
/// locking or versioning. Concurrent writers race and the last one wins.
pub trait DocumentStore: Send + Sync {
    /// Read the stored document, falling back to the seed document.
    fn load(&self) -> LoadOutcome;

    /// Replace the stored document.
    fn save(&self, document: &InventoryDocument) -> Result<(), PersistenceError>;
}

impl<S> DocumentStore for Arc<S>
where
    S: DocumentStore + ?Sized,
{
    fn load(&self) -> LoadOutcome {
        (**self).load()
    }

    fn save(&self, document: &InventoryDocument) -> Result<(), PersistenceError> {
        (**self).save(document)
    }
}

/// Human-readable wire text: 2-space indented JSON, non-ASCII kept verbatim.
pub fn encode(document: &InventoryDocument) -> Result<String, PersistenceError> {
    Ok(serde_json::to_string_pretty(document)?)
}

pub fn decode(text: &str) -> Result<InventoryDocument, serde_json::Error> {
    serde_json::from_str(text)
}

/// Shared tail of every `load`: decode the text or fall back with a logged reason.
pub(crate) fn decode_or_default(text: &str, origin: &str) -> LoadOutcome {
    match decode(text) {
        Ok(document) => LoadOutcome::Loaded(document),
        Err(e) => {
            tracing::warn!("inventory document at {origin} is malformed, using defaults: {e}");
            LoadOutcome::defaulted(DefaultReason::Malformed(e.to_string()))
        }
    }
}
