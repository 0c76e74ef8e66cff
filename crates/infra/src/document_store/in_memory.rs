use std::sync::RwLock;

use stockroom_inventory::InventoryDocument;

use super::r#trait::{
    DefaultReason, DocumentStore, LoadOutcome, PersistenceError, decode_or_default, encode,
};

/// In-memory document store.
///
/// Keeps the encoded JSON text, so loads go through the same decoding as the
/// file store. Intended for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    text: RwLock<Option<String>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with raw stored text (which need not be a valid document).
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: RwLock::new(Some(text.into())),
        }
    }

    /// Currently stored text, if anything was saved.
    pub fn text(&self) -> Option<String> {
        self.text.read().ok()?.clone()
    }
}

impl DocumentStore for InMemoryDocumentStore {
    fn load(&self) -> LoadOutcome {
        let guard = match self.text.read() {
            Ok(guard) => guard,
            Err(_) => return LoadOutcome::defaulted(DefaultReason::Unreadable("lock poisoned".to_string())),
        };
        match guard.as_deref() {
            Some(text) => decode_or_default(text, "memory"),
            None => LoadOutcome::defaulted(DefaultReason::Missing),
        }
    }

    fn save(&self, document: &InventoryDocument) -> Result<(), PersistenceError> {
        let text = encode(document)?;
        let mut guard = self
            .text
            .write()
            .map_err(|_| PersistenceError::Unavailable("lock poisoned".to_string()))?;
        *guard = Some(text);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockroom_inventory::UpdateQuantity;

    #[test]
    fn empty_store_reports_missing() {
        let store = InMemoryDocumentStore::new();
        assert_eq!(store.load(), LoadOutcome::defaulted(DefaultReason::Missing));
        assert!(store.text().is_none());
    }

    #[test]
    fn saved_document_is_loaded_back() {
        let store = InMemoryDocumentStore::new();
        let mut doc = InventoryDocument::seed();
        doc.update_quantity(&UpdateQuantity {
            name: "Motor Yağı".to_string(),
            quantity: 51,
        });
        store.save(&doc).unwrap();
        assert_eq!(store.load(), LoadOutcome::Loaded(doc));
    }

    #[test]
    fn garbage_text_is_malformed() {
        let store = InMemoryDocumentStore::with_text("[1, 2, 3]");
        assert!(matches!(
            store.load(),
            LoadOutcome::Defaulted {
                reason: DefaultReason::Malformed(_),
                ..
            }
        ));
    }
}
