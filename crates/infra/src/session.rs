//! Caller-owned inventory session.
//!
//! A session owns exactly one in-memory document and the store it mirrors to.
//! Every mutation runs to completion, then the whole document is saved. A
//! failed save never undoes the mutation: the in-memory document stays
//! authoritative and the error is handed back as a warning.

use chrono::{Local, NaiveDateTime, SubsecRound};

use stockroom_core::{DomainResult, ItemCode};
use stockroom_inventory::{
    CreateRequest, ExportError, InventoryDocument, InventoryMetrics, Request, StockItem,
    UpdateQuantity, STOCK_EXPORT_FILENAME, approved_export_filename, approved_requests_csv,
    stock_csv,
};

use crate::document_store::{DefaultReason, DocumentStore, LoadOutcome, PersistenceError};

/// Result of a mutation plus the outcome of the save that followed it.
#[derive(Debug)]
pub struct Saved<T> {
    pub value: T,
    /// `Some` when the document could not be written; non-fatal.
    pub save_error: Option<PersistenceError>,
}

impl<T> Saved<T> {
    pub fn is_saved(&self) -> bool {
        self.save_error.is_none()
    }

    /// Human-readable warning for presentation layers.
    pub fn warning(&self) -> Option<String> {
        self.save_error
            .as_ref()
            .map(|e| format!("changes kept in memory but not saved: {e}"))
    }
}

/// What `refresh` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The stored document replaced the in-memory one.
    Reloaded,
    /// Nothing usable was stored; the in-memory document was kept.
    KeptCurrent(DefaultReason),
}

/// A downloadable file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Export {
    pub filename: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug)]
pub struct InventorySession<S> {
    store: S,
    document: InventoryDocument,
}

impl<S: DocumentStore> InventorySession<S> {
    /// Load the stored document (or the seed document) into a new session.
    pub fn open(store: S) -> Self {
        let outcome = store.load();
        if let LoadOutcome::Defaulted { reason, .. } = &outcome {
            tracing::info!("session opened with seed data ({reason})");
        }
        Self {
            store,
            document: outcome.into_document(),
        }
    }

    pub fn document(&self) -> &InventoryDocument {
        &self.document
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn items(&self) -> &[StockItem] {
        self.document.items()
    }

    pub fn pending(&self) -> &[Request] {
        self.document.pending()
    }

    pub fn approved(&self) -> &[Request] {
        self.document.approved()
    }

    pub fn metrics(&self) -> InventoryMetrics {
        self.document.metrics()
    }

    /// Create a request stamped with the current local time.
    pub fn create_request(&mut self, item_code: ItemCode, amount: u32) -> DomainResult<Saved<Request>> {
        self.create_request_at(CreateRequest {
            item_code,
            amount,
            requested_at: now(),
        })
    }

    /// Create a request with an explicit timestamp.
    ///
    /// Validation failures leave the document untouched and skip the save.
    pub fn create_request_at(&mut self, cmd: CreateRequest) -> DomainResult<Saved<Request>> {
        let request = match self.document.create_request(&cmd) {
            Ok(request) => request,
            Err(e) => {
                tracing::info!("request rejected for {}: {e}", cmd.item_code);
                return Err(e);
            }
        };
        tracing::info!(
            request_id = request.id.value(),
            item_code = %request.item_code,
            amount = request.amount,
            "withdrawal request created"
        );
        Ok(self.persist(request))
    }

    /// Approve every pending request. Saves even when nothing was pending.
    pub fn approve_all(&mut self) -> Saved<usize> {
        let approved = self.document.approve_all();
        tracing::info!(approved, "pending requests approved");
        self.persist(approved)
    }

    pub fn clear_pending(&mut self) -> Saved<usize> {
        let cleared = self.document.clear_pending();
        tracing::info!(cleared, "pending requests cleared");
        self.persist(cleared)
    }

    /// Overwrite the quantity of the first item named `name`.
    ///
    /// An unknown name changes nothing (`value == false`) but still saves.
    pub fn update_quantity(&mut self, name: impl Into<String>, quantity: u32) -> Saved<bool> {
        let cmd = UpdateQuantity {
            name: name.into(),
            quantity,
        };
        let updated = self.document.update_quantity(&cmd);
        if updated {
            tracing::info!("stock quantity of {:?} set to {}", cmd.name, cmd.quantity);
        } else {
            tracing::debug!("no stock item named {:?}; quantity unchanged", cmd.name);
        }
        self.persist(updated)
    }

    /// Seed catalog, empty queues, counter back to 1; then save.
    pub fn reset_to_defaults(&mut self) -> Saved<()> {
        self.document.reset_to_defaults();
        tracing::info!("inventory reset to defaults");
        self.persist(())
    }

    /// Re-read the store.
    ///
    /// If the store has nothing usable the current document is kept, so a
    /// deleted or corrupted file never wipes an active session.
    pub fn refresh(&mut self) -> RefreshOutcome {
        match self.store.load() {
            LoadOutcome::Loaded(document) => {
                self.document = document;
                RefreshOutcome::Reloaded
            }
            LoadOutcome::Defaulted { reason, .. } => {
                tracing::info!("refresh kept in-memory document ({reason})");
                RefreshOutcome::KeptCurrent(reason)
            }
        }
    }

    /// Approved requests as CSV, named after today's date.
    pub fn export_approved(&self) -> Result<Export, ExportError> {
        Ok(Export {
            filename: approved_export_filename(Local::now().date_naive()),
            bytes: approved_requests_csv(self.document.approved())?,
        })
    }

    pub fn export_stock(&self) -> Result<Export, ExportError> {
        Ok(Export {
            filename: STOCK_EXPORT_FILENAME.to_string(),
            bytes: stock_csv(self.document.ledger())?,
        })
    }

    fn persist<T>(&self, value: T) -> Saved<T> {
        let save_error = match self.store.save(&self.document) {
            Ok(()) => None,
            Err(e) => {
                tracing::warn!("failed to save inventory document: {e}");
                Some(e)
            }
        };
        Saved { value, save_error }
    }
}

/// Local wall-clock time at the precision the document stores.
fn now() -> NaiveDateTime {
    Local::now().naive_local().trunc_subsecs(0)
}
