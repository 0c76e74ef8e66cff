//! The inventory document: ledger + request queue as one atomic unit.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use stockroom_core::{DomainError, DomainResult, ItemCode, RequestId};

use crate::metrics::InventoryMetrics;
use crate::request::{Request, RequestQueue};
use crate::stock::{StockItem, StockLedger};

/// Command: create a withdrawal request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateRequest {
    pub item_code: ItemCode,
    pub amount: u32,
    pub requested_at: NaiveDateTime,
}

/// Command: overwrite an item's quantity, addressed by display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateQuantity {
    pub name: String,
    pub quantity: u32,
}

/// Stored shape of the document.
///
/// Every field falls back to its default when absent so partially written or
/// older files still load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    #[serde(default)]
    pub stock_items: StockLedger,
    #[serde(default)]
    pub pending_requests: Vec<Request>,
    #[serde(default)]
    pub approved_requests: Vec<Request>,
    #[serde(default)]
    pub request_counter: RequestId,
}

/// Ledger, pending list, approved list and counter, always saved and loaded
/// together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "DocumentRecord", into = "DocumentRecord")]
pub struct InventoryDocument {
    ledger: StockLedger,
    requests: RequestQueue,
}

impl InventoryDocument {
    /// The first-run document: seed catalog, no requests, counter at 1.
    pub fn seed() -> Self {
        Self {
            ledger: StockLedger::seed(),
            requests: RequestQueue::new(),
        }
    }

    pub fn from_parts(ledger: StockLedger, requests: RequestQueue) -> Self {
        Self { ledger, requests }
    }

    pub fn ledger(&self) -> &StockLedger {
        &self.ledger
    }

    pub fn requests(&self) -> &RequestQueue {
        &self.requests
    }

    pub fn items(&self) -> &[StockItem] {
        self.ledger.items()
    }

    pub fn pending(&self) -> &[Request] {
        self.requests.pending()
    }

    pub fn approved(&self) -> &[Request] {
        self.requests.approved()
    }

    pub fn next_request_id(&self) -> RequestId {
        self.requests.next_id()
    }

    pub fn metrics(&self) -> InventoryMetrics {
        InventoryMetrics::compute(self)
    }

    /// Create a pending request against the item with `cmd.item_code`.
    ///
    /// Unknown codes and out-of-range amounts are validation errors; the
    /// document is unchanged on error.
    pub fn create_request(&mut self, cmd: &CreateRequest) -> DomainResult<Request> {
        let item = self
            .ledger
            .find_by_code(&cmd.item_code)
            .ok_or_else(|| DomainError::validation(format!("unknown item code {}", cmd.item_code)))?;
        self.requests.create(item, cmd.amount, cmd.requested_at)
    }

    pub fn approve_all(&mut self) -> usize {
        self.requests.approve_all()
    }

    pub fn clear_pending(&mut self) -> usize {
        self.requests.clear_pending()
    }

    /// Returns `false` when no item carries that name (nothing changes).
    pub fn update_quantity(&mut self, cmd: &UpdateQuantity) -> bool {
        self.ledger.update_quantity(&cmd.name, cmd.quantity)
    }

    /// Seed catalog, both queues emptied, counter back to 1.
    pub fn reset_to_defaults(&mut self) {
        *self = Self::seed();
    }
}

impl Default for InventoryDocument {
    fn default() -> Self {
        Self::seed()
    }
}

impl TryFrom<DocumentRecord> for InventoryDocument {
    type Error = DomainError;

    fn try_from(record: DocumentRecord) -> Result<Self, Self::Error> {
        let requests = RequestQueue::from_parts(
            record.pending_requests,
            record.approved_requests,
            record.request_counter,
        )?;
        Ok(Self {
            ledger: record.stock_items,
            requests,
        })
    }
}

impl From<InventoryDocument> for DocumentRecord {
    fn from(doc: InventoryDocument) -> Self {
        let (pending_requests, approved_requests, request_counter) = doc.requests.into_parts();
        Self {
            stock_items: doc.ledger,
            pending_requests,
            approved_requests,
            request_counter,
        }
    }
}
