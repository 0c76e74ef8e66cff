//! Inventory domain module: stock ledger and withdrawal requests.
//!
//! This crate contains business rules for the warehouse dashboard, implemented
//! purely as deterministic domain logic (no IO, no HTTP, no storage). Callers
//! pass timestamps in; nothing here reads the clock.

pub mod document;
pub mod export;
pub mod metrics;
pub mod request;
pub mod stock;

pub use document::{CreateRequest, DocumentRecord, InventoryDocument, UpdateQuantity};
pub use export::{
    APPROVED_EXPORT_HEADER, ExportError, STOCK_EXPORT_FILENAME, STOCK_EXPORT_HEADER,
    approved_export_filename, approved_requests_csv, stock_csv,
};
pub use metrics::{InventoryMetrics, ItemQuantity, LocationTotal, StatusCounts};
pub use request::{Request, RequestQueue, RequestStatus};
pub use stock::{StockItem, StockLedger, StockStatus, seed_items, status_of};
