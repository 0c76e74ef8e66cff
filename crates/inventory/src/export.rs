//! Delimited-text exports for download.

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use crate::request::Request;
use crate::stock::StockLedger;

/// Spreadsheet tools need the byte-order mark to detect UTF-8.
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

pub const APPROVED_EXPORT_HEADER: [&str; 6] = ["id", "item_code", "item_name", "amount", "date", "status"];
pub const STOCK_EXPORT_HEADER: [&str; 5] = ["code", "name", "quantity", "location", "status"];
pub const STOCK_EXPORT_FILENAME: &str = "stock_status.csv";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write csv record: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to flush csv output: {0}")]
    Flush(#[from] std::io::Error),
}

#[derive(Serialize)]
struct StockRow<'a> {
    code: &'a str,
    name: &'a str,
    quantity: u32,
    location: &'a str,
    status: &'static str,
}

fn writer() -> csv::Writer<Vec<u8>> {
    csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(UTF8_BOM.to_vec())
}

fn finish(wtr: csv::Writer<Vec<u8>>) -> Result<Vec<u8>, ExportError> {
    wtr.into_inner().map_err(|e| ExportError::Flush(e.into_error()))
}

/// Approved requests as CSV: header row, then one row per request.
///
/// The header is written even when there are no requests.
pub fn approved_requests_csv(requests: &[Request]) -> Result<Vec<u8>, ExportError> {
    let mut wtr = writer();
    wtr.write_record(APPROVED_EXPORT_HEADER)?;
    for request in requests {
        wtr.serialize(request)?;
    }
    finish(wtr)
}

/// Download name for the approved export, stamped with `date`.
pub fn approved_export_filename(date: NaiveDate) -> String {
    format!("approved_requests_{}.csv", date.format("%Y%m%d"))
}

/// Current catalog as CSV with each item's status label.
pub fn stock_csv(ledger: &StockLedger) -> Result<Vec<u8>, ExportError> {
    let mut wtr = writer();
    wtr.write_record(STOCK_EXPORT_HEADER)?;
    for item in ledger.items() {
        wtr.serialize(StockRow {
            code: item.code.as_str(),
            name: &item.name,
            quantity: item.quantity,
            location: &item.location,
            status: item.status().label(),
        })?;
    }
    finish(wtr)
}
