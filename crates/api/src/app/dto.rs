use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use serde::Deserialize;
use serde_json::{Value, json};

use stockroom_core::{DomainError, DomainResult, ItemCode};
use stockroom_infra::{Export, Saved};
use stockroom_inventory::StockItem;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct CreateRequestBody {
    pub item_code: String,
    /// Signed so out-of-range input reaches domain validation instead of
    /// failing JSON extraction.
    pub amount: i64,
}

impl CreateRequestBody {
    pub fn into_parts(self) -> DomainResult<(ItemCode, u32)> {
        let code = ItemCode::new(self.item_code)?;
        let amount = u32::try_from(self.amount).map_err(|_| {
            DomainError::validation(format!("amount {} is out of range", self.amount))
        })?;
        Ok((code, amount))
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateQuantityBody {
    pub name: String,
    pub quantity: i64,
}

impl UpdateQuantityBody {
    pub fn quantity(&self) -> DomainResult<u32> {
        u32::try_from(self.quantity).map_err(|_| {
            DomainError::validation(format!("quantity {} is out of range", self.quantity))
        })
    }
}

// -------------------------
// Response mapping
// -------------------------

pub fn item_to_json(item: &StockItem) -> Value {
    let status = item.status();
    json!({
        "code": item.code.as_str(),
        "name": item.name,
        "quantity": item.quantity,
        "location": item.location,
        "status": status.label(),
        "status_class": status.class(),
    })
}

/// Merge the save outcome into a mutation response body.
pub fn with_save_outcome<T>(saved: &Saved<T>, mut body: Value) -> Value {
    if let Some(obj) = body.as_object_mut() {
        obj.insert("saved".to_string(), Value::Bool(saved.is_saved()));
        obj.insert(
            "warning".to_string(),
            saved.warning().map(Value::String).unwrap_or(Value::Null),
        );
    }
    body
}

/// CSV file download response.
pub fn csv_download(export: Export) -> axum::response::Response {
    let disposition = format!("attachment; filename=\"{}\"", export.filename);
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        export.bytes,
    )
        .into_response()
}
