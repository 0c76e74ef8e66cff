//! Aggregate figures for the dashboard, derived on demand from a document.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::document::InventoryDocument;
use crate::stock::StockStatus;

/// Item counts per stock status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub critical: usize,
    pub warning: usize,
    pub normal: usize,
}

impl StatusCounts {
    pub fn get(&self, status: StockStatus) -> usize {
        match status {
            StockStatus::Critical => self.critical,
            StockStatus::Warning => self.warning,
            StockStatus::Normal => self.normal,
        }
    }

    fn bump(&mut self, status: StockStatus) {
        match status {
            StockStatus::Critical => self.critical += 1,
            StockStatus::Warning => self.warning += 1,
            StockStatus::Normal => self.normal += 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocationTotal {
    pub location: String,
    pub quantity: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemQuantity {
    pub name: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InventoryMetrics {
    pub total_items: usize,
    pub total_quantity: u64,
    pub pending_requests: usize,
    pub approved_requests: usize,
    pub by_status: StatusCounts,
    /// Sorted by location label.
    pub by_location: Vec<LocationTotal>,
    /// Catalog order.
    pub by_item: Vec<ItemQuantity>,
}

impl InventoryMetrics {
    pub fn compute(doc: &InventoryDocument) -> Self {
        let items = doc.items();

        let mut by_status = StatusCounts::default();
        let mut locations: BTreeMap<&str, u64> = BTreeMap::new();
        let mut total_quantity = 0u64;

        for item in items {
            by_status.bump(item.status());
            *locations.entry(item.location.as_str()).or_default() += u64::from(item.quantity);
            total_quantity += u64::from(item.quantity);
        }

        Self {
            total_items: items.len(),
            total_quantity,
            pending_requests: doc.pending().len(),
            approved_requests: doc.approved().len(),
            by_status,
            by_location: locations
                .into_iter()
                .map(|(location, quantity)| LocationTotal {
                    location: location.to_string(),
                    quantity,
                })
                .collect(),
            by_item: items
                .iter()
                .map(|item| ItemQuantity {
                    name: item.name.clone(),
                    quantity: item.quantity,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{CreateRequest, UpdateQuantity};
    use chrono::NaiveDate;
    use stockroom_core::ItemCode;

    #[test]
    fn seed_metrics() {
        let m = InventoryDocument::seed().metrics();
        assert_eq!(m.total_items, 10);
        assert_eq!(m.total_quantity, 2480);
        assert_eq!(m.pending_requests, 0);
        assert_eq!(m.approved_requests, 0);
        // 25 and 50 are critical; 75, 100, 80 warning; the rest normal.
        assert_eq!(
            m.by_status,
            StatusCounts {
                critical: 2,
                warning: 3,
                normal: 5,
            }
        );
        assert_eq!(m.by_status.get(StockStatus::Warning), 3);
    }

    #[test]
    fn location_sums_add_up_to_total() {
        let mut doc = InventoryDocument::seed();
        doc.update_quantity(&UpdateQuantity {
            name: "Çelik Sac".to_string(),
            quantity: 1,
        });
        let m = doc.metrics();
        let sum: u64 = m.by_location.iter().map(|l| l.quantity).sum();
        assert_eq!(sum, m.total_quantity);
        assert_eq!(m.by_location[0].location, "A-01");
        assert_eq!(m.by_location[0].quantity, 1);
        assert_eq!(m.by_item[0].name, "Çelik Sac");
    }

    #[test]
    fn request_counts_follow_queue() {
        let mut doc = InventoryDocument::seed();
        let at = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        for amount in [1, 2] {
            doc.create_request(&CreateRequest {
                item_code: ItemCode::new("M008").unwrap(),
                amount,
                requested_at: at,
            })
            .unwrap();
        }
        doc.approve_all();
        doc.create_request(&CreateRequest {
            item_code: ItemCode::new("M008").unwrap(),
            amount: 3,
            requested_at: at,
        })
        .unwrap();

        let m = doc.metrics();
        assert_eq!(m.pending_requests, 1);
        assert_eq!(m.approved_requests, 2);
    }
}
