use serde::{Deserialize, Serialize};

use stockroom_core::{DomainError, DomainResult, Entity, ItemCode, ValueObject};

/// Quantity at or below which an item is critical.
pub const CRITICAL_MAX: u32 = 50;
/// Quantity at or below which a non-critical item is a warning.
pub const WARNING_MAX: u32 = 100;

/// Stock level classification, a pure function of quantity.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockStatus {
    Critical,
    Warning,
    Normal,
}

impl ValueObject for StockStatus {}

impl StockStatus {
    /// Classify a quantity. Boundaries belong to the lower bucket (50 is
    /// critical, 100 is a warning).
    pub fn of(quantity: u32) -> Self {
        if quantity <= CRITICAL_MAX {
            StockStatus::Critical
        } else if quantity <= WARNING_MAX {
            StockStatus::Warning
        } else {
            StockStatus::Normal
        }
    }

    /// Display label.
    pub fn label(self) -> &'static str {
        match self {
            StockStatus::Critical => "Critical",
            StockStatus::Warning => "Warning",
            StockStatus::Normal => "Normal",
        }
    }

    /// Styling class used by presentation layers.
    pub fn class(self) -> &'static str {
        match self {
            StockStatus::Critical => "critical",
            StockStatus::Warning => "warning",
            StockStatus::Normal => "normal",
        }
    }
}

/// Shorthand for [`StockStatus::of`].
pub fn status_of(quantity: u32) -> StockStatus {
    StockStatus::of(quantity)
}

/// A catalog entry: one stocked material at one shelf location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockItem {
    pub code: ItemCode,
    pub name: String,
    pub quantity: u32,
    pub location: String,
}

impl StockItem {
    pub fn new(
        code: ItemCode,
        name: impl Into<String>,
        quantity: u32,
        location: impl Into<String>,
    ) -> Self {
        Self {
            code,
            name: name.into(),
            quantity,
            location: location.into(),
        }
    }

    pub fn status(&self) -> StockStatus {
        StockStatus::of(self.quantity)
    }
}

impl Entity for StockItem {
    type Id = ItemCode;

    fn id(&self) -> &Self::Id {
        &self.code
    }
}

const SEED: [(&str, &str, u32, &str); 10] = [
    ("M001", "Çelik Sac", 150, "A-01"),
    ("M002", "Alüminyum Profil", 75, "A-02"),
    ("M003", "Paslanmaz Çelik Boru", 200, "B-01"),
    ("M004", "Kauçuk Conta", 300, "B-02"),
    ("M005", "Elektrik Kablosu", 500, "C-01"),
    ("M006", "Hidrolik Yağ", 25, "C-02"),
    ("M007", "Rulman", 100, "D-01"),
    ("M008", "Vida Seti", 1000, "D-02"),
    ("M009", "Motor Yağı", 50, "E-01"),
    ("M010", "Fren Balatası", 80, "E-02"),
];

/// The fixed default catalog used on first run and on reset.
pub fn seed_items() -> Vec<StockItem> {
    SEED.iter()
        .map(|&(code, name, quantity, location)| {
            StockItem::new(ItemCode::from_static(code), name, quantity, location)
        })
        .collect()
}

/// Ordered catalog of stock items with unique codes.
///
/// Serializes as a plain JSON array; deserialization rejects duplicate codes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<StockItem>", into = "Vec<StockItem>")]
pub struct StockLedger {
    items: Vec<StockItem>,
}

impl StockLedger {
    pub fn seed() -> Self {
        Self { items: seed_items() }
    }

    /// Build a ledger from arbitrary items, enforcing code uniqueness.
    pub fn from_items(items: Vec<StockItem>) -> DomainResult<Self> {
        for (idx, item) in items.iter().enumerate() {
            if items[..idx].iter().any(|other| other.code == item.code) {
                return Err(DomainError::invariant(format!(
                    "duplicate item code {}",
                    item.code
                )));
            }
        }
        Ok(Self { items })
    }

    /// Items in insertion order.
    pub fn items(&self) -> &[StockItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn find_by_code(&self, code: &ItemCode) -> Option<&StockItem> {
        self.items.iter().find(|item| &item.code == code)
    }

    /// Set the quantity of the first item named `name`.
    ///
    /// Returns `false` (and changes nothing) when no item has that name.
    pub fn update_quantity(&mut self, name: &str, new_quantity: u32) -> bool {
        match self.items.iter_mut().find(|item| item.name == name) {
            Some(item) => {
                item.quantity = new_quantity;
                true
            }
            None => false,
        }
    }
}

impl Default for StockLedger {
    fn default() -> Self {
        Self::seed()
    }
}

impl TryFrom<Vec<StockItem>> for StockLedger {
    type Error = DomainError;

    fn try_from(items: Vec<StockItem>) -> Result<Self, Self::Error> {
        Self::from_items(items)
    }
}

impl From<StockLedger> for Vec<StockItem> {
    fn from(ledger: StockLedger) -> Self {
        ledger.items
    }
}
