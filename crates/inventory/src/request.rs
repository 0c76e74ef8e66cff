use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use stockroom_core::{DomainError, DomainResult, Entity, ItemCode, RequestId};

use crate::stock::StockItem;

/// Lifecycle state of a withdrawal request.
///
/// Written as `"Pending"`/`"Approved"`. The Turkish labels used by older
/// `depo_data.json` files are accepted on read.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestStatus {
    #[serde(alias = "Bekliyor")]
    Pending,
    #[serde(alias = "Onaylandı")]
    Approved,
}

/// A withdrawal request against one stock item.
///
/// `item_name` is a snapshot taken at creation time; later renames or quantity
/// updates on the item do not affect it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    pub id: RequestId,
    pub item_code: ItemCode,
    pub item_name: String,
    pub amount: u32,
    #[serde(rename = "date", with = "request_date")]
    pub created_at: NaiveDateTime,
    pub status: RequestStatus,
}

impl Entity for Request {
    type Id = RequestId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// `date` wire format: local wall-clock time, second precision.
pub(crate) mod request_date {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&value.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }
}

/// Pending and approved requests plus the id counter.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RequestQueue {
    pending: Vec<Request>,
    approved: Vec<Request>,
    next_id: RequestId,
}

impl RequestQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a queue from stored parts.
    ///
    /// Every pending entry must be `Pending`, every approved entry `Approved`,
    /// and ids must be unique across both lists. The counter is raised above
    /// the highest stored id so identifiers are never handed out twice.
    pub fn from_parts(
        pending: Vec<Request>,
        approved: Vec<Request>,
        next_id: RequestId,
    ) -> DomainResult<Self> {
        if let Some(r) = pending.iter().find(|r| r.status != RequestStatus::Pending) {
            return Err(DomainError::invariant(format!(
                "pending request #{} has status {:?}",
                r.id, r.status
            )));
        }
        if let Some(r) = approved.iter().find(|r| r.status != RequestStatus::Approved) {
            return Err(DomainError::invariant(format!(
                "approved request #{} has status {:?}",
                r.id, r.status
            )));
        }

        let mut ids: Vec<RequestId> = pending.iter().chain(approved.iter()).map(|r| r.id).collect();
        ids.sort();
        if ids.first().is_some_and(|id| id.value() == 0) {
            return Err(DomainError::invariant("request id 0 is not valid"));
        }
        if let Some(pair) = ids.windows(2).find(|w| w[0] == w[1]) {
            return Err(DomainError::invariant(format!("duplicate request id #{}", pair[0])));
        }

        let floor = ids.last().map(|id| id.next()).unwrap_or(RequestId::FIRST);
        Ok(Self {
            pending,
            approved,
            next_id: next_id.max(floor),
        })
    }

    pub fn pending(&self) -> &[Request] {
        &self.pending
    }

    pub fn approved(&self) -> &[Request] {
        &self.approved
    }

    /// The id the next created request will receive.
    pub fn next_id(&self) -> RequestId {
        self.next_id
    }

    /// Create a pending request for `amount` units of `item`.
    ///
    /// Requires `1 <= amount <= item.quantity`. Stock is not reserved or
    /// decremented.
    pub fn create(
        &mut self,
        item: &StockItem,
        amount: u32,
        at: NaiveDateTime,
    ) -> DomainResult<Request> {
        if amount == 0 {
            return Err(DomainError::validation("amount must be at least 1"));
        }
        if amount > item.quantity {
            return Err(DomainError::validation(format!(
                "amount {amount} exceeds available stock {} for {}",
                item.quantity, item.code
            )));
        }

        let request = Request {
            id: self.next_id,
            item_code: item.code.clone(),
            item_name: item.name.clone(),
            amount,
            created_at: at,
            status: RequestStatus::Pending,
        };
        self.next_id = self.next_id.next();
        self.pending.push(request.clone());
        Ok(request)
    }

    /// Approve every pending request, preserving order. Returns how many moved.
    pub fn approve_all(&mut self) -> usize {
        let moved = self.pending.len();
        self.approved.extend(self.pending.drain(..).map(|mut r| {
            r.status = RequestStatus::Approved;
            r
        }));
        moved
    }

    /// Discard every pending request. Returns how many were dropped.
    pub fn clear_pending(&mut self) -> usize {
        let dropped = self.pending.len();
        self.pending.clear();
        dropped
    }

    pub(crate) fn into_parts(self) -> (Vec<Request>, Vec<Request>, RequestId) {
        (self.pending, self.approved, self.next_id)
    }
}
