use chrono::{DateTime, Utc};

use crate::domain::lostfound::item::ItemStatus;

#[derive(Debug, Clone)]
pub struct ItemInput {
    pub item_name: String,
    pub description: Option<String>,
    pub status: Option<ItemStatus>,
    pub location: Option<String>,
    pub date_occurred: Option<DateTime<Utc>>,
    pub contact_info: Option<String>,
    pub category: Option<String>,
    pub color: Option<String>,
    pub brand: Option<String>,
}

/// Editable fields. `status` and `is_resolved` only move through
/// mark found, claim and unclaim.
#[derive(Debug, Clone, Default)]
pub struct ItemChanges {
    pub item_name: Option<String>,
    pub description: Option<Option<String>>,
    pub location: Option<Option<String>>,
    pub date_occurred: Option<Option<DateTime<Utc>>>,
    pub contact_info: Option<Option<String>>,
    pub category: Option<Option<String>>,
    pub color: Option<Option<String>>,
    pub brand: Option<Option<String>>,
}
