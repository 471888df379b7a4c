use chrono::{DateTime, Utc};
use uuid::Uuid;

choice_enum! {
    pub enum ItemStatus ("item status") {
        Lost => ("lost", "Lost"),
        Found => ("found", "Found"),
    }
    default = Lost;
}

#[derive(Debug, Clone)]
pub struct LostFoundItem {
    pub id: Uuid,
    pub item_name: String,
    pub description: Option<String>,
    pub status: ItemStatus,
    pub location: Option<String>,
    pub date_reported: DateTime<Utc>,
    pub date_occurred: Option<DateTime<Utc>>,
    pub reporter: Uuid,
    pub claimed_by: Option<Uuid>,
    pub is_resolved: bool,
    pub image_key: Option<String>,
    pub contact_info: Option<String>,
    pub category: Option<String>,
    pub color: Option<String>,
    pub brand: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A found item without an occurrence date is stamped with the save time.
pub fn stamp_occurred(
    status: ItemStatus,
    date_occurred: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    match (status, date_occurred) {
        (ItemStatus::Found, None) => Some(now),
        (_, existing) => existing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn found_items_get_an_occurrence_date() {
        let now = Utc::now();
        assert_eq!(stamp_occurred(ItemStatus::Found, None, now), Some(now));
        assert_eq!(stamp_occurred(ItemStatus::Lost, None, now), None);
    }

    #[test]
    fn existing_occurrence_date_is_kept() {
        let now = Utc::now();
        let earlier = now - Duration::days(2);
        assert_eq!(
            stamp_occurred(ItemStatus::Found, Some(earlier), now),
            Some(earlier)
        );
    }
}
