use chrono::Utc;
use uuid::Uuid;

use crate::application::access::{self, Identity};
use crate::application::dto::lost_found::ItemChanges;
use crate::application::error::{AppError, FieldErrors};
use crate::application::ports::lost_found_repository::LostFoundRepository;
use crate::application::use_cases::common::{clean_change, require_text};
use crate::domain::lostfound::item::{LostFoundItem, stamp_occurred};

pub struct UpdateItem<'a, R: LostFoundRepository + ?Sized> {
    pub items: &'a R,
}

impl<'a, R: LostFoundRepository + ?Sized> UpdateItem<'a, R> {
    pub async fn execute(
        &self,
        identity: &Identity,
        id: Uuid,
        changes: ItemChanges,
    ) -> Result<LostFoundItem, AppError> {
        let mut item = self
            .items
            .get(id)
            .await?
            .ok_or(AppError::NotFound("item"))?;
        access::require_owner(identity, &item)?;

        let mut errors = FieldErrors::new();
        if let Some(name) = changes.item_name {
            item.item_name = require_text(&mut errors, "item_name", &name);
        }
        errors.into_result()?;
        if let Some(v) = clean_change(changes.description) {
            item.description = v;
        }
        if let Some(v) = clean_change(changes.location) {
            item.location = v;
        }
        if let Some(v) = changes.date_occurred {
            item.date_occurred = v;
        }
        if let Some(v) = clean_change(changes.contact_info) {
            item.contact_info = v;
        }
        if let Some(v) = clean_change(changes.category) {
            item.category = v;
        }
        if let Some(v) = clean_change(changes.color) {
            item.color = v;
        }
        if let Some(v) = clean_change(changes.brand) {
            item.brand = v;
        }
        item.date_occurred = stamp_occurred(item.status, item.date_occurred, Utc::now());

        self.items
            .update(&item)
            .await?
            .ok_or(AppError::NotFound("item"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::InMemoryStore;
    use crate::application::use_cases::lost_found::claim_item::ClaimItem;
    use crate::domain::lostfound::item::ItemStatus;

    #[tokio::test]
    async fn only_reporter_or_staff_may_edit() {
        let store = InMemoryStore::default();
        let reporter = store.seed_user("r@campus.edu", false);
        let other = store.seed_user("o@campus.edu", false);
        let item = store.seed_item(reporter.id);
        let uc = UpdateItem { items: &store };
        let res = uc
            .execute(
                &Identity::from_user(&other),
                item.id,
                ItemChanges {
                    color: Some(Some("red".into())),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(res, Err(AppError::Forbidden(_))));

        let updated = uc
            .execute(
                &Identity::from_user(&reporter),
                item.id,
                ItemChanges {
                    color: Some(Some("red".into())),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.color.as_deref(), Some("red"));
    }

    #[tokio::test]
    async fn editing_keeps_the_claim_and_resolution() {
        let store = InMemoryStore::default();
        let reporter = store.seed_user("r@campus.edu", false);
        let finder = store.seed_user("f@campus.edu", false);
        let item = store.seed_item(reporter.id);
        ClaimItem { items: &store }
            .execute(&Identity::from_user(&finder), item.id)
            .await
            .unwrap();

        let updated = UpdateItem { items: &store }
            .execute(
                &Identity::from_user(&reporter),
                item.id,
                ItemChanges {
                    location: Some(Some("Cafeteria".into())),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.location.as_deref(), Some("Cafeteria"));
        assert_eq!(updated.claimed_by, Some(finder.id));
        assert!(updated.is_resolved);
        assert_eq!(updated.status, ItemStatus::Lost);
    }
}
