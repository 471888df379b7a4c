use chrono::Utc;
use uuid::Uuid;

use crate::application::access::{self, Identity};
use crate::application::error::AppError;
use crate::application::ports::lost_found_repository::LostFoundRepository;
use crate::domain::lostfound::item::{ItemStatus, LostFoundItem};

const ALREADY_FOUND: &str = "Item is already marked as found.";

pub struct MarkFound<'a, R: LostFoundRepository + ?Sized> {
    pub items: &'a R,
}

impl<'a, R: LostFoundRepository + ?Sized> MarkFound<'a, R> {
    pub async fn execute(&self, identity: &Identity, id: Uuid) -> Result<LostFoundItem, AppError> {
        let item = self
            .items
            .get(id)
            .await?
            .ok_or(AppError::NotFound("item"))?;
        access::require_owner(identity, &item)?;
        if item.status == ItemStatus::Found {
            return Err(AppError::invalid(ALREADY_FOUND));
        }
        let item = self
            .items
            .mark_found(id, Utc::now())
            .await?
            .ok_or_else(|| AppError::invalid(ALREADY_FOUND))?;
        tracing::info!(item_id = %id, "item_marked_found");
        Ok(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::InMemoryStore;

    #[tokio::test]
    async fn marks_found_once() {
        let store = InMemoryStore::default();
        let reporter = store.seed_user("r@campus.edu", false);
        let item = store.seed_item(reporter.id);
        let uc = MarkFound { items: &store };
        let id = Identity::from_user(&reporter);
        let found = uc.execute(&id, item.id).await.unwrap();
        assert_eq!(found.status, ItemStatus::Found);
        assert!(found.is_resolved);
        assert!(found.date_occurred.is_some());
        let again = uc.execute(&id, item.id).await;
        assert!(matches!(again, Err(AppError::Invalid(m)) if m == ALREADY_FOUND));
    }

    #[tokio::test]
    async fn strangers_cannot_mark_found() {
        let store = InMemoryStore::default();
        let reporter = store.seed_user("r@campus.edu", false);
        let other = store.seed_user("o@campus.edu", false);
        let item = store.seed_item(reporter.id);
        let res = MarkFound { items: &store }
            .execute(&Identity::from_user(&other), item.id)
            .await;
        assert!(matches!(res, Err(AppError::Forbidden(_))));
    }
}
