use uuid::Uuid;

use crate::application::access::Identity;
use crate::application::error::AppError;
use crate::application::ports::lost_found_repository::LostFoundRepository;
use crate::domain::lostfound::item::LostFoundItem;

const ALREADY_CLAIMED: &str = "This item has already been claimed.";

/// Any signed-in user may claim an unclaimed item.
pub struct ClaimItem<'a, R: LostFoundRepository + ?Sized> {
    pub items: &'a R,
}

impl<'a, R: LostFoundRepository + ?Sized> ClaimItem<'a, R> {
    pub async fn execute(&self, identity: &Identity, id: Uuid) -> Result<LostFoundItem, AppError> {
        let item = self
            .items
            .get(id)
            .await?
            .ok_or(AppError::NotFound("item"))?;
        if item.claimed_by.is_some() {
            return Err(AppError::invalid(ALREADY_CLAIMED));
        }
        let item = self
            .items
            .claim(id, identity.id)
            .await?
            .ok_or_else(|| AppError::invalid(ALREADY_CLAIMED))?;
        tracing::info!(item_id = %id, claimed_by = %identity.id, "item_claimed");
        Ok(item)
    }
}
