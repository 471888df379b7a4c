use uuid::Uuid;

use crate::application::access::{self, Identity, OwnerRef};
use crate::application::error::AppError;
use crate::application::ports::lost_found_repository::LostFoundRepository;
use crate::domain::lostfound::item::LostFoundItem;

const NOT_CLAIMED: &str = "This item is not claimed by anyone.";

/// Releases a claim. Only the claimant or staff may do this; the reporter
/// cannot release somebody else's claim.
pub struct UnclaimItem<'a, R: LostFoundRepository + ?Sized> {
    pub items: &'a R,
}

impl<'a, R: LostFoundRepository + ?Sized> UnclaimItem<'a, R> {
    pub async fn execute(&self, identity: &Identity, id: Uuid) -> Result<LostFoundItem, AppError> {
        let item = self
            .items
            .get(id)
            .await?
            .ok_or(AppError::NotFound("item"))?;
        let claimant = item
            .claimed_by
            .ok_or_else(|| AppError::invalid(NOT_CLAIMED))?;
        access::require_owner(identity, &OwnerRef::User(claimant)).map_err(|_| {
            AppError::Forbidden("You can only unclaim items that you have claimed.".into())
        })?;
        let item = self
            .items
            .unclaim(id, claimant)
            .await?
            .ok_or_else(|| AppError::invalid(NOT_CLAIMED))?;
        tracing::info!(item_id = %id, "item_unclaimed");
        Ok(item)
    }
}
