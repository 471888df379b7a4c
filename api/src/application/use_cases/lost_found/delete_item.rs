use uuid::Uuid;

use crate::application::access::{self, Identity};
use crate::application::error::AppError;
use crate::application::ports::lost_found_repository::LostFoundRepository;
use crate::application::ports::storage_port::StoragePort;

pub struct DeleteItem<'a, R, S>
where
    R: LostFoundRepository + ?Sized,
    S: StoragePort + ?Sized,
{
    pub items: &'a R,
    pub storage: &'a S,
}

impl<'a, R, S> DeleteItem<'a, R, S>
where
    R: LostFoundRepository + ?Sized,
    S: StoragePort + ?Sized,
{
    pub async fn execute(&self, identity: &Identity, id: Uuid) -> Result<(), AppError> {
        let item = self
            .items
            .get(id)
            .await?
            .ok_or(AppError::NotFound("item"))?;
        access::require_owner(identity, &item)?;
        if !self.items.delete(id).await? {
            return Err(AppError::NotFound("item"));
        }
        if let Some(key) = item.image_key {
            if let Err(err) = self.storage.delete(&key).await {
                tracing::warn!(item_id = %id, key = %key, error = ?err, "failed to remove stored image");
            }
        }
        Ok(())
    }
}
