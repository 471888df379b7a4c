use uuid::Uuid;

use crate::application::access::{self, Identity};
use crate::application::error::AppError;
use crate::application::ports::event_repository::EventRepository;
use crate::application::ports::image_repository::ImageRepository;
use crate::application::ports::storage_port::StoragePort;
use crate::domain::attachments::image::ImageParent;

pub struct DeleteEvent<'a, E, I, S>
where
    E: EventRepository + ?Sized,
    I: ImageRepository + ?Sized,
    S: StoragePort + ?Sized,
{
    pub events: &'a E,
    pub images: &'a I,
    pub storage: &'a S,
}

impl<'a, E, I, S> DeleteEvent<'a, E, I, S>
where
    E: EventRepository + ?Sized,
    I: ImageRepository + ?Sized,
    S: StoragePort + ?Sized,
{
    pub async fn execute(&self, identity: &Identity, id: Uuid) -> Result<(), AppError> {
        let event = self
            .events
            .get(id)
            .await?
            .ok_or(AppError::NotFound("event"))?;
        access::require_owner(identity, &event)?;
        let gallery = self.images.list(ImageParent::Event, id).await?;
        if !self.events.delete(id).await? {
            return Err(AppError::NotFound("event"));
        }
        for image in gallery {
            if let Err(err) = self.storage.delete(&image.storage_key).await {
                tracing::warn!(event_id = %id, key = %image.storage_key, error = ?err, "failed to remove stored image");
            }
        }
        tracing::info!(event_id = %id, "event_deleted");
        Ok(())
    }
}
