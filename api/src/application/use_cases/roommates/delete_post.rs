use uuid::Uuid;

use crate::application::access::{self, Identity};
use crate::application::error::AppError;
use crate::application::ports::image_repository::ImageRepository;
use crate::application::ports::roommate_repository::RoommateRepository;
use crate::application::ports::storage_port::StoragePort;
use crate::domain::attachments::image::ImageParent;

pub struct DeleteRoommatePost<'a, R, I, S>
where
    R: RoommateRepository + ?Sized,
    I: ImageRepository + ?Sized,
    S: StoragePort + ?Sized,
{
    pub posts: &'a R,
    pub images: &'a I,
    pub storage: &'a S,
}

impl<'a, R, I, S> DeleteRoommatePost<'a, R, I, S>
where
    R: RoommateRepository + ?Sized,
    I: ImageRepository + ?Sized,
    S: StoragePort + ?Sized,
{
    pub async fn execute(&self, identity: &Identity, id: Uuid) -> Result<(), AppError> {
        let post = self
            .posts
            .get(id)
            .await?
            .ok_or(AppError::NotFound("roommate post"))?;
        access::require_owner(identity, &post)?;
        let gallery = self.images.list(ImageParent::Roommate, id).await?;
        if !self.posts.delete(id).await? {
            return Err(AppError::NotFound("roommate post"));
        }
        for image in gallery {
            if let Err(err) = self.storage.delete(&image.storage_key).await {
                tracing::warn!(post_id = %id, key = %image.storage_key, error = ?err, "failed to remove stored image");
            }
        }
        tracing::info!(post_id = %id, "roommate_post_deleted");
        Ok(())
    }
}
