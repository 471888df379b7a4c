use uuid::Uuid;

use crate::application::access::{self, Identity};
use crate::application::error::AppError;
use crate::application::ports::image_repository::ImageRepository;
use crate::domain::attachments::image::{Image, ImageParent};

pub struct SetPrimaryImage<'a, R: ImageRepository + ?Sized> {
    pub images: &'a R,
}

impl<'a, R: ImageRepository + ?Sized> SetPrimaryImage<'a, R> {
    pub async fn execute(
        &self,
        identity: &Identity,
        parent: ImageParent,
        image_id: Uuid,
    ) -> Result<Image, AppError> {
        let image = self
            .images
            .get(parent, image_id)
            .await?
            .ok_or(AppError::NotFound("image"))?;
        let owner = self
            .images
            .parent_owner(parent, image.parent_id)
            .await?
            .ok_or(AppError::NotFound("image"))?;
        access::require_owner(identity, &owner)?;
        let image = self
            .images
            .set_primary(parent, image_id)
            .await?
            .ok_or(AppError::NotFound("image"))?;
        tracing::info!(parent = ?parent, image_id = %image_id, "image_set_primary");
        Ok(image)
    }
}
