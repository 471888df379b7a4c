use uuid::Uuid;

use crate::application::error::AppError;
use crate::application::ports::image_repository::ImageRepository;
use crate::domain::attachments::image::{Image, ImageParent, sort_gallery};

pub struct ListImages<'a, R: ImageRepository + ?Sized> {
    pub images: &'a R,
}

impl<'a, R: ImageRepository + ?Sized> ListImages<'a, R> {
    pub async fn execute(&self, parent: ImageParent, parent_id: Uuid) -> Result<Vec<Image>, AppError> {
        if self.images.parent_owner(parent, parent_id).await?.is_none() {
            return Err(AppError::NotFound(parent_label(parent)));
        }
        let mut images = self.images.list(parent, parent_id).await?;
        sort_gallery(&mut images);
        Ok(images)
    }
}

pub fn parent_label(parent: ImageParent) -> &'static str {
    match parent {
        ImageParent::Book => "book",
        ImageParent::Event => "event",
        ImageParent::Roommate => "roommate post",
    }
}
