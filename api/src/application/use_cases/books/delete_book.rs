use uuid::Uuid;

use crate::application::access::{self, Identity};
use crate::application::error::AppError;
use crate::application::ports::book_repository::BookRepository;
use crate::application::ports::image_repository::ImageRepository;
use crate::application::ports::storage_port::StoragePort;
use crate::domain::attachments::image::ImageParent;

pub struct DeleteBook<'a, B, I, S>
where
    B: BookRepository + ?Sized,
    I: ImageRepository + ?Sized,
    S: StoragePort + ?Sized,
{
    pub books: &'a B,
    pub images: &'a I,
    pub storage: &'a S,
}

impl<'a, B, I, S> DeleteBook<'a, B, I, S>
where
    B: BookRepository + ?Sized,
    I: ImageRepository + ?Sized,
    S: StoragePort + ?Sized,
{
    pub async fn execute(&self, identity: &Identity, id: Uuid) -> Result<(), AppError> {
        let book = self
            .books
            .get(id)
            .await?
            .ok_or(AppError::NotFound("book"))?;
        access::require_owner(identity, &book)?;
        let gallery = self.images.list(ImageParent::Book, id).await?;
        if !self.books.delete(id).await? {
            return Err(AppError::NotFound("book"));
        }
        for image in gallery {
            if let Err(err) = self.storage.delete(&image.storage_key).await {
                tracing::warn!(book_id = %id, key = %image.storage_key, error = ?err, "failed to remove stored image");
            }
        }
        tracing::info!(book_id = %id, "book_deleted");
        Ok(())
    }
}
