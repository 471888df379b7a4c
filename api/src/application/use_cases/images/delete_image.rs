use uuid::Uuid;

use crate::application::access::{self, Identity};
use crate::application::error::AppError;
use crate::application::ports::image_repository::ImageRepository;
use crate::application::ports::storage_port::StoragePort;
use crate::domain::attachments::image::ImageParent;

pub struct DeleteImage<'a, R, S>
where
    R: ImageRepository + ?Sized,
    S: StoragePort + ?Sized,
{
    pub images: &'a R,
    pub storage: &'a S,
}

impl<'a, R, S> DeleteImage<'a, R, S>
where
    R: ImageRepository + ?Sized,
    S: StoragePort + ?Sized,
{
    pub async fn execute(
        &self,
        identity: &Identity,
        parent: ImageParent,
        image_id: Uuid,
    ) -> Result<(), AppError> {
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
        let removed = self
            .images
            .remove(parent, image_id)
            .await?
            .ok_or(AppError::NotFound("image"))?;
        if let Err(err) = self.storage.delete(&removed.storage_key).await {
            tracing::warn!(key = %removed.storage_key, error = ?err, "failed to remove stored image");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::{InMemoryStore, blob};

    #[tokio::test]
    async fn deleting_the_primary_promotes_the_oldest_survivor() {
        let store = InMemoryStore::default();
        let owner = store.seed_user("o@campus.edu", false);
        let book = store.seed_book(owner.id);
        let first = store
            .add(ImageParent::Book, book.id, &blob("books/1.png"), false)
            .await
            .unwrap();
        let second = store
            .add(ImageParent::Book, book.id, &blob("books/2.png"), false)
            .await
            .unwrap();
        let _third = store
            .add(ImageParent::Book, book.id, &blob("books/3.png"), false)
            .await
            .unwrap();

        let uc = DeleteImage {
            images: &store,
            storage: &store,
        };
        uc.execute(&Identity::from_user(&owner), ImageParent::Book, first.id)
            .await
            .unwrap();
        assert_eq!(store.primary_count(ImageParent::Book, book.id), 1);
        let second_now = ImageRepository::get(&store, ImageParent::Book, second.id)
            .await
            .unwrap()
            .unwrap();
        assert!(second_now.is_primary);
    }

    #[tokio::test]
    async fn staff_may_delete_any_image() {
        let store = InMemoryStore::default();
        let owner = store.seed_user("o@campus.edu", false);
        let staff = store.seed_user("s@campus.edu", true);
        let book = store.seed_book(owner.id);
        let image = store
            .add(ImageParent::Book, book.id, &blob("books/1.png"), false)
            .await
            .unwrap();
        let uc = DeleteImage {
            images: &store,
            storage: &store,
        };
        uc.execute(&Identity::from_user(&staff), ImageParent::Book, image.id)
            .await
            .unwrap();
        assert_eq!(store.primary_count(ImageParent::Book, book.id), 0);
    }
}
