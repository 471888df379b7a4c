use uuid::Uuid;

use crate::application::access::{self, Identity};
use crate::application::error::AppError;
use crate::application::ports::image_repository::ImageRepository;
use crate::application::ports::storage_port::StoragePort;
use crate::application::use_cases::images::ImageUpload;
use crate::application::use_cases::images::list_images::parent_label;
use crate::domain::attachments::image::{Image, ImageParent};

pub struct UploadImage<'a, R, S>
where
    R: ImageRepository + ?Sized,
    S: StoragePort + ?Sized,
{
    pub images: &'a R,
    pub storage: &'a S,
}

impl<'a, R, S> UploadImage<'a, R, S>
where
    R: ImageRepository + ?Sized,
    S: StoragePort + ?Sized,
{
    pub async fn execute(
        &self,
        identity: &Identity,
        parent: ImageParent,
        parent_id: Uuid,
        upload: ImageUpload,
    ) -> Result<Image, AppError> {
        let owner = self
            .images
            .parent_owner(parent, parent_id)
            .await?
            .ok_or(AppError::NotFound(parent_label(parent)))?;
        access::require_owner(identity, &owner)?;
        if upload.bytes.is_empty() {
            return Err(AppError::field("image", "The submitted file is empty."));
        }
        if !upload.looks_like_image() {
            return Err(AppError::field(
                "image",
                "Upload a valid image. The file you uploaded was either not an image or a corrupted image.",
            ));
        }

        let stored = self
            .storage
            .store_image(
                parent.storage_area(),
                parent_id,
                upload.filename.as_deref(),
                &upload.bytes,
            )
            .await?;
        match self
            .images
            .add(parent, parent_id, &stored, upload.promote)
            .await
        {
            Ok(image) => {
                tracing::info!(parent = ?parent, parent_id = %parent_id, image_id = %image.id, size = stored.size, "image_uploaded");
                Ok(image)
            }
            Err(err) => {
                if let Err(cleanup) = self.storage.delete(&stored.key).await {
                    tracing::warn!(key = %stored.key, error = ?cleanup, "failed to remove orphaned upload");
                }
                Err(err.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::InMemoryStore;

    fn png(promote: bool) -> ImageUpload {
        ImageUpload {
            filename: Some("cover.png".into()),
            content_type: Some("image/png".into()),
            bytes: b"\x89PNG".to_vec(),
            promote,
        }
    }

    #[tokio::test]
    async fn first_image_is_primary_and_later_ones_are_not() {
        let store = InMemoryStore::default();
        let owner = store.seed_user("o@campus.edu", false);
        let book = store.seed_book(owner.id);
        let uc = UploadImage {
            images: &store,
            storage: &store,
        };
        let id = Identity::from_user(&owner);
        let first = uc.execute(&id, ImageParent::Book, book.id, png(false)).await.unwrap();
        let second = uc.execute(&id, ImageParent::Book, book.id, png(false)).await.unwrap();
        assert!(first.is_primary);
        assert!(!second.is_primary);
        assert_eq!(store.primary_count(ImageParent::Book, book.id), 1);
    }

    #[tokio::test]
    async fn promoted_upload_takes_over_primary() {
        let store = InMemoryStore::default();
        let owner = store.seed_user("o@campus.edu", false);
        let post = store.seed_roommate_post(owner.id);
        let uc = UploadImage {
            images: &store,
            storage: &store,
        };
        let id = Identity::from_user(&owner);
        uc.execute(&id, ImageParent::Roommate, post.id, png(false)).await.unwrap();
        let promoted = uc.execute(&id, ImageParent::Roommate, post.id, png(true)).await.unwrap();
        assert!(promoted.is_primary);
        assert_eq!(store.primary_count(ImageParent::Roommate, post.id), 1);
    }

    #[tokio::test]
    async fn stored_image_records_size_and_digest() {
        let store = InMemoryStore::default();
        let owner = store.seed_user("o@campus.edu", false);
        let event = store.seed_event(owner.id, true);
        let uc = UploadImage {
            images: &store,
            storage: &store,
        };
        let image = uc
            .execute(&Identity::from_user(&owner), ImageParent::Event, event.id, png(false))
            .await
            .unwrap();
        assert_eq!(image.size_bytes, 4);
        assert_eq!(
            image.content_hash,
            "0f4636c78f65d3639ece5a064b5ae753e3408614a14fb18ab4d7540d2c248543"
        );
        let stored = store.get(ImageParent::Event, image.id).await.unwrap().unwrap();
        assert_eq!(stored.content_hash, image.content_hash);
    }

    #[tokio::test]
    async fn strangers_cannot_upload() {
        let store = InMemoryStore::default();
        let owner = store.seed_user("o@campus.edu", false);
        let stranger = store.seed_user("x@campus.edu", false);
        let book = store.seed_book(owner.id);
        let uc = UploadImage {
            images: &store,
            storage: &store,
        };
        let res = uc
            .execute(&Identity::from_user(&stranger), ImageParent::Book, book.id, png(false))
            .await;
        assert!(matches!(res, Err(AppError::Forbidden(_))));
        assert!(store.blob_keys().is_empty());
    }

    #[tokio::test]
    async fn non_images_are_rejected() {
        let store = InMemoryStore::default();
        let owner = store.seed_user("o@campus.edu", false);
        let book = store.seed_book(owner.id);
        let uc = UploadImage {
            images: &store,
            storage: &store,
        };
        let upload = ImageUpload {
            filename: Some("notes.txt".into()),
            content_type: Some("text/plain".into()),
            bytes: b"hello".to_vec(),
            promote: false,
        };
        let res = uc
            .execute(&Identity::from_user(&owner), ImageParent::Book, book.id, upload)
            .await;
        assert!(matches!(res, Err(AppError::Validation(f)) if f.contains("image")));
    }
}
