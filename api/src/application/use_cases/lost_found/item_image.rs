use uuid::Uuid;

use crate::application::access::{self, Identity};
use crate::application::error::AppError;
use crate::application::ports::lost_found_repository::LostFoundRepository;
use crate::application::ports::storage_port::StoragePort;
use crate::application::use_cases::images::ImageUpload;
use crate::domain::lostfound::item::LostFoundItem;

/// Lost-and-found items carry a single optional photo. Replacing or
/// clearing it removes the previous bytes.
pub struct SetItemImage<'a, R, S>
where
    R: LostFoundRepository + ?Sized,
    S: StoragePort + ?Sized,
{
    pub items: &'a R,
    pub storage: &'a S,
}

impl<'a, R, S> SetItemImage<'a, R, S>
where
    R: LostFoundRepository + ?Sized,
    S: StoragePort + ?Sized,
{
    pub async fn execute(
        &self,
        identity: &Identity,
        id: Uuid,
        upload: Option<ImageUpload>,
    ) -> Result<LostFoundItem, AppError> {
        let item = self
            .items
            .get(id)
            .await?
            .ok_or(AppError::NotFound("item"))?;
        access::require_owner(identity, &item)?;

        let new_key = match upload {
            Some(upload) => {
                if upload.bytes.is_empty() || !upload.looks_like_image() {
                    return Err(AppError::field("image", "Upload a valid image."));
                }
                let stored = self
                    .storage
                    .store_image("items", id, upload.filename.as_deref(), &upload.bytes)
                    .await?;
                Some(stored.key)
            }
            None => None,
        };
        let previous = self.items.set_image(id, new_key.as_deref()).await?;
        if let Some(old) = previous.filter(|old| Some(old) != new_key.as_ref()) {
            if let Err(err) = self.storage.delete(&old).await {
                tracing::warn!(item_id = %id, key = %old, error = ?err, "failed to remove replaced image");
            }
        }
        self.items
            .get(id)
            .await?
            .ok_or(AppError::NotFound("item"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::InMemoryStore;

    fn photo(name: &str) -> ImageUpload {
        ImageUpload {
            filename: Some(name.into()),
            content_type: Some("image/jpeg".into()),
            bytes: b"jpeg".to_vec(),
            promote: false,
        }
    }

    #[tokio::test]
    async fn replacing_the_photo_drops_the_old_blob() {
        let store = InMemoryStore::default();
        let reporter = store.seed_user("r@campus.edu", false);
        let item = store.seed_item(reporter.id);
        let uc = SetItemImage {
            items: &store,
            storage: &store,
        };
        let id = Identity::from_user(&reporter);
        let first = uc.execute(&id, item.id, Some(photo("a.jpg"))).await.unwrap();
        let second = uc.execute(&id, item.id, Some(photo("b.jpg"))).await.unwrap();
        assert_ne!(first.image_key, second.image_key);
        assert_eq!(store.blob_keys(), vec![second.image_key.clone().unwrap()]);

        let cleared = uc.execute(&id, item.id, None).await.unwrap();
        assert_eq!(cleared.image_key, None);
        assert!(store.blob_keys().is_empty());
    }
}
