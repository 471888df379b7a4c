use async_trait::async_trait;
use uuid::Uuid;

use crate::application::access::OwnerRef;
use crate::application::ports::storage_port::StoredBlob;
use crate::domain::attachments::image::{Image, ImageParent};

/// Gallery rows for every parent kind. Each mutating call runs in one
/// transaction and leaves exactly one primary image per non-empty gallery.
#[async_trait]
pub trait ImageRepository: Send + Sync {
    /// Owner of the parent row, `None` when the parent does not exist.
    async fn parent_owner(
        &self,
        parent: ImageParent,
        parent_id: Uuid,
    ) -> anyhow::Result<Option<OwnerRef>>;
    async fn list(&self, parent: ImageParent, parent_id: Uuid) -> anyhow::Result<Vec<Image>>;
    async fn list_for_parents(
        &self,
        parent: ImageParent,
        parent_ids: &[Uuid],
    ) -> anyhow::Result<Vec<Image>>;
    async fn get(&self, parent: ImageParent, image_id: Uuid) -> anyhow::Result<Option<Image>>;
    /// The first image of a gallery is primary; `promote` forces it.
    async fn add(
        &self,
        parent: ImageParent,
        parent_id: Uuid,
        blob: &StoredBlob,
        promote: bool,
    ) -> anyhow::Result<Image>;
    async fn set_primary(&self, parent: ImageParent, image_id: Uuid)
    -> anyhow::Result<Option<Image>>;
    /// Deletes the row and hands the primary flag to the oldest survivor.
    async fn remove(&self, parent: ImageParent, image_id: Uuid) -> anyhow::Result<Option<Image>>;
    /// Storage keys of every image attached to content owned by `user_id`.
    async fn keys_owned_by(&self, user_id: Uuid) -> anyhow::Result<Vec<String>>;
}
