use async_trait::async_trait;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct StoredBlob {
    /// Slash-separated key relative to the storage root.
    pub key: String,
    pub size: i64,
    pub content_hash: String,
}

#[async_trait]
pub trait StoragePort: Send + Sync {
    async fn store_image(
        &self,
        area: &str,
        owner_id: Uuid,
        original_filename: Option<&str>,
        bytes: &[u8],
    ) -> anyhow::Result<StoredBlob>;
    async fn read_bytes(&self, key: &str) -> anyhow::Result<Vec<u8>>;
    async fn delete(&self, key: &str) -> anyhow::Result<()>;
}
