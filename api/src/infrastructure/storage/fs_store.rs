use std::path::PathBuf;

use async_trait::async_trait;
use uuid::Uuid;

use crate::application::ports::storage_port::{StoragePort, StoredBlob};
use crate::infrastructure::storage::{
    blob_key, checked_relative, content_hash, timestamp_now, timestamped_name,
};

pub struct FsStoragePort {
    pub uploads_root: PathBuf,
}

impl FsStoragePort {
    pub fn new(uploads_root: impl Into<PathBuf>) -> Self {
        Self {
            uploads_root: uploads_root.into(),
        }
    }

    fn absolute(&self, key: &str) -> anyhow::Result<PathBuf> {
        Ok(self.uploads_root.join(checked_relative(key)?))
    }
}

#[async_trait]
impl StoragePort for FsStoragePort {
    async fn store_image(
        &self,
        area: &str,
        owner_id: Uuid,
        original_filename: Option<&str>,
        bytes: &[u8],
    ) -> anyhow::Result<StoredBlob> {
        use tokio::fs;

        let dir = self
            .uploads_root
            .join(checked_relative(area)?)
            .join(owner_id.to_string());
        fs::create_dir_all(&dir).await?;

        let stamp = timestamp_now();
        let mut attempt = 0;
        let mut name = timestamped_name(original_filename, &stamp, attempt);
        while fs::try_exists(dir.join(&name)).await.unwrap_or(false) {
            attempt += 1;
            name = timestamped_name(original_filename, &stamp, attempt);
        }

        fs::write(dir.join(&name), bytes).await?;
        Ok(StoredBlob {
            key: blob_key(area, owner_id, &name),
            size: bytes.len() as i64,
            content_hash: content_hash(bytes),
        })
    }

    async fn read_bytes(&self, key: &str) -> anyhow::Result<Vec<u8>> {
        let path = self.absolute(key)?;
        if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
            anyhow::bail!("not_found");
        }
        Ok(tokio::fs::read(path).await?)
    }

    async fn delete(&self, key: &str) -> anyhow::Result<()> {
        let path = self.absolute(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stores_reads_and_deletes() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsStoragePort::new(dir.path());
        let owner = Uuid::new_v4();

        let blob = store
            .store_image("books", owner, Some("front cover.png"), b"png-bytes")
            .await
            .unwrap();
        assert!(blob.key.starts_with(&format!("books/{owner}/front_cover_")));
        assert!(blob.key.ends_with(".png"));
        assert_eq!(blob.size, 9);
        assert_eq!(store.read_bytes(&blob.key).await.unwrap(), b"png-bytes");

        store.delete(&blob.key).await.unwrap();
        assert!(store.read_bytes(&blob.key).await.is_err());
        // deleting again is not an error
        store.delete(&blob.key).await.unwrap();
    }

    #[tokio::test]
    async fn same_name_in_same_second_gets_a_counter() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsStoragePort::new(dir.path());
        let owner = Uuid::new_v4();
        let a = store
            .store_image("events", owner, Some("a.jpg"), b"1")
            .await
            .unwrap();
        let b = store
            .store_image("events", owner, Some("a.jpg"), b"2")
            .await
            .unwrap();
        assert_ne!(a.key, b.key);
        assert_eq!(store.read_bytes(&a.key).await.unwrap(), b"1");
        assert_eq!(store.read_bytes(&b.key).await.unwrap(), b"2");
    }

    #[tokio::test]
    async fn traversal_keys_are_refused() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsStoragePort::new(dir.path());
        assert!(store.read_bytes("../secret").await.is_err());
        assert!(store.delete("/etc/passwd").await.is_err());
    }
}
