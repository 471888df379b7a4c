use std::path::{Component, Path};

use anyhow::{Context, anyhow};
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::operation::create_bucket::CreateBucketError;
use aws_sdk_s3::operation::head_bucket::HeadBucketError;
use aws_sdk_s3::operation::head_object::HeadObjectError;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::{Client, error::SdkError};
use tokio::io::AsyncReadExt;
use uuid::Uuid;

use crate::application::ports::storage_port::{StoragePort, StoredBlob};
use crate::bootstrap::config::Config;
use crate::infrastructure::storage::{
    blob_key, checked_relative, content_hash, timestamp_now, timestamped_name,
};

pub struct S3StoragePort {
    client: Client,
    bucket: String,
    root_prefix: String,
}

impl S3StoragePort {
    pub async fn new(cfg: &Config) -> anyhow::Result<Self> {
        let bucket = cfg
            .s3_bucket
            .clone()
            .context("S3 bucket must be configured when using S3 storage backend")?;

        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = &cfg.s3_region {
            loader = loader.region(Region::new(region.clone()));
        }
        let shared_config = loader.load().await;

        let mut builder = aws_sdk_s3::config::Builder::from(&shared_config);
        if let (Some(access), Some(secret)) = (&cfg.s3_access_key, &cfg.s3_secret_key) {
            let creds = Credentials::new(
                access.clone(),
                secret.clone(),
                None,
                None,
                "campus-s3-static",
            );
            builder = builder.credentials_provider(creds);
        }
        if let Some(endpoint) = &cfg.s3_endpoint {
            builder = builder.endpoint_url(endpoint.clone());
        }
        if cfg.s3_use_path_style {
            builder = builder.force_path_style(true);
        }

        let client = Client::from_conf(builder.build());
        ensure_bucket(&client, &bucket).await?;

        Ok(Self {
            client,
            bucket,
            root_prefix: normalize_prefix(Path::new(&cfg.storage_root)),
        })
    }

    fn object_key(&self, relative: &str) -> String {
        let rel = relative.trim_start_matches('/');
        if self.root_prefix.is_empty() {
            rel.to_string()
        } else {
            format!("{}/{}", self.root_prefix, rel)
        }
    }

    fn checked_key(&self, key: &str) -> anyhow::Result<String> {
        let rel = checked_relative(key)?
            .to_string_lossy()
            .replace('\\', "/");
        Ok(self.object_key(&rel))
    }

    async fn object_exists(&self, key: &str) -> anyhow::Result<bool> {
        match self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(_) => Ok(true),
            Err(SdkError::ServiceError(service_err)) => {
                let head_err: &HeadObjectError = service_err.err();
                if head_err.is_not_found() {
                    Ok(false)
                } else {
                    Err(anyhow!("head_object error for {}: {}", key, head_err))
                }
            }
            Err(other) => Err(anyhow!("head_object failed for {}: {}", key, other)),
        }
    }
}

/// Turns the configured storage root into a key prefix (`./uploads` -> `uploads`).
fn normalize_prefix(root: &Path) -> String {
    let mut parts: Vec<String> = Vec::new();
    for comp in root.components() {
        if let Component::Normal(os) = comp {
            let s = os.to_string_lossy();
            if !s.is_empty() && s != "." {
                parts.push(s.replace('\\', "/"));
            }
        }
    }
    parts.join("/")
}

#[async_trait]
impl StoragePort for S3StoragePort {
    async fn store_image(
        &self,
        area: &str,
        owner_id: Uuid,
        original_filename: Option<&str>,
        bytes: &[u8],
    ) -> anyhow::Result<StoredBlob> {
        let stamp = timestamp_now();
        let mut attempt = 0;
        let mut key = blob_key(area, owner_id, &timestamped_name(original_filename, &stamp, 0));
        while self.object_exists(&self.checked_key(&key)?).await? {
            attempt += 1;
            key = blob_key(
                area,
                owner_id,
                &timestamped_name(original_filename, &stamp, attempt),
            );
        }

        let object_key = self.checked_key(&key)?;
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&object_key)
            .body(ByteStream::from(bytes.to_vec()))
            .send()
            .await
            .with_context(|| format!("failed to upload object {object_key}"))?;

        Ok(StoredBlob {
            key,
            size: bytes.len() as i64,
            content_hash: content_hash(bytes),
        })
    }

    async fn read_bytes(&self, key: &str) -> anyhow::Result<Vec<u8>> {
        let object_key = self.checked_key(key)?;
        if !self.object_exists(&object_key).await? {
            anyhow::bail!("not_found");
        }
        let object = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(&object_key)
            .send()
            .await
            .context("failed to get object")?;
        let mut reader = object.body.into_async_read();
        let mut data = Vec::new();
        reader.read_to_end(&mut data).await?;
        Ok(data)
    }

    async fn delete(&self, key: &str) -> anyhow::Result<()> {
        let object_key = self.checked_key(key)?;
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(&object_key)
            .send()
            .await
            .with_context(|| format!("failed to delete object {object_key}"))?;
        Ok(())
    }
}

async fn ensure_bucket(client: &Client, bucket: &str) -> anyhow::Result<()> {
    match client.head_bucket().bucket(bucket).send().await {
        Ok(_) => return Ok(()),
        Err(SdkError::ServiceError(service_err)) => {
            if !matches!(service_err.err(), HeadBucketError::NotFound(_)) {
                return Err(anyhow!(service_err.err().to_string()));
            }
        }
        Err(err) => return Err(anyhow!(err.to_string())),
    }

    match client.create_bucket().bucket(bucket).send().await {
        Ok(_) => Ok(()),
        Err(SdkError::ServiceError(service_err)) => match service_err.err() {
            CreateBucketError::BucketAlreadyOwnedByYou(_) => Ok(()),
            CreateBucketError::BucketAlreadyExists(_) => Ok(()),
            other => Err(anyhow!(other.to_string())),
        },
        Err(err) => Err(anyhow!(err.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_drops_dot_components() {
        assert_eq!(normalize_prefix(Path::new("./uploads")), "uploads");
        assert_eq!(normalize_prefix(Path::new("data/blobs/")), "data/blobs");
        assert_eq!(normalize_prefix(Path::new(".")), "");
    }
}
