use anyhow::anyhow;
use async_trait::async_trait;
use base64::Engine;
use futures::TryStreamExt;
use rusoto_s3::{GetObjectRequest, S3};

use super::{AssetStore, AssetStoreError};

pub struct AssetStoreImpl<S: S3 + Sync + Send> {
    bucket: String,
    s3_client: S,
}

impl<S: S3 + Sync + Send> AssetStoreImpl<S> {
    pub fn new(bucket: String, s3_client: S) -> Self {
        Self { bucket, s3_client }
    }
}

#[async_trait]
impl<S: S3 + Sync + Send> AssetStore for AssetStoreImpl<S> {
    async fn fetch_base64(&self, key: String) -> Result<String, AssetStoreError> {
        let request = GetObjectRequest {
            bucket: self.bucket.clone(),
            key: key.clone(),
            ..Default::default()
        };

        let body = self
            .s3_client
            .get_object(request)
            .await
            .map_err(|e| {
                AssetStoreError::Unknown(
                    anyhow!(e).context(format!("Error fetching s3://{}/{key}", self.bucket)),
                )
            })?
            .body
            .ok_or_else(|| {
                AssetStoreError::EmptyObject(format!("s3://{}/{key} has no body", self.bucket))
            })?;

        let bytes = body
            .map_ok(|chunk| chunk.to_vec())
            .try_concat()
            .await
            .map_err(|e| {
                AssetStoreError::Unknown(
                    anyhow!(e).context(format!("Error reading s3://{}/{key}", self.bucket)),
                )
            })?;

        Ok(base64::engine::general_purpose::STANDARD.encode(bytes))
    }
}
