use async_trait::async_trait;

#[cfg(feature = "test_mocks")]
use mockall::mock;

pub mod asset_store_impl;

#[derive(Debug, thiserror::Error)]
pub enum AssetStoreError {
    #[error("{0:#}")]
    Unknown(anyhow::Error),
    #[error("{0}")]
    EmptyObject(String),
}

/// Read access to the images embedded in status cards.
#[async_trait]
pub trait AssetStore
where
    Self: Sync + Send,
{
    /// Object contents, base64 encoded.
    async fn fetch_base64(&self, key: String) -> Result<String, AssetStoreError>;
}

#[cfg(feature = "test_mocks")]
mock! {
    pub AssetStore {}
    #[async_trait]
    impl AssetStore for AssetStore {
        async fn fetch_base64(&self, key: String) -> Result<String, AssetStoreError>;
    }
}
