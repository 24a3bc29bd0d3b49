use async_trait::async_trait;

#[cfg(feature = "test_mocks")]
use mockall::mock;

pub mod dns_zone_impl;

#[derive(Debug, thiserror::Error)]
pub enum DnsError {
    #[error("{0:#}")]
    Unknown(anyhow::Error),
}

#[async_trait]
pub trait DnsZone
where
    Self: Sync + Send,
{
    /// Id of the first hosted zone of the account, if there is any.
    async fn first_hosted_zone(&self) -> Result<Option<String>, DnsError>;

    /// Deletes the A record named exactly `record_name`. Returns whether a record existed.
    async fn delete_a_record(&self, zone_id: String, record_name: String)
        -> Result<bool, DnsError>;
}

#[cfg(feature = "test_mocks")]
mock! {
    pub DnsZone {}
    #[async_trait]
    impl DnsZone for DnsZone {
        async fn first_hosted_zone(&self) -> Result<Option<String>, DnsError>;

        async fn delete_a_record(&self, zone_id: String, record_name: String)
            -> Result<bool, DnsError>;
    }
}
