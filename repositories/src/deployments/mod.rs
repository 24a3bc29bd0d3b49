use async_trait::async_trait;
use chrono::NaiveDateTime;
use model::deployment::{DeployerIdentity, DeploymentConfigPair, DeploymentRecord};

use crate::impl_unknown_error_trait;

#[cfg(feature = "test_mocks")]
use mockall::mock;

pub mod deployments_repository_impl;

#[derive(Debug, thiserror::Error)]
pub enum DeploymentsRepositoryError {
    #[error("{0:#}")]
    Unknown(anyhow::Error),
}

impl_unknown_error_trait!(DeploymentsRepositoryError);

/// Read-only access to the deployment requests of the self-service app.
#[async_trait]
pub trait DeploymentsRepository
where
    Self: Sync + Send,
{
    /// Most recently requested deployment, ties broken by the highest id.
    async fn latest_deployment(&self)
        -> Result<Option<DeploymentRecord>, DeploymentsRepositoryError>;

    /// Requester of the latest deployment to the same client and instance that
    /// was requested strictly before `before` and whose requester still resolves.
    async fn previous_deployer(
        &self,
        client_name: String,
        instance_type: String,
        before: NaiveDateTime,
    ) -> Result<Option<DeployerIdentity>, DeploymentsRepositoryError>;

    async fn find_user(
        &self,
        user_id: i64,
    ) -> Result<Option<DeployerIdentity>, DeploymentsRepositoryError>;

    /// Configuration documents of the latest deployment to a client and instance.
    async fn latest_config(
        &self,
        client_name: String,
        instance_type: String,
    ) -> Result<Option<DeploymentConfigPair>, DeploymentsRepositoryError>;
}

#[cfg(feature = "test_mocks")]
mock! {
    pub DeploymentsRepository {}
    #[async_trait]
    impl DeploymentsRepository for DeploymentsRepository {
        async fn latest_deployment(&self)
            -> Result<Option<DeploymentRecord>, DeploymentsRepositoryError>;

        async fn previous_deployer(
            &self,
            client_name: String,
            instance_type: String,
            before: NaiveDateTime,
        ) -> Result<Option<DeployerIdentity>, DeploymentsRepositoryError>;

        async fn find_user(
            &self,
            user_id: i64,
        ) -> Result<Option<DeployerIdentity>, DeploymentsRepositoryError>;

        async fn latest_config(
            &self,
            client_name: String,
            instance_type: String,
        ) -> Result<Option<DeploymentConfigPair>, DeploymentsRepositoryError>;
    }
}
