use anyhow::anyhow;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use model::deployment::{DeployerIdentity, DeploymentConfigPair, DeploymentRecord};
use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions};

use super::{DeploymentsRepository, DeploymentsRepositoryError};

const LATEST_DEPLOYMENT_QUERY: &str = "SELECT id, client_name, instance_type, request_timestamp, user_id \
     FROM self_service_app_codebuilddeployment \
     ORDER BY request_timestamp DESC, id DESC \
     LIMIT 1";

const PREVIOUS_DEPLOYER_QUERY: &str = "SELECT u.first_name, u.sso_object_id \
     FROM self_service_app_sluser u \
     JOIN self_service_app_codebuilddeployment d ON u.id = d.user_id \
     WHERE d.client_name = ? AND d.instance_type = ? AND d.request_timestamp < ? \
       AND u.first_name IS NOT NULL AND u.first_name <> '' \
     ORDER BY d.request_timestamp DESC, d.id DESC \
     LIMIT 1";

const USER_QUERY: &str = "SELECT first_name, sso_object_id \
     FROM self_service_app_sluser \
     WHERE id = ?";

const LATEST_CONFIG_QUERY: &str = "SELECT CAST(original_deploy_config AS CHAR) AS original_deploy_config, \
            CAST(updated_deploy_config AS CHAR) AS updated_deploy_config \
     FROM self_service_app_codebuilddeployment \
     WHERE client_name = ? AND instance_type = ? \
     ORDER BY request_timestamp DESC, id DESC \
     LIMIT 1";

#[derive(Debug, sqlx::FromRow)]
struct DeploymentRow {
    id: i64,
    client_name: String,
    instance_type: String,
    request_timestamp: NaiveDateTime,
    user_id: Option<i64>,
}

impl From<DeploymentRow> for DeploymentRecord {
    fn from(row: DeploymentRow) -> Self {
        Self {
            id: row.id,
            client_name: row.client_name,
            instance_type: row.instance_type,
            request_timestamp: row.request_timestamp,
            user_id: row.user_id,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    first_name: Option<String>,
    sso_object_id: Option<String>,
}

impl UserRow {
    /// A user without a first name cannot be credited.
    fn into_identity(self) -> Option<DeployerIdentity> {
        self.first_name
            .filter(|name| !name.trim().is_empty())
            .map(|name| DeployerIdentity::new(name, self.sso_object_id))
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ConfigRow {
    original_deploy_config: Option<String>,
    updated_deploy_config: Option<String>,
}

impl From<ConfigRow> for DeploymentConfigPair {
    fn from(row: ConfigRow) -> Self {
        Self {
            original: row.original_deploy_config,
            updated: row.updated_deploy_config,
        }
    }
}

pub struct DeploymentsRepositoryImpl {
    pool: MySqlPool,
}

impl DeploymentsRepositoryImpl {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Builds a pool that opens its first connection on first use.
    pub fn connect_lazy(options: MySqlConnectOptions) -> Self {
        let pool = MySqlPoolOptions::new()
            .max_connections(1)
            .connect_lazy_with(options);

        Self::new(pool)
    }
}

#[async_trait]
impl DeploymentsRepository for DeploymentsRepositoryImpl {
    async fn latest_deployment(
        &self,
    ) -> Result<Option<DeploymentRecord>, DeploymentsRepositoryError> {
        let row = sqlx::query_as::<_, DeploymentRow>(LATEST_DEPLOYMENT_QUERY)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                DeploymentsRepositoryError::Unknown(
                    anyhow!(e).context("Error querying the latest deployment"),
                )
            })?;

        Ok(row.map(DeploymentRecord::from))
    }

    async fn previous_deployer(
        &self,
        client_name: String,
        instance_type: String,
        before: NaiveDateTime,
    ) -> Result<Option<DeployerIdentity>, DeploymentsRepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(PREVIOUS_DEPLOYER_QUERY)
            .bind(&client_name)
            .bind(&instance_type)
            .bind(before)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                DeploymentsRepositoryError::Unknown(anyhow!(e).context(format!(
                    "Error querying the deployer before {before} for {client_name}/{instance_type}"
                )))
            })?;

        Ok(row.and_then(UserRow::into_identity))
    }

    async fn find_user(
        &self,
        user_id: i64,
    ) -> Result<Option<DeployerIdentity>, DeploymentsRepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(USER_QUERY)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                DeploymentsRepositoryError::Unknown(
                    anyhow!(e).context(format!("Error querying user {user_id}")),
                )
            })?;

        Ok(row.and_then(UserRow::into_identity))
    }

    async fn latest_config(
        &self,
        client_name: String,
        instance_type: String,
    ) -> Result<Option<DeploymentConfigPair>, DeploymentsRepositoryError> {
        let row = sqlx::query_as::<_, ConfigRow>(LATEST_CONFIG_QUERY)
            .bind(&client_name)
            .bind(&instance_type)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                DeploymentsRepositoryError::Unknown(anyhow!(e).context(format!(
                    "Error querying the deployment config for {client_name}/{instance_type}"
                )))
            })?;

        Ok(row.map(DeploymentConfigPair::from))
    }
}
