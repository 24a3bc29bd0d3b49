use std::sync::Arc;

use async_trait::async_trait;
use common::aws_clients::dynamodb::get_dynamodb_client;
use common::config::ConfigLoader;
use deploy_notifications::dtos::responses::status_response::StatusResponse;
use deploy_notifications::result::error::OrchestrationError;
use deploy_notifications::{
    lambda_main, lambda_structure::lambda_trait::Lambda, result::error::Result,
};
use repositories::triggered_projects::triggered_projects_repository_impl::TriggeredProjectsRepositoryImpl;
use repositories::triggered_projects::TriggeredProjectsRepository;
use serde_json::{json, Value};

use crate::config::Config;

mod config;

pub struct Persisted {
    pub triggered_projects_repository: Arc<dyn TriggeredProjectsRepository>,
}

pub struct DeleteTriggerRecords;

#[async_trait]
impl Lambda for DeleteTriggerRecords {
    type PersistedMemory = Persisted;
    type InputBody = Value;
    type Output = StatusResponse;
    type Error = OrchestrationError;

    async fn bootstrap() -> Result<Self::PersistedMemory> {
        let config = ConfigLoader::load_default::<Config>()?;

        Ok(Persisted {
            triggered_projects_repository: Arc::new(TriggeredProjectsRepositoryImpl::new(
                config.triggered_projects_table_name,
                get_dynamodb_client()?,
            )),
        })
    }

    async fn run(_request: Self::InputBody, state: &Self::PersistedMemory) -> Result<Self::Output> {
        match state.triggered_projects_repository.delete_all().await {
            Ok(deleted) => {
                tracing::info!(deleted = deleted, "Trigger records deleted");
                Ok(StatusResponse::ok(json!(format!(
                    "Successfully Deleted {deleted} items."
                ))))
            }
            Err(e) => {
                tracing::error!(error = ?e, "Unable to delete trigger records: {e}");
                Ok(StatusResponse::server_error(e))
            }
        }
    }
}

lambda_main!(DeleteTriggerRecords);

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use anyhow::anyhow;
    use deploy_notifications::lambda_structure::lambda_trait::Lambda;
    use repositories::triggered_projects::{
        MockTriggeredProjectsRepository, TriggeredProjectsRepositoryError,
    };
    use serde_json::{json, Value};

    use crate::{DeleteTriggerRecords, Persisted};

    #[tokio::test]
    async fn reports_deleted_items() {
        let mut repository = MockTriggeredProjectsRepository::new();
        repository.expect_delete_all().once().returning(|| Ok(3));

        let response = DeleteTriggerRecords::run(
            Value::Null,
            &Persisted {
                triggered_projects_repository: Arc::new(repository),
            },
        )
        .await
        .unwrap();

        assert_eq!(200, response.status_code);
        assert_eq!(json!("Successfully Deleted 3 items."), response.body);
    }

    #[tokio::test]
    async fn scan_failure_is_a_server_error() {
        let mut repository = MockTriggeredProjectsRepository::new();
        repository
            .expect_delete_all()
            .once()
            .returning(|| Err(TriggeredProjectsRepositoryError::Unknown(anyhow!("throttled"))));

        let response = DeleteTriggerRecords::run(
            Value::Null,
            &Persisted {
                triggered_projects_repository: Arc::new(repository),
            },
        )
        .await
        .unwrap();

        assert_eq!(500, response.status_code);
        assert_eq!(json!({ "error": "throttled" }), response.body);
    }
}
