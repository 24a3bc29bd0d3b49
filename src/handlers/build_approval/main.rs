use std::sync::Arc;

use async_trait::async_trait;
use common::config::ConfigLoader;
use deploy_notifications::dtos::responses::status_response::StatusResponse;
use deploy_notifications::notifications::{deliver, ApprovalCard};
use deploy_notifications::result::error::OrchestrationError;
use deploy_notifications::{
    lambda_main, lambda_structure::lambda_trait::Lambda, result::error::Result,
};
use integrations::chat::chat_notifier_impl::ChatNotifierImpl;
use integrations::chat::ChatNotifier;
use model::deployment::{DeployerIdentity, DeploymentRecord};
use model::project::ProjectIdentifier;
use repositories::deployments::deployments_repository_impl::DeploymentsRepositoryImpl;
use repositories::deployments::{DeploymentsRepository, DeploymentsRepositoryError};
use serde_json::{json, Value};

use crate::config::Config;

mod config;

pub struct Persisted {
    pub config: Config,
    pub deployments_repository: Arc<dyn DeploymentsRepository>,
    pub chat_notifier: Arc<dyn ChatNotifier>,
}

pub struct BuildApproval;

#[async_trait]
impl Lambda for BuildApproval {
    type PersistedMemory = Persisted;
    type InputBody = Value;
    type Output = StatusResponse;
    type Error = OrchestrationError;

    async fn bootstrap() -> Result<Self::PersistedMemory> {
        let config = ConfigLoader::load_default::<Config>()?;

        let deployments_repository = Arc::new(DeploymentsRepositoryImpl::connect_lazy(
            config.connect_options(),
        )) as Arc<dyn DeploymentsRepository>;

        let chat_notifier = Arc::new(ChatNotifierImpl::new(
            reqwest::Client::new(),
            config.teams_webhook_url.clone(),
        )) as Arc<dyn ChatNotifier>;

        Ok(Persisted {
            config,
            deployments_repository,
            chat_notifier,
        })
    }

    async fn run(_request: Self::InputBody, state: &Self::PersistedMemory) -> Result<Self::Output> {
        match request_approval(state).await {
            Ok(response) => Ok(response),
            Err(e) => {
                tracing::error!(error = ?e, "An error occurred: {e}");
                Ok(StatusResponse::server_error(e))
            }
        }
    }
}

async fn request_approval(
    state: &Persisted,
) -> std::result::Result<StatusResponse, DeploymentsRepositoryError> {
    let repository = state.deployments_repository.as_ref();

    let Some(latest) = repository.latest_deployment().await? else {
        tracing::info!("No deployment details found.");
        return Ok(StatusResponse::ok(json!({})));
    };

    let deployer = resolve_deployer(repository, &latest).await?;
    let project = ProjectIdentifier::for_deployment(
        &state.config.project_environment,
        &latest.client_name,
        &latest.instance_type,
    );

    let config_pair = repository
        .latest_config(latest.client_name.clone(), latest.instance_type.clone())
        .await?;

    match config_pair {
        Some(config_pair) => {
            let config_values = config_pair.resolve();
            let card = ApprovalCard {
                deployer: &deployer,
                deployment: &latest,
                config_values: &config_values,
                project: &project,
                dispatcher_url: &state.config.lambda_function_url,
            };

            deliver(state.chat_notifier.as_ref(), card.to_payload()).await;
        }
        None => tracing::warn!(
            project_name = ?project,
            "No config details found for {}/{}",
            latest.client_name,
            latest.instance_type
        ),
    }

    Ok(StatusResponse::ok(json!(latest.summary())))
}

/// Credits whoever deployed the same client and instance before, then the
/// requester of this deployment, then nobody.
async fn resolve_deployer(
    repository: &dyn DeploymentsRepository,
    latest: &DeploymentRecord,
) -> std::result::Result<DeployerIdentity, DeploymentsRepositoryError> {
    let previous = repository
        .previous_deployer(
            latest.client_name.clone(),
            latest.instance_type.clone(),
            latest.request_timestamp,
        )
        .await?;
    if let Some(previous) = previous {
        return Ok(previous);
    }

    let current = match latest.user_id {
        Some(user_id) => repository.find_user(user_id).await?,
        None => None,
    };

    Ok(current.unwrap_or_else(DeployerIdentity::unknown))
}

lambda_main!(BuildApproval);
