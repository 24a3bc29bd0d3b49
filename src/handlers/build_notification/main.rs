use std::sync::Arc;

use async_trait::async_trait;
use common::aws_clients::cloudwatch_logs::get_cloudwatch_logs_client;
use common::aws_clients::codebuild::get_codebuild_client;
use common::aws_clients::s3::get_s3_client;
use common::aws_clients::ses::get_ses_client;
use common::config::ConfigLoader;
use deploy_notifications::dtos::responses::status_response::StatusResponse;
use deploy_notifications::notifications::build_status_card::status_image_key;
use deploy_notifications::notifications::{deliver, BuildStatusCard};
use deploy_notifications::result::error::OrchestrationError;
use deploy_notifications::{
    lambda_main, lambda_structure::lambda_trait::Lambda, result::error::Result,
};
use integrations::asset_store::asset_store_impl::AssetStoreImpl;
use integrations::asset_store::AssetStore;
use integrations::build_logs::build_log_reader_impl::BuildLogReaderImpl;
use integrations::build_logs::BuildLogReader;
use integrations::build_system::build_system_impl::BuildSystemImpl;
use integrations::build_system::{BuildSystem, BuildSystemError};
use integrations::chat::chat_notifier_impl::ChatNotifierImpl;
use integrations::chat::ChatNotifier;
use integrations::mailer::alert_mailer_impl::AlertMailerImpl;
use integrations::mailer::{AlertEmail, AlertMailer};
use model::build::{BuildDetails, BuildStatus};
use serde_json::{json, Value};

use crate::config::Config;
use crate::dtos::BuildEventEnvelope;
use crate::emails::{failure_email, recovery_email};

mod config;
mod dtos;
mod emails;

pub const BUILD_NOT_FOUND_MESSAGE: &str = "Error: Unable to fetch current build details.";

pub struct Persisted {
    pub config: Config,
    pub build_system: Arc<dyn BuildSystem>,
    pub log_reader: Arc<dyn BuildLogReader>,
    pub asset_store: Arc<dyn AssetStore>,
    pub chat_notifier: Arc<dyn ChatNotifier>,
    pub mailer: Arc<dyn AlertMailer>,
}

pub struct BuildNotification;

#[async_trait]
impl Lambda for BuildNotification {
    type PersistedMemory = Persisted;
    type InputBody = Value;
    type Output = StatusResponse;
    type Error = OrchestrationError;

    async fn bootstrap() -> Result<Self::PersistedMemory> {
        let config = ConfigLoader::load_default::<Config>()?;

        let build_system =
            Arc::new(BuildSystemImpl::new(get_codebuild_client()?)) as Arc<dyn BuildSystem>;
        let log_reader = Arc::new(BuildLogReaderImpl::new(get_cloudwatch_logs_client()?))
            as Arc<dyn BuildLogReader>;
        let asset_store = Arc::new(AssetStoreImpl::new(
            config.bucket_name.clone(),
            get_s3_client()?,
        )) as Arc<dyn AssetStore>;
        let chat_notifier = Arc::new(ChatNotifierImpl::new(
            reqwest::Client::new(),
            config.teams_webhook_url.clone(),
        )) as Arc<dyn ChatNotifier>;
        let mailer = Arc::new(AlertMailerImpl::new(get_ses_client()?)) as Arc<dyn AlertMailer>;

        Ok(Persisted {
            config,
            build_system,
            log_reader,
            asset_store,
            chat_notifier,
            mailer,
        })
    }

    async fn run(request: Self::InputBody, state: &Self::PersistedMemory) -> Result<Self::Output> {
        let build_id = match serde_json::from_value::<BuildEventEnvelope>(request) {
            Ok(envelope) => envelope.build_id().map(str::to_owned),
            Err(e) => {
                tracing::error!(error = ?e, "Unrecognized build event: {e}");
                None
            }
        };
        let Some(build_id) = build_id else {
            return Ok(StatusResponse::bad_request(json!(BUILD_NOT_FOUND_MESSAGE)));
        };

        let build = match state.build_system.get_build(build_id.clone()).await {
            Ok(build) => build,
            Err(e) => {
                tracing::error!(build_id = ?build_id, error = ?e, "Unable to fetch build: {e}");
                return Ok(StatusResponse::bad_request(json!(BUILD_NOT_FOUND_MESSAGE)));
            }
        };

        announce_build(state, &build).await;
        alert_operations(state, &build).await;

        Ok(StatusResponse::ok(json!(format!(
            "Notifications Sent Successfully. Build Status: {}",
            build.status
        ))))
    }
}

/// Posts the status card of the builds that have an illustration.
async fn announce_build(state: &Persisted, build: &BuildDetails) {
    let Some(image_key) = status_image_key(&build.status) else {
        tracing::info!(build_id = ?build.id, status = ?build.status, "No status card for this outcome");
        return;
    };

    let image_base64 = match state.asset_store.fetch_base64(image_key.to_owned()).await {
        Ok(image) => image,
        Err(e) => {
            tracing::error!(build_id = ?build.id, error = ?e, "Unable to load status image: {e}");
            return;
        }
    };

    let card = BuildStatusCard {
        build,
        image_base64: &image_base64,
    };
    deliver(state.chat_notifier.as_ref(), card.to_payload()).await;
}

/// Emails operations about failures and about recoveries from a failure.
async fn alert_operations(state: &Persisted, build: &BuildDetails) {
    let email = if build.status.is_failure_alert() {
        let log_lines = match state
            .log_reader
            .tail(build.logs.clone(), state.config.max_log_lines)
            .await
        {
            Ok(lines) => lines,
            Err(e) => {
                tracing::error!(build_id = ?build.id, error = ?e, "Unable to read build log: {e}");
                vec![]
            }
        };

        failure_email(&state.config, build, &log_lines)
    } else if build.status == BuildStatus::Succeeded {
        match previous_build_status(state.build_system.as_ref(), build).await {
            Ok(Some(BuildStatus::Failed)) => recovery_email(&state.config, build),
            Ok(_) => return,
            Err(e) => {
                tracing::warn!(
                    project_name = ?build.project_name,
                    error = ?e,
                    "Recovery check skipped: {e}"
                );
                return;
            }
        }
    } else {
        return;
    };

    send_email(state.mailer.as_ref(), email).await;
}

/// Status of the build that ran right before `build` in the same project.
async fn previous_build_status(
    build_system: &dyn BuildSystem,
    build: &BuildDetails,
) -> std::result::Result<Option<BuildStatus>, BuildSystemError> {
    let ids = build_system
        .list_recent_build_ids(build.project_name.clone())
        .await?;

    let previous_id = match ids.iter().position(|id| id == &build.id) {
        Some(index) => ids.get(index + 1),
        None => ids.get(1),
    };

    match previous_id {
        Some(id) => Ok(Some(build_system.get_build(id.clone()).await?.status)),
        None => Ok(None),
    }
}

async fn send_email(mailer: &dyn AlertMailer, email: AlertEmail) {
    let subject = email.subject.clone();
    match mailer.send(email).await {
        Ok(message_id) => {
            tracing::info!(message_id = ?message_id, "Email sent: {subject}")
        }
        Err(e) => tracing::error!(error = ?e, "Unable to send email {subject}: {e}"),
    }
}

lambda_main!(BuildNotification);
