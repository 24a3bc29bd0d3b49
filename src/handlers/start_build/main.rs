use anyhow::anyhow;
use common::aws_clients::codebuild::get_codebuild_client;
use deploy_notifications::http::errors::{server_error_response, validation_error_response};
use deploy_notifications::http::lambda_proxy::LambdaProxyHttpResponse;
use deploy_notifications::http_lambda_main;
use deploy_notifications::lambda_structure::http_lambda_main::HttpLambdaResponse;
use deploy_notifications::notifications::{deliver, outcome_card};
use deploy_notifications::result::error::LambdaError;
use integrations::build_system::build_system_impl::BuildSystemImpl;
use integrations::build_system::BuildSystem;
use integrations::chat::chat_notifier_impl::ChatNotifierImpl;
use integrations::chat::ChatNotifier;
use lambda_http::{run, service_fn, Error, Request};
use reqwest::StatusCode;

use crate::config::Config;
use crate::models::{ApprovalAction, ApprovalDecision};

mod config;
mod models;

pub const INVALID_REQUEST_MESSAGE: &str = "Invalid action or missing project name.";
pub const BUILD_STARTED_MESSAGE: &str = "Build triggered successfully!";
pub const BUILD_FAILED_MESSAGE: &str = "Failed to start the build.";
pub const BUILD_DECLINED_MESSAGE: &str = "Build declined.";

pub struct State<B: BuildSystem, C: ChatNotifier> {
    pub build_system: B,
    pub chat_notifier: C,
}

http_lambda_main!(
    {
        let config = ConfigLoader::load_default::<Config>()?;

        State {
            build_system: BuildSystemImpl::new(get_codebuild_client()?),
            chat_notifier: ChatNotifierImpl::new(reqwest::Client::new(), config.teams_webhook_url),
        }
    },
    start_build
);

async fn start_build(
    request: Request,
    state: &State<impl BuildSystem, impl ChatNotifier>,
) -> HttpLambdaResponse {
    let Some(decision) = ApprovalDecision::from_request(&request) else {
        return Err(validation_error_response(
            INVALID_REQUEST_MESSAGE.to_owned(),
            None,
        ));
    };
    let project = decision.project();

    match decision.action {
        ApprovalAction::Approve => {
            match state.build_system.start_build(project.to_string()).await {
                Ok(build_id) => {
                    tracing::info!(project_name = ?project, build_id = ?build_id, "Build started");
                    deliver(
                        &state.chat_notifier,
                        outcome_card(&format!(
                            "**Approved:** Build Started for Project **{project}**"
                        )),
                    )
                    .await;

                    message_response(BUILD_STARTED_MESSAGE)
                }
                Err(e) => {
                    deliver(
                        &state.chat_notifier,
                        outcome_card(&format!("Failed to Start Build: {project}")),
                    )
                    .await;

                    Err(server_error_response(
                        BUILD_FAILED_MESSAGE.to_owned(),
                        LambdaError::Unknown(anyhow!(e).context(format!(
                            "unable to start build for project {project}"
                        ))),
                    ))
                }
            }
        }
        ApprovalAction::Decline => {
            tracing::info!(project_name = ?project, "Build declined");
            deliver(
                &state.chat_notifier,
                outcome_card(&format!(
                    "**Declined:** Build will not Start for Project **{project}**"
                )),
            )
            .await;

            message_response(BUILD_DECLINED_MESSAGE)
        }
    }
}

fn message_response(message: &str) -> HttpLambdaResponse {
    LambdaProxyHttpResponse::json(StatusCode::OK, &message).try_into()
}
