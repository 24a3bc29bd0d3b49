use std::sync::Arc;

use anyhow::anyhow;
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use common::aws_clients::codebuild::get_codebuild_client;
use common::aws_clients::dynamodb::get_dynamodb_client;
use common::config::ConfigLoader;
use deploy_notifications::result::error::OrchestrationError;
use deploy_notifications::{
    lambda_main, lambda_structure::lambda_trait::Lambda, result::error::Result,
};
use integrations::build_system::build_system_impl::BuildSystemImpl;
use integrations::build_system::BuildSystem;
use model::triggered_projects::TriggeredProjects;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use repositories::triggered_projects::triggered_projects_repository_impl::TriggeredProjectsRepositoryImpl;
use repositories::triggered_projects::{
    TriggeredProjectsRepository, TriggeredProjectsRepositoryError,
};
use serde_json::{json, Value};

use crate::config::Config;

mod config;

pub const NOTHING_LEFT_MESSAGE: &str = "There is no new CodeBuild Project left to Trigger";
pub const NO_BUILD_ID: &str = "No Build ID";

pub struct Persisted {
    pub config: Config,
    pub triggered_projects_repository: Arc<dyn TriggeredProjectsRepository>,
    pub build_system: Arc<dyn BuildSystem>,
}

pub struct TriggerCodebuild;

#[async_trait]
impl Lambda for TriggerCodebuild {
    type PersistedMemory = Persisted;
    type InputBody = Value;
    type Output = Value;
    type Error = OrchestrationError;

    async fn bootstrap() -> Result<Self::PersistedMemory> {
        let config = ConfigLoader::load_default::<Config>()?;

        let triggered_projects_repository = Arc::new(TriggeredProjectsRepositoryImpl::new(
            config.triggered_projects_table_name.clone(),
            get_dynamodb_client()?,
        )) as Arc<dyn TriggeredProjectsRepository>;
        let build_system =
            Arc::new(BuildSystemImpl::new(get_codebuild_client()?)) as Arc<dyn BuildSystem>;

        Ok(Persisted {
            config,
            triggered_projects_repository,
            build_system,
        })
    }

    async fn run(_request: Self::InputBody, state: &Self::PersistedMemory) -> Result<Self::Output> {
        let mut rng = StdRng::from_entropy();

        trigger_random_project(state, Utc::now().date_naive(), &mut rng)
            .await
            .map_err(|e| {
                tracing::error!(error = ?e, "An error occurred: {e}");
                e
            })
    }
}

/// Starts one project that has not been started yet on `today` and returns
/// `{message, buildId}`, or `{message}` when every project already ran.
async fn trigger_random_project(
    state: &Persisted,
    today: NaiveDate,
    rng: &mut (impl Rng + Send),
) -> Result<Value> {
    let key = TriggeredProjects::key_for(today);
    let repository = state.triggered_projects_repository.as_ref();

    let triggered = repository
        .get_triggered_projects(key.clone())
        .await
        .map_err(|e| anyhow!(e).context("unable to read triggered projects"))?;

    let mut candidates: Vec<String> = state
        .config
        .projects
        .iter()
        .filter(|project| !triggered.contains(project))
        .cloned()
        .collect();

    let project_name = loop {
        if candidates.is_empty() {
            tracing::info!(key = ?key, "All projects were already triggered");
            return Ok(json!({ "message": NOTHING_LEFT_MESSAGE }));
        }

        let candidate = candidates.swap_remove(rng.gen_range(0..candidates.len()));
        match repository.claim_project(key.clone(), candidate.clone()).await {
            Ok(()) => break candidate,
            Err(TriggeredProjectsRepositoryError::AlreadyClaimed(_)) => {
                tracing::info!(project_name = ?candidate, "Project claimed concurrently, picking another one");
            }
            Err(e) => {
                return Err(anyhow!(e)
                    .context(format!("unable to claim project {candidate}"))
                    .into())
            }
        }
    };

    let build_id = state
        .build_system
        .start_build(project_name.clone())
        .await
        .map_err(|e| anyhow!(e).context(format!("unable to start build for {project_name}")))?;
    tracing::info!(project_name = ?project_name, build_id = ?build_id, "Build triggered");

    Ok(json!({
        "message": format!("Triggered Build for Project: {project_name}"),
        "buildId": build_id.unwrap_or_else(|| NO_BUILD_ID.to_owned()),
    }))
}

lambda_main!(TriggerCodebuild);
