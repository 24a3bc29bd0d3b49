use anyhow::anyhow;
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use model::build::{BuildDetails, BuildStatus, LogLocation, UNKNOWN_VARIABLE_VALUE};
use rusoto_codebuild::{
    BatchGetBuildsInput, Build, CodeBuild, ListBuildsForProjectInput, StartBuildInput,
};

use super::{BuildSystem, BuildSystemError};

const DESCENDING: &str = "DESCENDING";

pub struct BuildSystemImpl<C: CodeBuild + Sync + Send> {
    codebuild_client: C,
}

impl<C: CodeBuild + Sync + Send> BuildSystemImpl<C> {
    pub fn new(codebuild_client: C) -> Self {
        Self { codebuild_client }
    }
}

#[async_trait]
impl<C: CodeBuild + Sync + Send> BuildSystem for BuildSystemImpl<C> {
    async fn start_build(&self, project_name: String) -> Result<Option<String>, BuildSystemError> {
        let input = StartBuildInput {
            project_name: project_name.clone(),
            ..Default::default()
        };

        let output = self
            .codebuild_client
            .start_build(input)
            .await
            .map_err(|e| {
                BuildSystemError::Unknown(
                    anyhow!(e).context(format!("Error starting a build of {project_name}")),
                )
            })?;

        Ok(output.build.and_then(|build| build.id))
    }

    async fn get_build(&self, build_id: String) -> Result<BuildDetails, BuildSystemError> {
        let input = BatchGetBuildsInput {
            ids: vec![build_id.clone()],
        };

        let build = self
            .codebuild_client
            .batch_get_builds(input)
            .await
            .map_err(|e| {
                BuildSystemError::Unknown(
                    anyhow!(e).context(format!("Error fetching build {build_id}")),
                )
            })?
            .builds
            .and_then(|builds| builds.into_iter().next())
            .ok_or_else(|| BuildSystemError::BuildNotFound(format!("build {build_id} not found")))?;

        build_details_from(build)
    }

    async fn list_recent_build_ids(
        &self,
        project_name: String,
    ) -> Result<Vec<String>, BuildSystemError> {
        let input = ListBuildsForProjectInput {
            project_name: project_name.clone(),
            sort_order: Some(DESCENDING.to_owned()),
            next_token: None,
        };

        let output = self
            .codebuild_client
            .list_builds_for_project(input)
            .await
            .map_err(|e| {
                BuildSystemError::Unknown(
                    anyhow!(e).context(format!("Error listing the builds of {project_name}")),
                )
            })?;

        Ok(output.ids.unwrap_or_default())
    }
}

fn build_details_from(build: Build) -> Result<BuildDetails, BuildSystemError> {
    let id = build
        .id
        .ok_or_else(|| BuildSystemError::Unknown(anyhow!("build returned without an id")))?;

    let environment_variables = build
        .environment
        .and_then(|environment| environment.environment_variables)
        .unwrap_or_default()
        .into_iter()
        .map(|variable| (variable.name, variable.value))
        .collect();

    let logs = build
        .logs
        .map(|logs| LogLocation {
            group_name: logs.group_name,
            stream_name: logs.stream_name,
            deep_link: logs.deep_link,
        })
        .unwrap_or_default();

    Ok(BuildDetails {
        id,
        project_name: build.project_name.unwrap_or_default(),
        build_number: build.build_number,
        status: build
            .build_status
            .map(BuildStatus::from)
            .unwrap_or_else(|| BuildStatus::Other(UNKNOWN_VARIABLE_VALUE.to_owned())),
        end_time: build.end_time.and_then(from_epoch_seconds),
        environment_variables,
        logs,
    })
}

fn from_epoch_seconds(seconds: f64) -> Option<DateTime<Utc>> {
    let whole = seconds.trunc();
    let nanos = ((seconds - whole) * 1_000_000_000.0).round() as u32;
    Utc.timestamp_opt(whole as i64, nanos.min(999_999_999))
        .single()
}
