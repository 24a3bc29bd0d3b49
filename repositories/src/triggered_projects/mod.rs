use async_trait::async_trait;
use model::triggered_projects::TriggeredProjects;
use serde::Serialize;

use crate::impl_unknown_error_trait;

#[cfg(feature = "test_mocks")]
use mockall::mock;

pub mod triggered_projects_repository_impl;

#[derive(Debug, thiserror::Error)]
pub enum TriggeredProjectsRepositoryError {
    #[error("{0:#}")]
    Unknown(anyhow::Error),
    #[error("{0}")]
    AlreadyClaimed(String),
}

impl_unknown_error_trait!(TriggeredProjectsRepositoryError);

#[derive(Debug, Serialize)]
pub struct TriggeredProjectsPrimaryKeyDynamoDbResource {
    pub id: String,
}

#[derive(Debug, Serialize)]
pub struct ClaimProjectDynamoDbResource {
    #[serde(rename(serialize = ":project"))]
    pub project: String,

    #[serde(rename(serialize = ":project_list"))]
    pub project_list: Vec<String>,

    #[serde(rename(serialize = ":empty_list"))]
    pub empty_list: Vec<String>,
}

#[async_trait]
pub trait TriggeredProjectsRepository
where
    Self: Sync + Send,
{
    /// Projects recorded under `key`; a missing item reads as an empty record.
    async fn get_triggered_projects(
        &self,
        key: String,
    ) -> Result<TriggeredProjects, TriggeredProjectsRepositoryError>;

    /// Appends `project_name` to the record under `key` unless it is already there.
    async fn claim_project(
        &self,
        key: String,
        project_name: String,
    ) -> Result<(), TriggeredProjectsRepositoryError>;

    /// Deletes every record and returns how many were removed.
    async fn delete_all(&self) -> Result<usize, TriggeredProjectsRepositoryError>;
}

#[cfg(feature = "test_mocks")]
mock! {
    pub TriggeredProjectsRepository {}
    #[async_trait]
    impl TriggeredProjectsRepository for TriggeredProjectsRepository {
        async fn get_triggered_projects(
            &self,
            key: String,
        ) -> Result<TriggeredProjects, TriggeredProjectsRepositoryError>;

        async fn claim_project(
            &self,
            key: String,
            project_name: String,
        ) -> Result<(), TriggeredProjectsRepositoryError>;

        async fn delete_all(&self) -> Result<usize, TriggeredProjectsRepositoryError>;
    }
}
