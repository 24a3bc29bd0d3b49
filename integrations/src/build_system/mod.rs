use async_trait::async_trait;
use model::build::BuildDetails;

#[cfg(feature = "test_mocks")]
use mockall::mock;

pub mod build_system_impl;

#[derive(Debug, thiserror::Error)]
pub enum BuildSystemError {
    #[error("{0:#}")]
    Unknown(anyhow::Error),
    #[error("{0}")]
    BuildNotFound(String),
}

#[async_trait]
pub trait BuildSystem
where
    Self: Sync + Send,
{
    /// Starts a build of `project_name` and returns its id when the build system reports one.
    async fn start_build(&self, project_name: String) -> Result<Option<String>, BuildSystemError>;

    async fn get_build(&self, build_id: String) -> Result<BuildDetails, BuildSystemError>;

    /// Ids of the most recent builds of a project, newest first.
    async fn list_recent_build_ids(
        &self,
        project_name: String,
    ) -> Result<Vec<String>, BuildSystemError>;
}

#[cfg(feature = "test_mocks")]
mock! {
    pub BuildSystem {}
    #[async_trait]
    impl BuildSystem for BuildSystem {
        async fn start_build(&self, project_name: String) -> Result<Option<String>, BuildSystemError>;

        async fn get_build(&self, build_id: String) -> Result<BuildDetails, BuildSystemError>;

        async fn list_recent_build_ids(
            &self,
            project_name: String,
        ) -> Result<Vec<String>, BuildSystemError>;
    }
}
