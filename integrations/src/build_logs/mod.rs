use async_trait::async_trait;
use model::build::LogLocation;

#[cfg(feature = "test_mocks")]
use mockall::mock;

pub mod build_log_reader_impl;

#[derive(Debug, thiserror::Error)]
pub enum BuildLogsError {
    #[error("{0:#}")]
    Unknown(anyhow::Error),
    #[error("{0}")]
    MissingLocation(String),
}

#[async_trait]
pub trait BuildLogReader
where
    Self: Sync + Send,
{
    /// Last `max_lines` lines of a build log, oldest first.
    async fn tail(
        &self,
        location: LogLocation,
        max_lines: usize,
    ) -> Result<Vec<String>, BuildLogsError>;
}

#[cfg(feature = "test_mocks")]
mock! {
    pub BuildLogReader {}
    #[async_trait]
    impl BuildLogReader for BuildLogReader {
        async fn tail(
            &self,
            location: LogLocation,
            max_lines: usize,
        ) -> Result<Vec<String>, BuildLogsError>;
    }
}
