//! OrchestrationError is the error every handler of this crate can fail with.
//! Errors raised by the repositories and service clients are mapped to it.

use common::aws_clients::AwsClientError;
use lambda_runtime::Error as LambdaRuntimeError;

pub type Result<T> = std::result::Result<T, OrchestrationError>;
pub type LambdaRuntimeResult = std::result::Result<(), LambdaRuntimeError>;

#[derive(Debug, thiserror::Error)]
pub enum OrchestrationError {
    #[error("{0:#}")]
    Unknown(#[source] anyhow::Error),
}

impl From<anyhow::Error> for OrchestrationError {
    fn from(e: anyhow::Error) -> Self {
        Self::Unknown(e)
    }
}

impl From<envy::Error> for OrchestrationError {
    fn from(e: envy::Error) -> Self {
        Self::Unknown(anyhow::anyhow!(e).context("Error loading configuration"))
    }
}

impl From<AwsClientError> for OrchestrationError {
    fn from(e: AwsClientError) -> Self {
        Self::Unknown(anyhow::anyhow!(e))
    }
}

/// Cause of an HTTP error response; only ever logged.
#[derive(Debug, thiserror::Error)]
pub enum LambdaError {
    #[error("{0:#}")]
    Unknown(#[source] anyhow::Error),
}
