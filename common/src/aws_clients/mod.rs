pub mod cloudwatch_logs;
pub mod codebuild;
pub mod dynamodb;
pub mod route53;
pub mod s3;
pub mod ses;

use rusoto_core::region::{ParseRegionError, Region};

use crate::config::aws_client_config::AwsClientConfig;
use crate::config::ConfigLoader;

#[derive(Debug, thiserror::Error)]
pub enum AwsClientError {
    #[error("unable to load AWS client configuration: {0}")]
    Config(#[from] envy::Error),
    #[error("unable to parse AWS region: {0}")]
    Region(#[from] ParseRegionError),
}

/// Region every client of a handler talks to, honoring the LocalStack override.
pub(crate) fn configured_region() -> Result<Region, AwsClientError> {
    let config = ConfigLoader::load_default::<AwsClientConfig>()?;
    Ok(config.region()?)
}
