use std::str::FromStr;

use rusoto_core::region::{ParseRegionError, Region};
use serde::Deserialize;

#[derive(Deserialize, Clone, Debug)]
pub struct AwsClientConfig {
    /// Current AWS region.
    aws_region: String,

    /// Only used for development. LocalStack endpoint
    #[serde(default)]
    pub localstack_test_mode_endpoint: Option<String>,
}

impl AwsClientConfig {
    pub fn new(aws_region: impl Into<String>, localstack_test_mode_endpoint: Option<String>) -> Self {
        Self {
            aws_region: aws_region.into(),
            localstack_test_mode_endpoint,
        }
    }

    pub fn region(&self) -> Result<Region, ParseRegionError> {
        match self.localstack_test_mode_endpoint.clone() {
            Some(endpoint) => Ok(Region::Custom {
                name: self.aws_region.clone(),
                endpoint,
            }),
            None => Region::from_str(&self.aws_region),
        }
    }
}

#[cfg(test)]
mod tests {
    use rusoto_core::Region;

    use super::AwsClientConfig;

    #[test]
    fn localstack_endpoint_builds_custom_region() {
        let config = AwsClientConfig::new(
            "us-east-1",
            Some("http://localstack:4566".to_owned()),
        );

        assert_eq!(
            Region::Custom {
                name: "us-east-1".to_owned(),
                endpoint: "http://localstack:4566".to_owned(),
            },
            config.region().unwrap()
        );
    }

    #[test]
    fn invalid_region_is_an_error() {
        let config = AwsClientConfig::new("moon-base-1", None);
        assert!(config.region().is_err());
    }
}
