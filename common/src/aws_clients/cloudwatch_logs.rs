use rusoto_logs::CloudWatchLogsClient;

use super::{configured_region, AwsClientError};

pub fn get_cloudwatch_logs_client() -> Result<CloudWatchLogsClient, AwsClientError> {
    Ok(CloudWatchLogsClient::new(configured_region()?))
}
