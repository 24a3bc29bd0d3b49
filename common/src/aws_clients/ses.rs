use rusoto_ses::SesClient;

use super::{configured_region, AwsClientError};

pub fn get_ses_client() -> Result<SesClient, AwsClientError> {
    Ok(SesClient::new(configured_region()?))
}
