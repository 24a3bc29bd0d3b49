use rusoto_s3::S3Client;

use super::{configured_region, AwsClientError};

pub fn get_s3_client() -> Result<S3Client, AwsClientError> {
    Ok(S3Client::new(configured_region()?))
}
