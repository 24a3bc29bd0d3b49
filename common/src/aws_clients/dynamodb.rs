use rusoto_dynamodb::DynamoDbClient;

use super::{configured_region, AwsClientError};

pub fn get_dynamodb_client() -> Result<DynamoDbClient, AwsClientError> {
    Ok(DynamoDbClient::new(configured_region()?))
}
