use rusoto_codebuild::CodeBuildClient;

use super::{configured_region, AwsClientError};

pub fn get_codebuild_client() -> Result<CodeBuildClient, AwsClientError> {
    Ok(CodeBuildClient::new(configured_region()?))
}
