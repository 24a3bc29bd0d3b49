use rusoto_route53::Route53Client;

use super::{configured_region, AwsClientError};

pub fn get_route53_client() -> Result<Route53Client, AwsClientError> {
    Ok(Route53Client::new(configured_region()?))
}
