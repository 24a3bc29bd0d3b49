use common::deserializers::comma_separated::comma_separated;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub teams_webhook_url: String,

    /// Bucket holding the build status illustrations.
    pub bucket_name: String,

    /// Alerts are sent from `alert@{client}.{mail_domain}`.
    pub mail_domain: String,

    #[serde(deserialize_with = "comma_separated")]
    pub alert_recipients: Vec<String>,

    #[serde(default = "default_max_log_lines")]
    pub max_log_lines: usize,
}

fn default_max_log_lines() -> usize {
    50
}
