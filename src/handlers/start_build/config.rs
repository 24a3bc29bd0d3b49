use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub teams_webhook_url: String,
}
