use anyhow::anyhow;
use async_trait::async_trait;
use serde_json::Value;

use super::{ChatNotifier, NotifierError};

pub struct ChatNotifierImpl {
    http_client: reqwest::Client,
    webhook_url: String,
}

impl ChatNotifierImpl {
    pub fn new(http_client: reqwest::Client, webhook_url: String) -> Self {
        Self {
            http_client,
            webhook_url,
        }
    }
}

#[async_trait]
impl ChatNotifier for ChatNotifierImpl {
    async fn post(&self, card: Value) -> Result<(), NotifierError> {
        let response = self
            .http_client
            .post(&self.webhook_url)
            .json(&card)
            .send()
            .await
            .map_err(|e| {
                NotifierError::Unknown(anyhow!(e).context("Error posting to the chat webhook"))
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(NotifierError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}
