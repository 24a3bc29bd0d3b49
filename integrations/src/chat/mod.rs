use async_trait::async_trait;
use serde_json::Value;

#[cfg(feature = "test_mocks")]
use mockall::mock;

pub mod chat_notifier_impl;

#[derive(Debug, thiserror::Error)]
pub enum NotifierError {
    #[error("{0:#}")]
    Unknown(anyhow::Error),
    #[error("webhook answered {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// Delivers a chat card to the configured incoming webhook.
#[async_trait]
pub trait ChatNotifier
where
    Self: Sync + Send,
{
    async fn post(&self, card: Value) -> Result<(), NotifierError>;
}

#[cfg(feature = "test_mocks")]
mock! {
    pub ChatNotifier {}
    #[async_trait]
    impl ChatNotifier for ChatNotifier {
        async fn post(&self, card: Value) -> Result<(), NotifierError>;
    }
}
