use async_trait::async_trait;

#[cfg(feature = "test_mocks")]
use mockall::mock;

pub mod alert_mailer_impl;

#[derive(Debug, thiserror::Error)]
pub enum MailerError {
    #[error("{0:#}")]
    Unknown(anyhow::Error),
}

/// Plain text email sent to the operations mailbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertEmail {
    pub sender: String,
    pub recipients: Vec<String>,
    pub subject: String,
    pub body: String,
}

#[async_trait]
pub trait AlertMailer
where
    Self: Sync + Send,
{
    /// Sends the email and returns the message id assigned by the mail service.
    async fn send(&self, email: AlertEmail) -> Result<String, MailerError>;
}

#[cfg(feature = "test_mocks")]
mock! {
    pub AlertMailer {}
    #[async_trait]
    impl AlertMailer for AlertMailer {
        async fn send(&self, email: AlertEmail) -> Result<String, MailerError>;
    }
}
