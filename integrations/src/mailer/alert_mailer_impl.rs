use anyhow::anyhow;
use async_trait::async_trait;
use rusoto_ses::{Body, Content, Destination, Message, SendEmailRequest, Ses};

use super::{AlertEmail, AlertMailer, MailerError};

const CHARSET: &str = "UTF-8";

pub struct AlertMailerImpl<S: Ses + Sync + Send> {
    ses_client: S,
}

impl<S: Ses + Sync + Send> AlertMailerImpl<S> {
    pub fn new(ses_client: S) -> Self {
        Self { ses_client }
    }
}

fn content(data: String) -> Content {
    Content {
        charset: Some(CHARSET.to_owned()),
        data,
    }
}

fn send_email_request(email: AlertEmail) -> SendEmailRequest {
    SendEmailRequest {
        source: email.sender,
        destination: Destination {
            to_addresses: Some(email.recipients),
            ..Default::default()
        },
        message: Message {
            subject: content(email.subject),
            body: Body {
                text: Some(content(email.body)),
                html: None,
            },
        },
        ..Default::default()
    }
}

#[async_trait]
impl<S: Ses + Sync + Send> AlertMailer for AlertMailerImpl<S> {
    async fn send(&self, email: AlertEmail) -> Result<String, MailerError> {
        let subject = email.subject.clone();

        let response = self
            .ses_client
            .send_email(send_email_request(email))
            .await
            .map_err(|e| {
                MailerError::Unknown(anyhow!(e).context(format!("Error sending email '{subject}'")))
            })?;

        Ok(response.message_id)
    }
}

#[cfg(test)]
mod tests {
    use super::send_email_request;
    use crate::mailer::AlertEmail;

    #[test]
    fn builds_plain_text_request() {
        let request = send_email_request(AlertEmail {
            sender: "alert@acme.example.org".to_owned(),
            recipients: vec!["devops@example.org".to_owned()],
            subject: "acme » prod - Build # 7 - FAILED".to_owned(),
            body: "log excerpt".to_owned(),
        });

        assert_eq!("alert@acme.example.org", request.source);
        assert_eq!(
            Some(vec!["devops@example.org".to_owned()]),
            request.destination.to_addresses
        );
        assert_eq!("acme » prod - Build # 7 - FAILED", request.message.subject.data);
        assert_eq!(
            Some("log excerpt"),
            request.message.body.text.as_ref().map(|c| c.data.as_str())
        );
        assert!(request.message.body.html.is_none());
    }
}
