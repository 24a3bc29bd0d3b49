use integrations::mailer::AlertEmail;
use model::build::BuildDetails;

use crate::config::Config;

fn subject(build: &BuildDetails) -> String {
    let build_number = build
        .build_number
        .map(|number| number.to_string())
        .unwrap_or_else(|| "Unknown".to_owned());

    format!(
        "{} » {} - Build # {} - {}",
        build.client_name(),
        build.instance_type(),
        build_number,
        build.status.as_str().to_uppercase()
    )
}

fn alert_email(config: &Config, build: &BuildDetails, subject: String, body: String) -> AlertEmail {
    AlertEmail {
        sender: format!("alert@{}.{}", build.client_name(), config.mail_domain),
        recipients: config.alert_recipients.clone(),
        subject,
        body,
    }
}

/// Failed or stopped build, with the tail of its log.
pub fn failure_email(config: &Config, build: &BuildDetails, log_lines: &[String]) -> AlertEmail {
    let subject = subject(build);
    let body = format!(
        "{subject}\n\n\nHere are the last {} lines of the CodeBuild Project Build Log:\n\n\n{}",
        config.max_log_lines,
        log_lines.join("\n")
    );

    alert_email(config, build, subject, body)
}

/// Successful build right after a failed one.
pub fn recovery_email(config: &Config, build: &BuildDetails) -> AlertEmail {
    let subject = subject(build);
    let body = subject.clone();

    alert_email(config, build, subject, body)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use model::build::{BuildDetails, BuildStatus, LogLocation};

    use super::{failure_email, recovery_email};
    use crate::config::Config;

    fn config() -> Config {
        Config {
            teams_webhook_url: "https://teams.example.org".to_owned(),
            bucket_name: "assets".to_owned(),
            mail_domain: "example.org".to_owned(),
            alert_recipients: vec!["ops@example.org".to_owned()],
            max_log_lines: 2,
        }
    }

    fn build(status: BuildStatus, build_number: Option<i64>) -> BuildDetails {
        BuildDetails {
            id: "acme-prod:42".to_owned(),
            project_name: "dev_acme_prod_deploy".to_owned(),
            build_number,
            status,
            end_time: None,
            environment_variables: HashMap::from([
                ("CLIENT_NAME".to_owned(), "acme".to_owned()),
                ("INSTANCE_TYPE".to_owned(), "prod".to_owned()),
            ]),
            logs: LogLocation::default(),
        }
    }

    #[test]
    fn failure_email_carries_log_excerpt() {
        let lines = vec!["step 9".to_owned(), "exit status 1".to_owned()];

        let email = failure_email(&config(), &build(BuildStatus::Failed, Some(42)), &lines);

        assert_eq!("alert@acme.example.org", email.sender);
        assert_eq!(vec!["ops@example.org"], email.recipients);
        assert_eq!("acme » prod - Build # 42 - FAILED", email.subject);
        assert_eq!(
            "acme » prod - Build # 42 - FAILED\n\n\nHere are the last 2 lines of the CodeBuild Project Build Log:\n\n\nstep 9\nexit status 1",
            email.body
        );
    }

    #[test]
    fn recovery_email_is_subject_only() {
        let email = recovery_email(&config(), &build(BuildStatus::Succeeded, None));

        assert_eq!("acme » prod - Build # Unknown - SUCCEEDED", email.subject);
        assert_eq!(email.subject, email.body);
    }
}
