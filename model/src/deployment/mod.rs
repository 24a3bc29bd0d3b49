use chrono::NaiveDateTime;
use serde::Serialize;

use crate::deploy_config::ResolvedConfigValues;

/// Display name used when nobody can be credited with a deployment.
pub const UNKNOWN_DEPLOYER: &str = "Unknown";

/// A deployment request as written by the self-service deployment app.
#[derive(Debug, Clone, PartialEq)]
pub struct DeploymentRecord {
    pub id: i64,
    pub client_name: String,
    pub instance_type: String,
    pub request_timestamp: NaiveDateTime,
    pub user_id: Option<i64>,
}

impl DeploymentRecord {
    pub fn summary(&self) -> DeploymentSummary {
        DeploymentSummary {
            client_name: self.client_name.clone(),
            instance_type: self.instance_type.clone(),
            request_timestamp: self.formatted_timestamp(),
            user_id: self.user_id,
        }
    }

    /// ISO 8601 without offset; microseconds only when they are non-zero.
    pub fn formatted_timestamp(&self) -> String {
        let format = if self.request_timestamp.timestamp_subsec_micros() == 0 {
            "%Y-%m-%dT%H:%M:%S"
        } else {
            "%Y-%m-%dT%H:%M:%S%.6f"
        };

        self.request_timestamp.format(format).to_string()
    }
}

/// What a deployment handler reports back about the deployment it processed.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct DeploymentSummary {
    pub client_name: String,
    pub instance_type: String,
    pub request_timestamp: String,
    pub user_id: Option<i64>,
}

/// Raw configuration documents attached to a deployment request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeploymentConfigPair {
    pub original: Option<String>,
    pub updated: Option<String>,
}

impl DeploymentConfigPair {
    /// Values of the updated document, with gaps filled from the original one.
    pub fn resolve(&self) -> ResolvedConfigValues {
        let original = ResolvedConfigValues::resolve_text(self.original.as_deref());
        ResolvedConfigValues::resolve_text(self.updated.as_deref()).merged_over(&original)
    }
}

/// Person credited with a deployment in notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployerIdentity {
    pub display_name: String,
    /// Opaque chat user id; a mention is only possible when it is present.
    pub identity_handle: Option<String>,
}

impl DeployerIdentity {
    pub fn new(display_name: impl Into<String>, identity_handle: Option<String>) -> Self {
        Self {
            display_name: display_name.into(),
            identity_handle: identity_handle.filter(|handle| !handle.trim().is_empty()),
        }
    }

    pub fn unknown() -> Self {
        Self {
            display_name: UNKNOWN_DEPLOYER.to_owned(),
            identity_handle: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use serde_json::json;

    use crate::deploy_config::{TrackedField, NOT_AVAILABLE};

    use super::*;

    #[test]
    fn config_pair_prefers_updated_document() {
        let pair = DeploymentConfigPair {
            original: Some(
                json!({
                    "etl": { "etl_automation_enabled": false },
                    "shared": { "version_category": "stable" }
                })
                .to_string(),
            ),
            updated: Some(json!({ "etl": { "etl_automation_enabled": true } }).to_string()),
        };

        let values = pair.resolve();

        assert_eq!("true", values.get(TrackedField::EtlAutomationEnabled));
        assert_eq!("stable", values.get(TrackedField::VersionCategory));
        assert_eq!(NOT_AVAILABLE, values.get(TrackedField::EtlV2ApplicationEnabled));
    }

    #[test]
    fn config_pair_without_documents_is_all_sentinel() {
        assert_eq!(
            crate::deploy_config::ResolvedConfigValues::default(),
            DeploymentConfigPair::default().resolve()
        );
    }

    #[test]
    fn blank_identity_handle_is_dropped() {
        let identity = DeployerIdentity::new("Ana", Some(" ".to_owned()));
        assert_eq!(None, identity.identity_handle);
    }

    #[test]
    fn summary_uses_iso_timestamp() {
        let record = DeploymentRecord {
            id: 7,
            client_name: "acme".to_owned(),
            instance_type: "prod".to_owned(),
            request_timestamp: NaiveDate::from_ymd_opt(2024, 5, 2)
                .unwrap()
                .and_hms_opt(13, 4, 5)
                .unwrap(),
            user_id: Some(3),
        };

        let summary = record.summary();

        assert_eq!("2024-05-02T13:04:05", summary.request_timestamp);
        assert_eq!(Some(3), summary.user_id);
    }

    #[test]
    fn fractional_seconds_are_padded_to_microseconds() {
        let record = DeploymentRecord {
            id: 8,
            client_name: "acme".to_owned(),
            instance_type: "prod".to_owned(),
            request_timestamp: NaiveDate::from_ymd_opt(2024, 5, 2)
                .unwrap()
                .and_hms_milli_opt(13, 4, 5, 123)
                .unwrap(),
            user_id: None,
        };

        assert_eq!("2024-05-02T13:04:05.123000", record.formatted_timestamp());
    }
}
