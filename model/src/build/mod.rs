use std::collections::HashMap;
use std::fmt::{self, Display, Formatter};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const CLIENT_NAME_VARIABLE: &str = "CLIENT_NAME";
pub const INSTANCE_TYPE_VARIABLE: &str = "INSTANCE_TYPE";

/// Reported for build environment variables that are not set.
pub const UNKNOWN_VARIABLE_VALUE: &str = "Unknown";

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(from = "String", into = "String")]
pub enum BuildStatus {
    Succeeded,
    Failed,
    Fault,
    Stopped,
    TimedOut,
    InProgress,
    Other(String),
}

impl BuildStatus {
    pub fn as_str(&self) -> &str {
        match self {
            BuildStatus::Succeeded => "SUCCEEDED",
            BuildStatus::Failed => "FAILED",
            BuildStatus::Fault => "FAULT",
            BuildStatus::Stopped => "STOPPED",
            BuildStatus::TimedOut => "TIMED_OUT",
            BuildStatus::InProgress => "IN_PROGRESS",
            BuildStatus::Other(status) => status,
        }
    }

    /// Outcomes that warrant a log excerpt sent to operations.
    pub fn is_failure_alert(&self) -> bool {
        matches!(self, BuildStatus::Failed | BuildStatus::Stopped)
    }
}

impl From<&str> for BuildStatus {
    fn from(value: &str) -> Self {
        match value.to_uppercase().as_str() {
            "SUCCEEDED" => BuildStatus::Succeeded,
            "FAILED" => BuildStatus::Failed,
            "FAULT" => BuildStatus::Fault,
            "STOPPED" => BuildStatus::Stopped,
            "TIMED_OUT" => BuildStatus::TimedOut,
            "IN_PROGRESS" => BuildStatus::InProgress,
            _ => BuildStatus::Other(value.to_owned()),
        }
    }
}

impl From<String> for BuildStatus {
    fn from(value: String) -> Self {
        BuildStatus::from(value.as_str())
    }
}

impl From<BuildStatus> for String {
    fn from(value: BuildStatus) -> Self {
        value.as_str().to_owned()
    }
}

impl Display for BuildStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Where the output of a build is stored.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct LogLocation {
    pub group_name: Option<String>,
    pub stream_name: Option<String>,
    pub deep_link: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct BuildDetails {
    pub id: String,
    pub project_name: String,
    pub build_number: Option<i64>,
    pub status: BuildStatus,
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub environment_variables: HashMap<String, String>,
    #[serde(default)]
    pub logs: LogLocation,
}

impl BuildDetails {
    pub fn environment_variable(&self, name: &str) -> &str {
        self.environment_variables
            .get(name)
            .map(String::as_str)
            .unwrap_or(UNKNOWN_VARIABLE_VALUE)
    }

    pub fn client_name(&self) -> &str {
        self.environment_variable(CLIENT_NAME_VARIABLE)
    }

    pub fn instance_type(&self) -> &str {
        self.environment_variable(INSTANCE_TYPE_VARIABLE)
    }

    pub fn formatted_end_time(&self) -> String {
        self.end_time
            .map(|time| time.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| UNKNOWN_VARIABLE_VALUE.to_owned())
    }
}
