use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

/// Environment prefix of the deploy projects approval cards point at.
pub const DEFAULT_PROJECT_ENVIRONMENT: &str = "dev";

/// Name of a CodeBuild project.
///
/// Deploy projects follow the `{environment}_{client}_{instance}_deploy`
/// convention; approval links carry the name verbatim.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct ProjectIdentifier(String);

impl ProjectIdentifier {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn for_deployment(environment: &str, client_name: &str, instance_type: &str) -> Self {
        Self(format!("{environment}_{client_name}_{instance_type}_deploy"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ProjectIdentifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<ProjectIdentifier> for String {
    fn from(value: ProjectIdentifier) -> Self {
        value.0
    }
}
