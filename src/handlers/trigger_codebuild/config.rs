use common::deserializers::comma_separated::comma_separated;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Projects the scheduled trigger picks from.
    #[serde(deserialize_with = "comma_separated")]
    pub projects: Vec<String>,

    #[serde(default = "default_triggered_projects_table_name")]
    pub triggered_projects_table_name: String,
}

pub fn default_triggered_projects_table_name() -> String {
    "trigger_codebuild_random".to_owned()
}
