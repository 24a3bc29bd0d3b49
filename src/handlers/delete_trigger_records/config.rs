use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_triggered_projects_table_name")]
    pub triggered_projects_table_name: String,
}

fn default_triggered_projects_table_name() -> String {
    "trigger_codebuild_random".to_owned()
}
