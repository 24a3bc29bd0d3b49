use model::project::DEFAULT_PROJECT_ENVIRONMENT;
use serde::Deserialize;
use sqlx::mysql::MySqlConnectOptions;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub teams_webhook_url: String,

    /// Public url of the `start_build` lambda, target of the approval actions.
    pub lambda_function_url: String,

    /// Prefix of the deploy project names.
    #[serde(default = "default_project_environment")]
    pub project_environment: String,

    pub db_host: String,
    #[serde(default = "default_db_port")]
    pub db_port: u16,
    pub db_username: String,
    pub db_password: String,
    pub db_name: String,
}

fn default_project_environment() -> String {
    DEFAULT_PROJECT_ENVIRONMENT.to_owned()
}

fn default_db_port() -> u16 {
    3306
}

impl Config {
    pub fn connect_options(&self) -> MySqlConnectOptions {
        MySqlConnectOptions::new()
            .host(&self.db_host)
            .port(self.db_port)
            .username(&self.db_username)
            .password(&self.db_password)
            .database(&self.db_name)
    }
}
