pub mod build;
pub mod deploy_config;
pub mod deployment;
pub mod project;
pub mod triggered_projects;
