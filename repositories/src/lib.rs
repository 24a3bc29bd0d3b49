pub mod deployments;
pub mod deserialize;
pub mod triggered_projects;
