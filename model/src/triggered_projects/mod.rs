use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Projects already started by the scheduled trigger on a given day.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct TriggeredProjects {
    pub id: String,
    #[serde(default)]
    pub projects: Vec<String>,
}

impl TriggeredProjects {
    pub fn key_for(date: NaiveDate) -> String {
        format!("triggered_{}", date.format("%Y-%m-%d"))
    }

    pub fn contains(&self, project_name: &str) -> bool {
        self.projects.iter().any(|p| p == project_name)
    }
}
