use model::build::{BuildDetails, BuildStatus};
use serde_json::{json, Value};

use super::{adaptive_card_message, detail_columns};

const SUCCESS_IMAGE_KEY: &str = "build_status_images/success.png";
const FAILED_IMAGE_KEY: &str = "build_status_images/failed.png";

/// Object key of the illustration shown for a build outcome. Outcomes without
/// an illustration are not announced in chat.
pub fn status_image_key(status: &BuildStatus) -> Option<&'static str> {
    match status {
        BuildStatus::Succeeded => Some(SUCCESS_IMAGE_KEY),
        BuildStatus::Failed => Some(FAILED_IMAGE_KEY),
        _ => None,
    }
}

pub struct BuildStatusCard<'a> {
    pub build: &'a BuildDetails,
    pub image_base64: &'a str,
}

impl<'a> BuildStatusCard<'a> {
    fn color(&self) -> &'static str {
        match self.build.status {
            BuildStatus::Succeeded => "good",
            _ => "attention",
        }
    }

    fn log_link(&self) -> Option<&str> {
        match self.build.status {
            BuildStatus::Failed => self.build.logs.deep_link.as_deref(),
            _ => None,
        }
    }

    pub fn to_payload(&self) -> Value {
        let mut rows = vec![
            ("Client Name", json!(self.build.client_name())),
            ("Instance Type", json!(self.build.instance_type())),
            ("Timestamp of Deploy", json!(self.build.formatted_end_time())),
        ];
        if let Some(link) = self.log_link() {
            rows.push(("Build Logs", json!(format!("[View Logs]({link})"))));
        }

        let status = json!({
            "type": "RichTextBlock",
            "inlines": [
                {
                    "type": "TextRun",
                    "text": "Status of Latest Build: ",
                    "weight": "Bolder",
                    "size": "Large",
                    "style": "default"
                },
                {
                    "type": "TextRun",
                    "text": self.build.status.as_str().to_uppercase(),
                    "weight": "Bolder",
                    "size": "Large",
                    "color": self.color(),
                    "style": "default"
                }
            ]
        });

        let body = vec![json!({
            "type": "ColumnSet",
            "columns": [
                {
                    "type": "Column",
                    "width": "auto",
                    "items": [
                        {
                            "type": "Image",
                            "url": format!("data:image/png;base64,{}", self.image_base64),
                            "size": "Medium",
                            "style": "person"
                        }
                    ]
                },
                {
                    "type": "Column",
                    "width": "stretch",
                    "items": [
                        status,
                        {
                            "type": "TextBlock",
                            "text": "Details of the CodeBuild Project:",
                            "size": "medium",
                            "style": "default"
                        },
                        detail_columns(&rows)
                    ]
                }
            ]
        })];

        adaptive_card_message(body, None, vec![])
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use model::build::{BuildDetails, BuildStatus, LogLocation};
    use rstest::rstest;
    use serde_json::Value;

    use super::{status_image_key, BuildStatusCard};

    fn build(status: BuildStatus) -> BuildDetails {
        BuildDetails {
            id: "dev_acme_prod_deploy:1".to_owned(),
            project_name: "dev_acme_prod_deploy".to_owned(),
            build_number: Some(12),
            status,
            end_time: None,
            environment_variables: HashMap::from([
                ("CLIENT_NAME".to_owned(), "acme".to_owned()),
                ("INSTANCE_TYPE".to_owned(), "prod".to_owned()),
            ]),
            logs: LogLocation {
                deep_link: Some("https://logs.example.org/1".to_owned()),
                ..Default::default()
            },
        }
    }

    fn detail_labels(card: &Value) -> Vec<&str> {
        card["attachments"][0]["content"]["body"][0]["columns"][1]["items"][2]["columns"][0]
            ["items"]
            .as_array()
            .unwrap()
            .iter()
            .map(|item| item["text"].as_str().unwrap())
            .collect()
    }

    fn status_run(card: &Value) -> &Value {
        &card["attachments"][0]["content"]["body"][0]["columns"][1]["items"][0]["inlines"][1]
    }

    #[rstest]
    #[case::succeeded(BuildStatus::Succeeded, Some("build_status_images/success.png"))]
    #[case::failed(BuildStatus::Failed, Some("build_status_images/failed.png"))]
    #[case::stopped(BuildStatus::Stopped, None)]
    #[case::in_progress(BuildStatus::InProgress, None)]
    fn picks_illustration_by_outcome(#[case] status: BuildStatus, #[case] key: Option<&str>) {
        assert_eq!(key, status_image_key(&status));
    }

    #[test]
    fn success_card_is_good_without_logs() {
        let build = build(BuildStatus::Succeeded);
        let card = BuildStatusCard {
            build: &build,
            image_base64: "aGVsbG8=",
        }
        .to_payload();

        assert_eq!("good", status_run(&card)["color"]);
        assert_eq!("SUCCEEDED", status_run(&card)["text"]);
        assert_eq!(
            vec!["Client Name", "Instance Type", "Timestamp of Deploy"],
            detail_labels(&card)
        );
        assert_eq!(
            "data:image/png;base64,aGVsbG8=",
            card["attachments"][0]["content"]["body"][0]["columns"][0]["items"][0]["url"]
        );
    }

    #[test]
    fn failed_card_links_the_logs() {
        let build = build(BuildStatus::Failed);
        let card = BuildStatusCard {
            build: &build,
            image_base64: "aGVsbG8=",
        }
        .to_payload();

        assert_eq!("attention", status_run(&card)["color"]);
        assert_eq!(
            vec!["Client Name", "Instance Type", "Timestamp of Deploy", "Build Logs"],
            detail_labels(&card)
        );
        let values = &card["attachments"][0]["content"]["body"][0]["columns"][1]["items"][2]
            ["columns"][2]["items"];
        assert_eq!("[View Logs](https://logs.example.org/1)", values[3]["text"]);
    }
}
