use model::deploy_config::{ResolvedConfigValues, TrackedField};
use model::deployment::{DeployerIdentity, DeploymentRecord};
use model::project::ProjectIdentifier;
use serde_json::{json, Value};

use super::{adaptive_card_message, detail_columns};

pub const APPROVE_ACTION: &str = "approve";
pub const DECLINE_ACTION: &str = "decline";

const TITLE: &str = "Deployment Approval Request";

/// Card asking a human to approve or decline the build of a deploy project.
///
/// The decision travels back to the dispatcher entirely through the query
/// string of the two action urls.
pub struct ApprovalCard<'a> {
    pub deployer: &'a DeployerIdentity,
    pub deployment: &'a DeploymentRecord,
    pub config_values: &'a ResolvedConfigValues,
    pub project: &'a ProjectIdentifier,
    pub dispatcher_url: &'a str,
}

impl<'a> ApprovalCard<'a> {
    pub fn action_url(&self, action: &str) -> String {
        format!(
            "{}?action={}&project_name={}",
            self.dispatcher_url,
            urlencoding::encode(action),
            urlencoding::encode(self.project.as_str())
        )
    }

    fn deployer_text(&self) -> String {
        match self.deployer.identity_handle {
            Some(_) => format!("<at>{}</at>", self.deployer.display_name),
            None => self.deployer.display_name.clone(),
        }
    }

    fn mention_entities(&self) -> Vec<Value> {
        match &self.deployer.identity_handle {
            Some(handle) => vec![json!({
                "type": "mention",
                "text": self.deployer_text(),
                "mentioned": {
                    "id": handle,
                    "name": self.deployer.display_name,
                }
            })],
            None => vec![],
        }
    }

    pub fn to_payload(&self) -> Value {
        let config = |field: TrackedField| json!(self.config_values.get(field));

        let details = detail_columns(&[
            ("Last Deployer", json!(self.deployer_text())),
            ("Client Name", json!(self.deployment.client_name)),
            ("Instance Type", json!(self.deployment.instance_type)),
            ("Timestamp of Deploy", json!(self.deployment.formatted_timestamp())),
            ("ETL Automation", config(TrackedField::EtlAutomationEnabled)),
            ("ETL V2 App", config(TrackedField::EtlV2ApplicationEnabled)),
            ("Version Category", config(TrackedField::VersionCategory)),
            (
                "App Version Override",
                config(TrackedField::ApplicationVersionOverride),
            ),
        ]);

        let body = vec![
            json!({
                "type": "TextBlock",
                "text": TITLE,
                "size": "Large",
                "weight": "Bolder",
                "color": "Accent"
            }),
            details,
        ];

        let actions = vec![
            json!({
                "type": "Action.OpenUrl",
                "title": "Approve",
                "url": self.action_url(APPROVE_ACTION),
                "role": "Button",
                "style": "positive"
            }),
            json!({
                "type": "Action.OpenUrl",
                "title": "Decline",
                "url": self.action_url(DECLINE_ACTION),
                "role": "Button",
                "style": "destructive"
            }),
        ];

        adaptive_card_message(body, Some(actions), self.mention_entities())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use model::deploy_config::{ResolvedConfigValues, TrackedField, NOT_AVAILABLE};
    use model::deployment::{DeployerIdentity, DeploymentRecord};
    use model::project::ProjectIdentifier;
    use rstest::*;
    use serde_json::Value;

    use super::ApprovalCard;

    struct TestFixture {
        pub deployment: DeploymentRecord,
        pub config_values: ResolvedConfigValues,
        pub project: ProjectIdentifier,
    }

    #[fixture]
    fn fixture() -> TestFixture {
        let deployment = DeploymentRecord {
            id: 7,
            client_name: "acme".to_owned(),
            instance_type: "prod".to_owned(),
            request_timestamp: NaiveDate::from_ymd_opt(2024, 5, 1)
                .unwrap()
                .and_hms_opt(10, 30, 0)
                .unwrap(),
            user_id: Some(3),
        };

        TestFixture {
            project: ProjectIdentifier::for_deployment("dev", "acme", "prod"),
            config_values: ResolvedConfigValues::default()
                .with_value(TrackedField::VersionCategory, "stable"),
            deployment,
        }
    }

    fn render(fixture: &TestFixture, deployer: &DeployerIdentity) -> Value {
        ApprovalCard {
            deployer,
            deployment: &fixture.deployment,
            config_values: &fixture.config_values,
            project: &fixture.project,
            dispatcher_url: "https://dispatch.example.org/",
        }
        .to_payload()
    }

    fn values_column(card: &Value) -> Vec<String> {
        card["attachments"][0]["content"]["body"][1]["columns"][2]["items"]
            .as_array()
            .unwrap()
            .iter()
            .map(|item| item["text"].as_str().unwrap().to_owned())
            .collect()
    }

    #[rstest]
    fn renders_details_and_actions(fixture: TestFixture) {
        let deployer = DeployerIdentity::new("Ana", Some("obj-1".to_owned()));
        let card = render(&fixture, &deployer);
        let content = &card["attachments"][0]["content"];

        assert_eq!("1.2", content["version"]);
        assert_eq!("Deployment Approval Request", content["body"][0]["text"]);
        assert_eq!(
            vec![
                "<at>Ana</at>",
                "acme",
                "prod",
                "2024-05-01T10:30:00",
                NOT_AVAILABLE,
                NOT_AVAILABLE,
                "stable",
                NOT_AVAILABLE
            ],
            values_column(&card)
        );
        assert_eq!(
            "https://dispatch.example.org/?action=approve&project_name=dev_acme_prod_deploy",
            content["actions"][0]["url"]
        );
        assert_eq!("positive", content["actions"][0]["style"]);
        assert_eq!(
            "https://dispatch.example.org/?action=decline&project_name=dev_acme_prod_deploy",
            content["actions"][1]["url"]
        );
        assert_eq!("destructive", content["actions"][1]["style"]);
        assert_eq!("obj-1", content["msteams"]["entities"][0]["mentioned"]["id"]);
    }

    #[rstest]
    fn renders_plain_name_without_handle(fixture: TestFixture) {
        let card = render(&fixture, &DeployerIdentity::unknown());

        assert_eq!("Unknown", values_column(&card)[0]);
        assert!(card["attachments"][0]["content"]["msteams"]["entities"]
            .as_array()
            .unwrap()
            .is_empty());
    }

    #[rstest]
    fn percent_encodes_project_names(mut fixture: TestFixture) {
        fixture.project = ProjectIdentifier::new("dev_a&b c_prod_deploy");
        let deployer = DeployerIdentity::unknown();

        let card = ApprovalCard {
            deployer: &deployer,
            deployment: &fixture.deployment,
            config_values: &fixture.config_values,
            project: &fixture.project,
            dispatcher_url: "https://dispatch.example.org/",
        };

        assert_eq!(
            "https://dispatch.example.org/?action=approve&project_name=dev_a%26b%20c_prod_deploy",
            card.action_url("approve")
        );
    }
}
