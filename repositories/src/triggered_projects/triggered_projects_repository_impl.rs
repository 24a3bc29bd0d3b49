use std::collections::HashMap;

use anyhow::anyhow;
use async_trait::async_trait;
use model::triggered_projects::TriggeredProjects;
use rusoto_core::RusotoError;
use rusoto_dynamodb::{
    AttributeValue, DeleteItemInput, DynamoDb, GetItemInput, ScanInput, UpdateItemError,
    UpdateItemInput,
};
use serde_dynamo::Error;

use super::{
    ClaimProjectDynamoDbResource, TriggeredProjectsPrimaryKeyDynamoDbResource,
    TriggeredProjectsRepository, TriggeredProjectsRepositoryError,
};
use crate::deserialize::deserialize_from_dynamo;

pub struct TriggeredProjectsRepositoryImpl<D: DynamoDb + Sync + Send> {
    table_name: String,
    dynamodb_client: D,
}

impl<D: DynamoDb + Sync + Send> TriggeredProjectsRepositoryImpl<D> {
    pub fn new(table_name: String, dynamodb_client: D) -> Self {
        Self {
            table_name,
            dynamodb_client,
        }
    }

    fn primary_key(id: String) -> Result<HashMap<String, AttributeValue>, Error> {
        serde_dynamo::to_item(TriggeredProjectsPrimaryKeyDynamoDbResource { id })
    }

    fn create_get_item_input(&self, key: String) -> Result<GetItemInput, Error> {
        Ok(GetItemInput {
            key: Self::primary_key(key)?,
            table_name: self.table_name.clone(),
            consistent_read: Some(true),
            ..Default::default()
        })
    }

    fn create_claim_update_input(
        &self,
        key: String,
        project_name: String,
    ) -> Result<UpdateItemInput, Error> {
        let update_expression =
            "SET projects = list_append(if_not_exists(projects, :empty_list), :project_list)"
                .to_owned();

        // The item is created on the first claim of the day.
        let condition_expression =
            "attribute_not_exists(id) OR NOT contains(projects, :project)".to_owned();

        let expression_attribute_values = serde_dynamo::to_item(ClaimProjectDynamoDbResource {
            project: project_name.clone(),
            project_list: vec![project_name],
            empty_list: vec![],
        })?;

        Ok(UpdateItemInput {
            key: Self::primary_key(key)?,
            table_name: self.table_name.clone(),
            update_expression: Some(update_expression),
            condition_expression: Some(condition_expression),
            expression_attribute_values: Some(expression_attribute_values),
            ..Default::default()
        })
    }

    fn create_scan_input(
        &self,
        exclusive_start_key: Option<HashMap<String, AttributeValue>>,
    ) -> ScanInput {
        ScanInput {
            table_name: self.table_name.clone(),
            projection_expression: Some("id".to_owned()),
            exclusive_start_key,
            ..Default::default()
        }
    }

    fn create_delete_item_input(&self, key: HashMap<String, AttributeValue>) -> DeleteItemInput {
        DeleteItemInput {
            key,
            table_name: self.table_name.clone(),
            ..Default::default()
        }
    }
}

#[async_trait]
impl<D: DynamoDb + Sync + Send> TriggeredProjectsRepository for TriggeredProjectsRepositoryImpl<D> {
    async fn get_triggered_projects(
        &self,
        key: String,
    ) -> Result<TriggeredProjects, TriggeredProjectsRepositoryError> {
        let input = self.create_get_item_input(key.clone()).map_err(|e| {
            TriggeredProjectsRepositoryError::Unknown(
                anyhow!(e).context("Error building query for triggered projects"),
            )
        })?;

        let item = self
            .dynamodb_client
            .get_item(input)
            .await
            .map_err(|e| {
                TriggeredProjectsRepositoryError::Unknown(
                    anyhow!(e).context(format!("Error querying triggered projects for {key}")),
                )
            })?
            .item;

        match item {
            Some(item) => deserialize_from_dynamo(item),
            None => Ok(TriggeredProjects {
                id: key,
                projects: vec![],
            }),
        }
    }

    async fn claim_project(
        &self,
        key: String,
        project_name: String,
    ) -> Result<(), TriggeredProjectsRepositoryError> {
        let input = self
            .create_claim_update_input(key.clone(), project_name.clone())
            .map_err(|e| {
                TriggeredProjectsRepositoryError::Unknown(
                    anyhow!(e).context("Error building claim update input"),
                )
            })?;

        self.dynamodb_client
            .update_item(input)
            .await
            .map(|_| ())
            .map_err(|e| match e {
                RusotoError::Service(UpdateItemError::ConditionalCheckFailed(_)) => {
                    TriggeredProjectsRepositoryError::AlreadyClaimed(format!(
                        "{project_name} was already triggered under {key}"
                    ))
                }
                _ => TriggeredProjectsRepositoryError::Unknown(
                    anyhow!(e).context(format!("Failed to claim {project_name} under {key}")),
                ),
            })
    }

    async fn delete_all(&self) -> Result<usize, TriggeredProjectsRepositoryError> {
        let mut deleted = 0;
        let mut exclusive_start_key = None;

        loop {
            let page = self
                .dynamodb_client
                .scan(self.create_scan_input(exclusive_start_key))
                .await
                .map_err(|e| {
                    TriggeredProjectsRepositoryError::Unknown(
                        anyhow!(e).context("Error scanning triggered projects"),
                    )
                })?;

            for key in page.items.unwrap_or_default() {
                let id = key
                    .get("id")
                    .and_then(|value| value.s.clone())
                    .unwrap_or_default();

                self.dynamodb_client
                    .delete_item(self.create_delete_item_input(key))
                    .await
                    .map_err(|e| {
                        TriggeredProjectsRepositoryError::Unknown(
                            anyhow!(e).context(format!("Error deleting triggered projects {id}")),
                        )
                    })?;

                tracing::info!(id = ?id, "deleted triggered projects record {id}");
                deleted += 1;
            }

            match page.last_evaluated_key {
                Some(key) if !key.is_empty() => exclusive_start_key = Some(key),
                _ => break,
            }
        }

        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use common::test_tools::mocks::dynamodb_client::MockDbClient;
    use rstest::*;
    use rusoto_core::RusotoError;
    use rusoto_dynamodb::{
        AttributeValue, DeleteItemOutput, GetItemOutput, ScanOutput, UpdateItemError,
    };

    use super::TriggeredProjectsRepositoryImpl;
    use crate::triggered_projects::{
        TriggeredProjectsRepository, TriggeredProjectsRepositoryError,
    };

    const TABLE_NAME: &str = "trigger_codebuild_random";

    struct TestFixture {
        pub dynamodb_client: MockDbClient,
    }

    #[fixture]
    fn fixture() -> TestFixture {
        TestFixture {
            dynamodb_client: MockDbClient::new(),
        }
    }

    fn repository(dynamodb_client: MockDbClient) -> TriggeredProjectsRepositoryImpl<MockDbClient> {
        TriggeredProjectsRepositoryImpl::new(TABLE_NAME.to_owned(), dynamodb_client)
    }

    fn string_of(value: Option<&AttributeValue>) -> Option<String> {
        value.and_then(|v| v.s.clone())
    }

    fn id_item(id: &str) -> HashMap<String, AttributeValue> {
        HashMap::from([(
            "id".to_owned(),
            AttributeValue {
                s: Some(id.to_owned()),
                ..Default::default()
            },
        )])
    }

    #[rstest]
    fn claim_is_conditional_on_project_absence(fixture: TestFixture) {
        let input = repository(fixture.dynamodb_client)
            .create_claim_update_input("triggered_2024-05-01".to_owned(), "acme-prod".to_owned())
            .unwrap();

        assert_eq!(TABLE_NAME, input.table_name);
        assert_eq!(
            Some("triggered_2024-05-01".to_owned()),
            string_of(input.key.get("id"))
        );
        assert_eq!(
            Some("attribute_not_exists(id) OR NOT contains(projects, :project)"),
            input.condition_expression.as_deref()
        );

        let values = input.expression_attribute_values.unwrap();
        assert_eq!(Some("acme-prod".to_owned()), string_of(values.get(":project")));
        assert_eq!(
            Some(1),
            values
                .get(":project_list")
                .and_then(|v| v.l.as_ref())
                .map(Vec::len)
        );
        assert_eq!(
            Some(0),
            values
                .get(":empty_list")
                .and_then(|v| v.l.as_ref())
                .map(Vec::len)
        );
    }

    #[rstest]
    fn reads_are_consistent(fixture: TestFixture) {
        let input = repository(fixture.dynamodb_client)
            .create_get_item_input("triggered_2024-05-01".to_owned())
            .unwrap();

        assert_eq!(Some(true), input.consistent_read);
    }

    #[rstest]
    fn scan_only_projects_the_key(fixture: TestFixture) {
        let input = repository(fixture.dynamodb_client).create_scan_input(None);

        assert_eq!(Some("id"), input.projection_expression.as_deref());
        assert!(input.exclusive_start_key.is_none());
    }

    #[rstest]
    #[tokio::test]
    async fn missing_item_reads_as_empty_record(mut fixture: TestFixture) {
        fixture
            .dynamodb_client
            .expect_get_item()
            .once()
            .withf(|input| string_of(input.key.get("id")).as_deref() == Some("triggered_2024-05-01"))
            .returning(|_| Ok(GetItemOutput::default()));

        let record = repository(fixture.dynamodb_client)
            .get_triggered_projects("triggered_2024-05-01".to_owned())
            .await
            .unwrap();

        assert_eq!("triggered_2024-05-01", record.id);
        assert!(record.projects.is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn failed_condition_means_already_claimed(mut fixture: TestFixture) {
        fixture
            .dynamodb_client
            .expect_update_item()
            .once()
            .returning(|_| {
                Err(RusotoError::Service(UpdateItemError::ConditionalCheckFailed(
                    "The conditional request failed".to_owned(),
                )))
            });

        let error = repository(fixture.dynamodb_client)
            .claim_project("triggered_2024-05-01".to_owned(), "acme-prod".to_owned())
            .await
            .unwrap_err();

        assert!(matches!(
            error,
            TriggeredProjectsRepositoryError::AlreadyClaimed(_)
        ));
    }

    #[rstest]
    #[tokio::test]
    async fn other_update_failures_are_unknown(mut fixture: TestFixture) {
        fixture
            .dynamodb_client
            .expect_update_item()
            .once()
            .returning(|_| {
                Err(RusotoError::Service(
                    UpdateItemError::InternalServerError("timeout!".to_owned()),
                ))
            });

        let error = repository(fixture.dynamodb_client)
            .claim_project("triggered_2024-05-01".to_owned(), "acme-prod".to_owned())
            .await
            .unwrap_err();

        assert!(matches!(error, TriggeredProjectsRepositoryError::Unknown(_)));
    }

    #[rstest]
    #[tokio::test]
    async fn delete_all_follows_every_scan_page(mut fixture: TestFixture) {
        fixture
            .dynamodb_client
            .expect_scan()
            .once()
            .withf(|input| input.exclusive_start_key.is_none())
            .returning(|_| {
                Ok(ScanOutput {
                    items: Some(vec![
                        id_item("triggered_2024-05-01"),
                        id_item("triggered_2024-05-02"),
                    ]),
                    last_evaluated_key: Some(id_item("triggered_2024-05-02")),
                    ..Default::default()
                })
            });
        fixture
            .dynamodb_client
            .expect_scan()
            .once()
            .withf(|input| {
                input
                    .exclusive_start_key
                    .as_ref()
                    .and_then(|key| string_of(key.get("id")))
                    .as_deref()
                    == Some("triggered_2024-05-02")
            })
            .returning(|_| {
                Ok(ScanOutput {
                    items: Some(vec![id_item("triggered_2024-05-03")]),
                    last_evaluated_key: None,
                    ..Default::default()
                })
            });
        fixture
            .dynamodb_client
            .expect_delete_item()
            .times(3)
            .withf(|input| input.table_name == TABLE_NAME && input.key.contains_key("id"))
            .returning(|_| Ok(DeleteItemOutput::default()));

        let deleted = repository(fixture.dynamodb_client)
            .delete_all()
            .await
            .unwrap();

        assert_eq!(3, deleted);
    }
}
