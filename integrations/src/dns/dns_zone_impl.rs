use anyhow::anyhow;
use async_trait::async_trait;
use rusoto_route53::{
    Change, ChangeBatch, ChangeResourceRecordSetsRequest, ListHostedZonesByNameRequest,
    ListResourceRecordSetsRequest, ResourceRecordSet, Route53,
};

use super::{DnsError, DnsZone};

const A_RECORD: &str = "A";
const DELETE_ACTION: &str = "DELETE";
const HOSTED_ZONE_PREFIX: &str = "/hostedzone/";

pub struct DnsZoneImpl<R: Route53 + Sync + Send> {
    route53_client: R,
}

impl<R: Route53 + Sync + Send> DnsZoneImpl<R> {
    pub fn new(route53_client: R) -> Self {
        Self { route53_client }
    }
}

/// Route 53 returns fully qualified names with a trailing dot.
fn normalize_record_name(name: &str) -> String {
    name.trim_end_matches('.').to_lowercase()
}

fn find_a_record(record_sets: Vec<ResourceRecordSet>, record_name: &str) -> Option<ResourceRecordSet> {
    let wanted = normalize_record_name(record_name);
    record_sets
        .into_iter()
        .find(|set| set.type_ == A_RECORD && normalize_record_name(&set.name) == wanted)
}

fn bare_zone_id(zone_id: &str) -> &str {
    zone_id.strip_prefix(HOSTED_ZONE_PREFIX).unwrap_or(zone_id)
}

#[async_trait]
impl<R: Route53 + Sync + Send> DnsZone for DnsZoneImpl<R> {
    async fn first_hosted_zone(&self) -> Result<Option<String>, DnsError> {
        let zones = self
            .route53_client
            .list_hosted_zones_by_name(ListHostedZonesByNameRequest::default())
            .await
            .map_err(|e| DnsError::Unknown(anyhow!(e).context("Error listing hosted zones")))?
            .hosted_zones;

        Ok(zones
            .into_iter()
            .next()
            .map(|zone| bare_zone_id(&zone.id).to_owned()))
    }

    async fn delete_a_record(
        &self,
        zone_id: String,
        record_name: String,
    ) -> Result<bool, DnsError> {
        let zone_id = bare_zone_id(&zone_id).to_owned();

        let request = ListResourceRecordSetsRequest {
            hosted_zone_id: zone_id.clone(),
            start_record_name: Some(record_name.clone()),
            start_record_type: Some(A_RECORD.to_owned()),
            ..Default::default()
        };

        let record_sets = self
            .route53_client
            .list_resource_record_sets(request)
            .await
            .map_err(|e| {
                DnsError::Unknown(
                    anyhow!(e).context(format!("Error listing record sets from {record_name}")),
                )
            })?
            .resource_record_sets;

        let Some(record) = find_a_record(record_sets, &record_name) else {
            return Ok(false);
        };

        let request = ChangeResourceRecordSetsRequest {
            hosted_zone_id: zone_id,
            change_batch: ChangeBatch {
                changes: vec![Change {
                    action: DELETE_ACTION.to_owned(),
                    resource_record_set: record,
                }],
                comment: None,
            },
        };

        self.route53_client
            .change_resource_record_sets(request)
            .await
            .map_err(|e| {
                DnsError::Unknown(anyhow!(e).context(format!("Error deleting {record_name}")))
            })?;

        tracing::info!(record_name = ?record_name, "deleted A record {record_name}");
        Ok(true)
    }
}
