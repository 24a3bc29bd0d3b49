use common::deserializers::json_from_string::deserialize_json_string;
use serde::Deserialize;

/// CodeBuild state change event as delivered by EventBridge.
#[derive(Deserialize, Debug)]
pub struct BuildStateChangeEvent {
    pub detail: BuildStateChangeDetail,
}

#[derive(Deserialize, Debug)]
pub struct BuildStateChangeDetail {
    #[serde(rename = "build-id")]
    pub build_id: String,
}

#[derive(Deserialize, Debug)]
pub struct SnsRecord {
    #[serde(rename = "Sns")]
    pub sns: SnsMessage,
}

#[derive(Deserialize, Debug)]
pub struct SnsMessage {
    #[serde(rename = "Message", deserialize_with = "deserialize_json_string")]
    pub message: BuildStateChangeEvent,
}

/// The state change event, either as is or wrapped in an SNS notification.
#[derive(Deserialize, Debug)]
#[serde(untagged)]
pub enum BuildEventEnvelope {
    Sns {
        #[serde(rename = "Records")]
        records: Vec<SnsRecord>,
    },
    Direct(BuildStateChangeEvent),
}

impl BuildEventEnvelope {
    pub fn build_id(&self) -> Option<&str> {
        match self {
            BuildEventEnvelope::Sns { records } => records
                .first()
                .map(|record| record.sns.message.detail.build_id.as_str()),
            BuildEventEnvelope::Direct(event) => Some(event.detail.build_id.as_str()),
        }
    }
}
