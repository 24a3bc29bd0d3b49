//! Chat cards posted to the Teams incoming webhook.

use integrations::chat::ChatNotifier;
use serde_json::{json, Value};

pub mod approval_card;
pub mod build_status_card;
pub mod outcome_card;

pub use approval_card::ApprovalCard;
pub use build_status_card::BuildStatusCard;
pub use outcome_card::outcome_card;

const ADAPTIVE_CARD_CONTENT_TYPE: &str = "application/vnd.microsoft.card.adaptive";
const ADAPTIVE_CARD_SCHEMA: &str = "http://adaptivecards.io/schemas/adaptive-card.json";
const ADAPTIVE_CARD_VERSION: &str = "1.2";

/// Posts `card`, logging instead of failing when the webhook does not accept it.
/// Returns whether the card was delivered.
pub async fn deliver(notifier: &dyn ChatNotifier, card: Value) -> bool {
    match notifier.post(card).await {
        Ok(()) => true,
        Err(e) => {
            tracing::error!(error = ?e, "Failed to send message to Teams: {e}");
            false
        }
    }
}

/// Wraps an adaptive card body in the message envelope the webhook expects.
fn adaptive_card_message(body: Vec<Value>, actions: Option<Vec<Value>>, entities: Vec<Value>) -> Value {
    let mut content = json!({
        "type": "AdaptiveCard",
        "$schema": ADAPTIVE_CARD_SCHEMA,
        "version": ADAPTIVE_CARD_VERSION,
        "body": body,
        "msteams": {
            "width": "Full",
            "entities": entities,
        }
    });

    if let Some(actions) = actions {
        content["actions"] = Value::Array(actions);
    }

    json!({
        "type": "message",
        "attachments": [
            {
                "contentType": ADAPTIVE_CARD_CONTENT_TYPE,
                "content": content,
            }
        ]
    })
}

/// One label, one colon and one value per row, laid out as three columns.
fn detail_columns(rows: &[(&str, Value)]) -> Value {
    let spacing = |index: usize| if index == 0 { "Default" } else { "Small" };

    let labels: Vec<Value> = rows
        .iter()
        .enumerate()
        .map(|(i, (label, _))| {
            json!({ "type": "TextBlock", "text": label, "weight": "Bolder", "spacing": spacing(i) })
        })
        .collect();
    let separators: Vec<Value> = rows
        .iter()
        .enumerate()
        .map(|(i, _)| json!({ "type": "TextBlock", "text": ":", "weight": "Bolder", "spacing": spacing(i) }))
        .collect();
    let values: Vec<Value> = rows
        .iter()
        .map(|(_, value)| json!({ "type": "TextBlock", "text": value, "spacing": "Small" }))
        .collect();

    json!({
        "type": "ColumnSet",
        "columns": [
            { "type": "Column", "width": "auto", "items": labels },
            { "type": "Column", "width": "auto", "items": separators },
            { "type": "Column", "width": "stretch", "items": values },
        ]
    })
}
