use serde_json::{json, Value};

/// Plain message card reporting what happened to an approval request.
pub fn outcome_card(message: &str) -> Value {
    json!({
        "@type": "MessageCard",
        "@context": "http://schema.org/extensions",
        "summary": "Build Notification",
        "title": "Build Approval Status",
        "text": message,
    })
}
