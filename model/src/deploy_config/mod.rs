use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};

use serde::Serialize;
use serde_json::Value;

/// Value reported for a tracked field that is not present in the source document.
pub const NOT_AVAILABLE: &str = "N/A";

/// Leaf fields of a deployment configuration document that show up in notifications.
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TrackedField {
    EtlAutomationEnabled,
    EtlV2ApplicationEnabled,
    VersionCategory,
    ApplicationVersionOverride,
}

/// Where every tracked field lives inside a configuration document.
static TRACKED_PATHS: [(TrackedField, &[&str]); 4] = [
    (
        TrackedField::EtlAutomationEnabled,
        &["etl", "etl_automation_enabled"],
    ),
    (
        TrackedField::EtlV2ApplicationEnabled,
        &["etl", "etl_v2_application_enabled"],
    ),
    (
        TrackedField::VersionCategory,
        &["shared", "version_category"],
    ),
    (
        TrackedField::ApplicationVersionOverride,
        &["shared", "application_version_override"],
    ),
];

impl TrackedField {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrackedField::EtlAutomationEnabled => "etl_automation_enabled",
            TrackedField::EtlV2ApplicationEnabled => "etl_v2_application_enabled",
            TrackedField::VersionCategory => "version_category",
            TrackedField::ApplicationVersionOverride => "application_version_override",
        }
    }

    pub fn all() -> impl Iterator<Item = TrackedField> {
        TRACKED_PATHS.iter().map(|(field, _)| *field)
    }
}

impl Display for TrackedField {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Flat view of the tracked fields of one or more configuration documents.
///
/// Every tracked field always has a value: either the scalar found in the
/// document, rendered as a string, or [`NOT_AVAILABLE`].
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(transparent)]
pub struct ResolvedConfigValues(BTreeMap<TrackedField, String>);

impl Default for ResolvedConfigValues {
    fn default() -> Self {
        Self(
            TrackedField::all()
                .map(|field| (field, NOT_AVAILABLE.to_owned()))
                .collect(),
        )
    }
}

impl ResolvedConfigValues {
    /// Resolves the tracked fields of a structured document, falling back to
    /// [`NOT_AVAILABLE`] for everything the document does not carry.
    pub fn resolve(document: &Value) -> Self {
        Self::resolve_with_defaults(document, &Self::default())
    }

    /// Resolves the tracked fields of a structured document. Fields the
    /// document does not carry keep the value they have in `defaults`.
    pub fn resolve_with_defaults(document: &Value, defaults: &ResolvedConfigValues) -> Self {
        let mut resolved = defaults.clone();

        for (field, path) in TRACKED_PATHS.iter() {
            if let Some(value) = leaf_at(document, path) {
                resolved.0.insert(*field, value);
            }
        }

        resolved
    }

    /// Resolves a textually encoded document. Missing, empty or unparsable
    /// text resolves every field to [`NOT_AVAILABLE`].
    pub fn resolve_text(document: Option<&str>) -> Self {
        let document = document
            .filter(|text| !text.trim().is_empty())
            .and_then(|text| serde_json::from_str::<Value>(text).ok())
            .unwrap_or(Value::Null);

        Self::resolve(&document)
    }

    /// Overlays `self` (the updated document) on `fallback` (the original one).
    /// A field keeps its own value unless it is [`NOT_AVAILABLE`].
    pub fn merged_over(mut self, fallback: &ResolvedConfigValues) -> Self {
        for (field, value) in self.0.iter_mut() {
            if value == NOT_AVAILABLE {
                if let Some(original) = fallback.0.get(field) {
                    value.clone_from(original);
                }
            }
        }

        self
    }

    pub fn get(&self, field: TrackedField) -> &str {
        self.0
            .get(&field)
            .map(String::as_str)
            .unwrap_or(NOT_AVAILABLE)
    }

    pub fn with_value(mut self, field: TrackedField, value: impl Into<String>) -> Self {
        self.0.insert(field, value.into());
        self
    }
}

fn leaf_at(document: &Value, path: &[&str]) -> Option<String> {
    let mut current = document;
    for segment in path {
        current = current.as_object()?.get(*segment)?;
    }

    match current {
        Value::Object(_) | Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::{json, Value};

    use super::{ResolvedConfigValues, TrackedField, NOT_AVAILABLE};

    fn full_document() -> Value {
        json!({
            "etl": {
                "etl_automation_enabled": true,
                "etl_v2_application_enabled": false
            },
            "shared": {
                "version_category": "stable",
                "application_version_override": "2024.3.1",
                "db_snapshot_source_instance": "prod"
            }
        })
    }

    fn assert_all_sentinel(values: &ResolvedConfigValues) {
        for field in TrackedField::all() {
            assert_eq!(NOT_AVAILABLE, values.get(field), "field {field}");
        }
    }

    #[test]
    fn resolves_all_tracked_fields() {
        let values = ResolvedConfigValues::resolve(&full_document());

        assert_eq!("true", values.get(TrackedField::EtlAutomationEnabled));
        assert_eq!("false", values.get(TrackedField::EtlV2ApplicationEnabled));
        assert_eq!("stable", values.get(TrackedField::VersionCategory));
        assert_eq!(
            "2024.3.1",
            values.get(TrackedField::ApplicationVersionOverride)
        );
    }

    #[rstest]
    #[case::none(None)]
    #[case::empty(Some(""))]
    #[case::blank(Some("   "))]
    #[case::malformed(Some("{\"etl\": "))]
    #[case::not_a_mapping(Some("[1, 2, 3]"))]
    #[case::scalar(Some("42"))]
    fn malformed_or_empty_text_resolves_to_sentinel(#[case] text: Option<&str>) {
        assert_all_sentinel(&ResolvedConfigValues::resolve_text(text));
    }

    #[test]
    fn resolves_text_documents() {
        let text = full_document().to_string();
        let values = ResolvedConfigValues::resolve_text(Some(&text));

        assert_eq!(ResolvedConfigValues::resolve(&full_document()), values);
    }

    #[rstest]
    #[case::missing_category(json!({ "shared": { "version_category": "beta" } }))]
    #[case::category_is_scalar(json!({ "etl": "yes" }))]
    #[case::category_is_list(json!({ "etl": ["etl_automation_enabled"] }))]
    #[case::leaf_is_mapping(json!({ "etl": { "etl_automation_enabled": { "value": true } } }))]
    #[case::leaf_is_null(json!({ "etl": { "etl_automation_enabled": null } }))]
    fn unreachable_leaf_resolves_to_sentinel(#[case] document: Value) {
        let values = ResolvedConfigValues::resolve(&document);
        assert_eq!(NOT_AVAILABLE, values.get(TrackedField::EtlAutomationEnabled));
    }

    #[test]
    fn never_returns_nested_structures() {
        let document = json!({
            "etl": { "etl_automation_enabled": { "a": 1 }, "etl_v2_application_enabled": [1, 2] },
            "shared": { "version_category": 3, "application_version_override": {} }
        });

        let values = ResolvedConfigValues::resolve(&document);

        assert_eq!(NOT_AVAILABLE, values.get(TrackedField::EtlAutomationEnabled));
        assert_eq!("[1,2]", values.get(TrackedField::EtlV2ApplicationEnabled));
        assert_eq!("3", values.get(TrackedField::VersionCategory));
        assert_eq!(
            NOT_AVAILABLE,
            values.get(TrackedField::ApplicationVersionOverride)
        );
    }

    #[test]
    fn uses_supplied_defaults_for_missing_fields() {
        let defaults = ResolvedConfigValues::default()
            .with_value(TrackedField::ApplicationVersionOverride, "false");

        let values = ResolvedConfigValues::resolve_with_defaults(
            &json!({ "shared": { "version_category": "stable" } }),
            &defaults,
        );

        assert_eq!("stable", values.get(TrackedField::VersionCategory));
        assert_eq!(
            "false",
            values.get(TrackedField::ApplicationVersionOverride)
        );
        assert_eq!(NOT_AVAILABLE, values.get(TrackedField::EtlAutomationEnabled));
    }

    #[test]
    fn merge_falls_back_to_original_for_sentinel_fields() {
        let updated = ResolvedConfigValues::resolve(&json!({
            "shared": { "version_category": "beta" }
        }));
        let original = ResolvedConfigValues::resolve(&full_document());

        let merged = updated.merged_over(&original);

        assert_eq!("beta", merged.get(TrackedField::VersionCategory));
        assert_eq!("true", merged.get(TrackedField::EtlAutomationEnabled));
        assert_eq!("false", merged.get(TrackedField::EtlV2ApplicationEnabled));
        assert_eq!(
            "2024.3.1",
            merged.get(TrackedField::ApplicationVersionOverride)
        );
    }

    #[test]
    fn merge_keeps_sentinel_when_missing_on_both() {
        let merged = ResolvedConfigValues::resolve_text(None)
            .merged_over(&ResolvedConfigValues::resolve_text(Some("not json")));

        assert_all_sentinel(&merged);
    }

    #[test]
    fn serializes_as_flat_mapping() {
        let values = ResolvedConfigValues::resolve(&full_document());

        assert_eq!(
            json!({
                "etl_automation_enabled": "true",
                "etl_v2_application_enabled": "false",
                "version_category": "stable",
                "application_version_override": "2024.3.1"
            }),
            serde_json::to_value(values).unwrap()
        );
    }
}
