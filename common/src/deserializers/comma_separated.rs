use serde::de::Visitor;
use serde::{de, Deserializer};
use std::fmt;

struct CommaSeparatedVisitor;

impl<'de> Visitor<'de> for CommaSeparatedVisitor {
    type Value = Vec<String>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a comma separated list of values")
    }

    fn visit_str<E>(self, s: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(s.split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_owned)
            .collect())
    }
}

/// Reads values such as `PROJECTS=a, b,,c` as `["a", "b", "c"]`.
pub fn comma_separated<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_str(CommaSeparatedVisitor)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde::Deserialize;
    use serde_json::json;

    use super::comma_separated;

    #[derive(Deserialize)]
    struct Subject {
        #[serde(deserialize_with = "comma_separated")]
        projects: Vec<String>,
    }

    #[rstest]
    #[case::empty("", vec![])]
    #[case::single("acme-prod", vec!["acme-prod"])]
    #[case::spaces_and_blanks(" acme-prod, ,acme-dev,", vec!["acme-prod", "acme-dev"])]
    fn splits_values(#[case] raw: &str, #[case] expected: Vec<&str>) {
        let subject: Subject = serde_json::from_value(json!({ "projects": raw })).unwrap();
        assert_eq!(expected, subject.projects);
    }
}
