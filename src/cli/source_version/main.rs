//! Points the deploy projects of one client instance at a new source version.
//!
//! ```bash
//! source-version acme prod release/2024.05
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};
use clap::Parser;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;

const USAGE: &str = "Usage: source-version <client_name> <instance_type> <new_source_version>";

#[derive(Parser, Debug)]
#[command(name = "source-version", about = "Update the source version of deploy projects")]
struct Cli {
    client_name: String,
    instance_type: String,
    new_source_version: String,

    /// Project list to update in place.
    #[arg(long, default_value = "projects.json")]
    file: PathBuf,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if e.kind() == clap::error::ErrorKind::DisplayHelp => e.exit(),
        Err(_) => {
            eprintln!("{USAGE}");
            std::process::exit(1);
        }
    };

    match update_file(
        &cli.file,
        &cli.client_name,
        &cli.instance_type,
        &cli.new_source_version,
    ) {
        Ok(()) => println!("Updated {} successfully.", cli.file.display()),
        Err(e) => {
            eprintln!("An error occurred: {e:#}");
            std::process::exit(1);
        }
    }
}

fn update_file(
    path: &Path,
    client_name: &str,
    instance_type: &str,
    new_version: &str,
) -> anyhow::Result<()> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("unable to read {}", path.display()))?;
    let mut projects: Value = serde_json::from_str(&contents)
        .with_context(|| format!("{} is not valid JSON", path.display()))?;

    update_source_version(&mut projects, client_name, instance_type, new_version)?;

    fs::write(path, to_indented_json(&projects)?)
        .with_context(|| format!("unable to write {}", path.display()))
}

/// Sets `source_version` on every project of the client instance and returns
/// how many projects matched.
fn update_source_version(
    projects: &mut Value,
    client_name: &str,
    instance_type: &str,
    new_version: &str,
) -> anyhow::Result<usize> {
    let projects = projects
        .as_array_mut()
        .ok_or_else(|| anyhow!("expected a list of projects"))?;

    let mut updated = 0;
    for project in projects.iter_mut() {
        if project["client_name"] == client_name && project["instance_type"] == instance_type {
            if let Some(project) = project.as_object_mut() {
                project.insert(
                    "source_version".to_owned(),
                    Value::String(new_version.to_owned()),
                );
                updated += 1;
            }
        }
    }

    Ok(updated)
}

fn to_indented_json(value: &Value) -> anyhow::Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(b"    "));
    value.serialize(&mut serializer)?;

    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use clap::Parser;
    use serde_json::{json, Value};

    use super::{update_file, update_source_version, Cli};

    fn projects() -> Value {
        json!([
            { "client_name": "acme", "instance_type": "prod", "source_version": "main" },
            { "client_name": "acme", "instance_type": "dev", "source_version": "main" },
            { "client_name": "globex", "instance_type": "prod", "source_version": "main" }
        ])
    }

    #[test]
    fn updates_matching_projects_only() {
        let mut projects = projects();

        let updated = update_source_version(&mut projects, "acme", "prod", "release/1").unwrap();

        assert_eq!(1, updated);
        assert_eq!("release/1", projects[0]["source_version"]);
        assert_eq!("main", projects[1]["source_version"]);
        assert_eq!("main", projects[2]["source_version"]);
    }

    #[test]
    fn rejects_documents_that_are_not_lists() {
        let mut document = json!({ "client_name": "acme" });

        assert!(update_source_version(&mut document, "acme", "prod", "v2").is_err());
    }

    #[test]
    fn requires_three_arguments() {
        assert!(Cli::try_parse_from(["source-version", "acme", "prod"]).is_err());
        assert!(Cli::try_parse_from(["source-version", "acme", "prod", "v2"]).is_ok());
    }

    #[test]
    fn rewrites_file_with_four_space_indent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("projects.json");
        fs::write(&path, projects().to_string()).unwrap();

        update_file(&path, "globex", "prod", "v2").unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("[\n    {\n        \"client_name\": \"acme\""));
        let written: Value = serde_json::from_str(&contents).unwrap();
        assert_eq!("v2", written[2]["source_version"]);
    }

    #[test]
    fn reports_missing_files() {
        let dir = tempfile::tempdir().unwrap();

        assert!(update_file(&dir.path().join("missing.json"), "acme", "prod", "v2").is_err());
    }
}
