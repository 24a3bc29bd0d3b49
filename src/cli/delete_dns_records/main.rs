//! Removes the database and reporting A records of a client.
//!
//! ```bash
//! # every record of the prod instance of acme
//! delete-dns-records acme prod
//!
//! # only db.acme.{DNS_DOMAIN}
//! delete-dns-records acme
//! ```

use clap::error::ErrorKind;
use clap::Parser;
use common::aws_clients::route53::get_route53_client;
use common::config::ConfigLoader;
use deploy_notifications::lambda_structure::logging::init_cli_logging;
use integrations::dns::dns_zone_impl::DnsZoneImpl;
use integrations::dns::DnsZone;

use crate::config::Config;

mod config;

const USAGE: &str = "Usage: delete-dns-records <client_name> [instance_type]";

const INSTANCE_RECORD_SUFFIXES: [&str; 7] = [
    "primary-db",
    "ro-db",
    "db",
    "research",
    "research-us-east-1",
    "reporting",
    "reporting-us-east-1",
];

#[derive(Parser, Debug)]
#[command(name = "delete-dns-records", about = "Delete the A records of a client")]
struct Cli {
    client_name: String,
    instance_type: Option<String>,
}

#[tokio::main]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(_) => {
            eprintln!("{USAGE}");
            std::process::exit(1);
        }
    };

    if let Err(e) = run(cli).await {
        eprintln!("Command failed: {e:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = ConfigLoader::load_default::<Config>()?;
    init_cli_logging(config.verbose_mode);

    let dns_zone = DnsZoneImpl::new(get_route53_client()?);
    let records = record_names(&cli.client_name, cli.instance_type.as_deref(), &config.dns_domain);

    delete_records(&dns_zone, records, |line| println!("{line}")).await
}

/// Fully qualified names of the records that belong to a client, or to one
/// of its instances. An empty instance type selects the client record.
fn record_names(client_name: &str, instance_type: Option<&str>, dns_domain: &str) -> Vec<String> {
    match instance_type.filter(|instance_type| !instance_type.is_empty()) {
        Some(instance_type) => INSTANCE_RECORD_SUFFIXES
            .iter()
            .map(|suffix| format!("{instance_type}-{suffix}.{client_name}.{dns_domain}"))
            .collect(),
        None => vec![format!("db.{client_name}.{dns_domain}")],
    }
}

/// Deletes `records` in order, handing each outcome to `report` as soon as
/// it is known.
async fn delete_records(
    dns_zone: &dyn DnsZone,
    records: Vec<String>,
    mut report: impl FnMut(String),
) -> anyhow::Result<()> {
    let zone_id = dns_zone
        .first_hosted_zone()
        .await?
        .ok_or_else(|| anyhow::anyhow!("no hosted zone found"))?;
    tracing::info!(zone_id = ?zone_id, "Using hosted zone");

    for record in records {
        let line = if dns_zone.delete_a_record(zone_id.clone(), record.clone()).await? {
            format!("The DNS Record with the name '{record}' has been successfully removed")
        } else {
            format!("The DNS Record with the name '{record}' does not exists")
        };
        report(line);
    }

    Ok(())
}
