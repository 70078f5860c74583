use std::error::Error;

use secrecy::ExposeSecret;

use lakemeta_catalog::location::build_location;
use lakemeta_catalog::ops::{self, PartitionConfig, PartitionResult};
use lakemeta_catalog::spec::PartitionSpec;

use crate::commands::common::CatalogConfig;

#[derive(Debug, clap::Parser)]
pub(crate) struct Config {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Debug, clap::Parser)]
enum Command {
    /// Register a partition in the catalog
    Add(AddConfig),

    /// Remove a partition from the catalog
    Delete(DeleteConfig),

    /// Check whether a partition is registered
    Exists(ExistsConfig),
}

#[derive(Debug, clap::Parser)]
struct AddConfig {
    #[clap(flatten)]
    catalog_config: CatalogConfig,

    /// The name of the table the partition belongs to
    #[clap(short = 't', long = "table")]
    table: String,

    /// The partition spec, e.g. 'date=2025-11-24;region=eu-west-1'
    #[clap(short = 's', long = "spec")]
    spec: PartitionSpec,

    /// Explicit partition location URI
    #[clap(long = "location")]
    location: Option<String>,

    /// Storage bucket to derive the partition location from
    #[clap(long = "bucket", conflicts_with = "location")]
    bucket: Option<String>,

    /// Path prefix under the bucket; defaults to the spec's key=value path
    #[clap(long = "prefix", requires = "bucket")]
    prefix: Option<String>,

    /// Treat an already-registered partition as success
    #[clap(
        long = "if-not-exists",
        default_value_t = true,
        action = clap::ArgAction::Set
    )]
    if_not_exists: bool,

    /// Storage descriptor JSON overriding inheritance from the table
    #[clap(long = "descriptor")]
    descriptor: Option<String>,
}

#[derive(Debug, clap::Parser)]
struct DeleteConfig {
    #[clap(flatten)]
    catalog_config: CatalogConfig,

    /// The name of the table the partition belongs to
    #[clap(short = 't', long = "table")]
    table: String,

    /// The partition spec, e.g. 'date=2025-11-24;region=eu-west-1'
    #[clap(short = 's', long = "spec")]
    spec: PartitionSpec,
}

#[derive(Debug, clap::Parser)]
struct ExistsConfig {
    #[clap(flatten)]
    catalog_config: CatalogConfig,

    /// The name of the table the partition belongs to
    #[clap(short = 't', long = "table")]
    table: String,

    /// The partition spec, e.g. 'date=2025-11-24;region=eu-west-1'
    #[clap(short = 's', long = "spec")]
    spec: PartitionSpec,
}

pub(crate) async fn command(config: Config) -> Result<(), Box<dyn Error>> {
    match config.command {
        Command::Add(config) => {
            let client = client(&config.catalog_config)?;
            let location = resolve_location(&config);

            let mut partition_config = PartitionConfig::new(
                config.catalog_config.database,
                config.table,
                config.spec.values,
            )
            .if_not_exists(config.if_not_exists);
            if let Some(location) = location {
                partition_config = partition_config.with_location(location);
            }
            if let Some(catalog_id) = config.catalog_config.catalog_id {
                partition_config = partition_config.with_catalog_id(catalog_id);
            }
            if let Some(payload) = config.descriptor {
                partition_config = partition_config.with_custom_descriptor(payload);
            }

            finish(ops::add(&client, &partition_config).await)
        }
        Command::Delete(config) => {
            let client = client(&config.catalog_config)?;
            let partition_config = partition_config(config.catalog_config, config.table, config.spec);
            finish(ops::delete(&client, &partition_config).await)
        }
        Command::Exists(config) => {
            let client = client(&config.catalog_config)?;
            let partition_config = partition_config(config.catalog_config, config.table, config.spec);
            finish(ops::exists(&client, &partition_config).await)
        }
    }
}

/// Explicit `--location` wins; otherwise the location is derived from
/// `--bucket` and `--prefix`, the prefix defaulting to the spec's
/// conventional `key=value` path.
fn resolve_location(config: &AddConfig) -> Option<String> {
    if let Some(location) = &config.location {
        return Some(location.clone());
    }
    let bucket = config.bucket.as_deref()?;
    let prefix = match &config.prefix {
        Some(prefix) => prefix.clone(),
        None => config.spec.hive_path(),
    };
    Some(build_location(bucket, &prefix))
}

fn client(config: &CatalogConfig) -> Result<lakemeta_client::Client, Box<dyn Error>> {
    let mut client = lakemeta_client::Client::new(config.host_url.clone())?;
    if let Some(token) = &config.auth_token {
        client = client.with_auth_token(token.expose_secret());
    }
    Ok(client)
}

fn partition_config(
    catalog_config: CatalogConfig,
    table: String,
    spec: PartitionSpec,
) -> PartitionConfig {
    let mut config = PartitionConfig::new(catalog_config.database, table, spec.values);
    if let Some(catalog_id) = catalog_config.catalog_id {
        config = config.with_catalog_id(catalog_id);
    }
    config
}

/// Emit the result record on stdout; a failed record fails the run.
fn finish(result: PartitionResult) -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(&result)?);
    if result.success {
        Ok(())
    } else {
        Err(result
            .error_message
            .unwrap_or_else(|| "operation failed".to_owned())
            .into())
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    fn parse_add(args: &[&str]) -> AddConfig {
        let config = Config::try_parse_from(args).unwrap();
        match config.command {
            Command::Add(config) => config,
            other => panic!("expected add command, got {other:?}"),
        }
    }

    #[test]
    fn add_parses_with_defaults() {
        let config = parse_add(&[
            "partition", "add", "-d", "sales", "-t", "events", "--spec", "date=2025-11-24",
            "--bucket", "data-lake",
        ]);
        assert!(config.if_not_exists);
        assert_eq!(config.spec.keys, vec!["date"]);
        assert_eq!(config.catalog_config.database, "sales");
        assert_eq!(
            config.catalog_config.host_url.as_str(),
            "http://127.0.0.1:8181/"
        );
    }

    #[test]
    fn add_accepts_if_not_exists_false() {
        let config = parse_add(&[
            "partition", "add", "-d", "sales", "-t", "events", "--spec", "date=2025-11-24",
            "--location", "s3://data-lake/p/", "--if-not-exists", "false",
        ]);
        assert!(!config.if_not_exists);
    }

    #[test]
    fn add_rejects_bucket_combined_with_location() {
        let result = Config::try_parse_from([
            "partition", "add", "-d", "sales", "-t", "events", "--spec", "date=2025-11-24",
            "--location", "s3://data-lake/p/", "--bucket", "data-lake",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn add_rejects_prefix_without_bucket() {
        let result = Config::try_parse_from([
            "partition", "add", "-d", "sales", "-t", "events", "--spec", "date=2025-11-24",
            "--prefix", "raw/events",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn location_derives_from_spec_when_prefix_missing() {
        let config = parse_add(&[
            "partition", "add", "-d", "sales", "-t", "events", "--spec", "date=2025-11-24",
            "--bucket", "data-lake",
        ]);
        assert_eq!(
            resolve_location(&config).as_deref(),
            Some("s3://data-lake/date=2025-11-24/")
        );
    }

    #[test]
    fn location_uses_explicit_prefix() {
        let config = parse_add(&[
            "partition", "add", "-d", "sales", "-t", "events", "--spec", "date=2025-11-24",
            "--bucket", "data-lake", "--prefix", "/raw/events/date=2025-11-24/",
        ]);
        assert_eq!(
            resolve_location(&config).as_deref(),
            Some("s3://data-lake/raw/events/date=2025-11-24/")
        );
    }

    #[test]
    fn explicit_location_wins() {
        let config = parse_add(&[
            "partition", "add", "-d", "sales", "-t", "events", "--spec", "date=2025-11-24",
            "--location", "s3://elsewhere/p",
        ]);
        assert_eq!(resolve_location(&config).as_deref(), Some("s3://elsewhere/p"));
    }

    #[test]
    fn delete_and_exists_parse() {
        for verb in ["delete", "exists"] {
            let result = Config::try_parse_from([
                "partition", verb, "-d", "sales", "-t", "events", "--spec", "date=2025-11-24",
            ]);
            assert!(result.is_ok(), "{verb} should parse");
        }
    }
}
