//! Storage descriptor resolution for new partitions.
//!
//! A descriptor arrives from one of three places, tried in order: an
//! explicit JSON payload supplied by the caller, the owning table's own
//! descriptor, or a synthesized plain-text default. Whatever the source,
//! the partition's location is always written over the descriptor's
//! `location` field, and the table's descriptor is never mutated; an
//! inherited descriptor is a private copy.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::interface::CatalogClient;
use crate::ops::PartitionConfig;

/// Hive plain-text input format, used when no descriptor can be inherited.
pub const DEFAULT_INPUT_FORMAT: &str = "org.apache.hadoop.mapred.TextInputFormat";
/// Hive plain-text output format counterpart.
pub const DEFAULT_OUTPUT_FORMAT: &str =
    "org.apache.hadoop.hive.ql.io.HiveIgnoreKeyTextOutputFormat";
/// Line-delimited serde used by the synthesized default descriptor.
pub const DEFAULT_SERIALIZATION_LIBRARY: &str =
    "org.apache.hadoop.hive.serde2.lazy.LazySimpleSerDe";

/// A single column in a storage descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDef {
    pub name: String,
    pub r#type: String,
}

/// Schema and physical-format metadata attached to a table or partition.
///
/// The same shape is used for inherited, custom, and synthesized
/// descriptors, so one representation flows through regardless of source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageDescriptor {
    #[serde(default)]
    pub columns: Vec<ColumnDef>,
    pub input_format: String,
    pub output_format: String,
    pub serialization_library: String,
    #[serde(default)]
    pub location: String,
}

impl StorageDescriptor {
    /// The minimal plain-text descriptor synthesized when neither a custom
    /// payload nor a table descriptor is available.
    pub fn plain_text(location: impl Into<String>) -> Self {
        Self {
            columns: vec![],
            input_format: DEFAULT_INPUT_FORMAT.to_owned(),
            output_format: DEFAULT_OUTPUT_FORMAT.to_owned(),
            serialization_library: DEFAULT_SERIALIZATION_LIBRARY.to_owned(),
            location: location.into(),
        }
    }

    /// Copy of this descriptor pointing at a different location.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }
}

#[derive(Debug, thiserror::Error)]
#[error("malformed custom descriptor: {0}")]
pub struct MalformedDescriptor(#[from] serde_json::Error);

/// Determine the storage descriptor for a partition about to be created at
/// `location`.
///
/// Priority order, first match wins: the config's custom payload, the
/// owning table's descriptor, a synthesized plain-text default. A failed
/// table lookup is downgraded to a warning: an unrelated read error must
/// not fail the registration; only the create call itself may do that.
pub async fn resolve(
    catalog: &dyn CatalogClient,
    config: &PartitionConfig,
    location: &str,
) -> Result<StorageDescriptor, MalformedDescriptor> {
    if let Some(payload) = &config.custom_descriptor {
        let descriptor: StorageDescriptor = serde_json::from_str(payload)?;
        return Ok(descriptor.with_location(location));
    }

    let inherited = match catalog
        .get_table(config.catalog_id.as_deref(), &config.database, &config.table)
        .await
    {
        Ok(table) => table.descriptor,
        Err(error) => {
            warn!(
                database = %config.database,
                table = %config.table,
                %error,
                "failed to fetch table descriptor, falling back to defaults"
            );
            None
        }
    };

    match inherited {
        Some(descriptor) => Ok(descriptor.with_location(location)),
        None => {
            warn!(
                database = %config.database,
                table = %config.table,
                "no table descriptor available, synthesizing plain-text default"
            );
            Ok(StorageDescriptor::plain_text(location))
        }
    }
}
