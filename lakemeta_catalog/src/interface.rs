//! Traits and data objects for the catalog API.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::descriptor::StorageDescriptor;

/// Error kinds a catalog operation can surface.
///
/// `NotFound` and `AlreadyExists` are the conditions the operation handlers
/// recover from locally; everything else is carried in `Remote` with the
/// original message and surfaced verbatim, never retried.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("resource not found")]
    NotFound,

    #[error("resource already exists")]
    AlreadyExists,

    #[error("catalog request failed: {message}")]
    Remote { message: String },
}

impl CatalogError {
    pub fn remote(message: impl Into<String>) -> Self {
        Self::Remote {
            message: message.into(),
        }
    }
}

/// A specialized `Error` for catalog operations
pub type Result<T, E = CatalogError> = std::result::Result<T, E>;

/// A registered partition as read back from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partition {
    /// Partition key values, in the table's partition key order
    pub values: Vec<String>,
    /// Physical storage location the partition points at
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// When the catalog registered the partition
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Table metadata as read back from the catalog. Only the pieces partition
/// registration cares about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableMeta {
    pub name: String,
    /// The table's own storage descriptor, if it has one. New partitions
    /// inherit a copy of this unless the caller overrides it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub descriptor: Option<StorageDescriptor>,
}

/// Remote catalog operations needed for partition lifecycle management.
///
/// Implementations are expected to provide server-side compare-and-create
/// semantics: a `create_partition` that loses a race against a concurrent
/// duplicate must report [`CatalogError::AlreadyExists`] rather than
/// silently overwriting. That is the only concurrency guarantee the
/// operation handlers rely on.
#[async_trait]
pub trait CatalogClient: std::fmt::Debug + Send + Sync {
    /// Look up a single partition by its identifying tuple.
    async fn get_partition(
        &self,
        catalog_id: Option<&str>,
        database: &str,
        table: &str,
        values: &[String],
    ) -> Result<Partition>;

    /// Register a partition with the given descriptor.
    async fn create_partition(
        &self,
        catalog_id: Option<&str>,
        database: &str,
        table: &str,
        values: &[String],
        descriptor: &StorageDescriptor,
    ) -> Result<()>;

    /// Remove a partition.
    async fn delete_partition(
        &self,
        catalog_id: Option<&str>,
        database: &str,
        table: &str,
        values: &[String],
    ) -> Result<()>;

    /// Fetch the owning table's metadata.
    async fn get_table(
        &self,
        catalog_id: Option<&str>,
        database: &str,
        table: &str,
    ) -> Result<TableMeta>;
}
