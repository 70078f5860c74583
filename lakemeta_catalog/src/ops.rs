//! The three partition operations: `add`, `delete`, `exists`.
//!
//! Each operation is a short sequence of remote calls over one partition,
//! identified by `(catalog_id, database, table, values)`. State lives
//! entirely in the remote catalog; the handlers only decide which remote
//! outcomes count as success. Expected conditions (not-found on read or
//! delete, already-exists on an idempotent create) are folded into
//! successful results; everything else becomes a failed result carrying the
//! original error text. The caller treats a failed result as a fatal run.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::descriptor;
use crate::interface::{CatalogClient, CatalogError};

#[derive(Debug, thiserror::Error)]
#[error("add requires a partition location")]
pub struct MissingLocation;

/// Input bundle for a single partition operation. Built once, then moved
/// into the operation call that consumes it.
#[derive(Debug, Clone)]
pub struct PartitionConfig {
    pub database: String,
    pub table: String,
    /// One value per partition key, in the table's partition key order
    pub partition_values: Vec<String>,
    /// Canonical location URI, required by `add`
    pub location: Option<String>,
    /// Target catalog account/scope, if not the caller's default
    pub catalog_id: Option<String>,
    /// Treat an existing partition as success on `add`
    pub if_not_exists: bool,
    /// Raw JSON payload overriding descriptor inheritance
    pub custom_descriptor: Option<String>,
}

impl PartitionConfig {
    pub fn new(
        database: impl Into<String>,
        table: impl Into<String>,
        partition_values: Vec<String>,
    ) -> Self {
        Self {
            database: database.into(),
            table: table.into(),
            partition_values,
            location: None,
            catalog_id: None,
            if_not_exists: true,
            custom_descriptor: None,
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_catalog_id(mut self, catalog_id: impl Into<String>) -> Self {
        self.catalog_id = Some(catalog_id.into());
        self
    }

    pub fn with_custom_descriptor(mut self, payload: impl Into<String>) -> Self {
        self.custom_descriptor = Some(payload.into());
        self
    }

    pub fn if_not_exists(mut self, if_not_exists: bool) -> Self {
        self.if_not_exists = if_not_exists;
        self
    }
}

/// Outcome record of one partition operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartitionResult {
    pub success: bool,
    pub exists: bool,
    pub partition_values: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl PartitionResult {
    fn success(config: &PartitionConfig, exists: bool) -> Self {
        Self {
            success: true,
            exists,
            partition_values: config.partition_values.clone(),
            location: None,
            created_at: None,
            error_message: None,
        }
    }

    fn failure(config: &PartitionConfig, error: impl ToString) -> Self {
        Self {
            success: false,
            exists: false,
            partition_values: config.partition_values.clone(),
            location: None,
            created_at: None,
            error_message: Some(error.to_string()),
        }
    }
}

/// Check whether the partition is registered.
///
/// A partition that is not there is a normal answer for this operation,
/// not an error.
pub async fn exists(catalog: &dyn CatalogClient, config: &PartitionConfig) -> PartitionResult {
    match catalog
        .get_partition(
            config.catalog_id.as_deref(),
            &config.database,
            &config.table,
            &config.partition_values,
        )
        .await
    {
        Ok(partition) => PartitionResult {
            location: partition.location,
            created_at: partition.created_at,
            ..PartitionResult::success(config, true)
        },
        Err(CatalogError::NotFound) => PartitionResult::success(config, false),
        Err(error) => PartitionResult::failure(config, error),
    }
}

/// Register the partition, resolving its storage descriptor from the custom
/// payload, the owning table, or a synthesized default.
///
/// With `if_not_exists` set, a partition that is already registered (found
/// by the pre-check, or created concurrently between the pre-check and the
/// create call) is reported as success without touching it.
pub async fn add(catalog: &dyn CatalogClient, config: &PartitionConfig) -> PartitionResult {
    let Some(location) = config.location.as_deref() else {
        return PartitionResult::failure(config, MissingLocation);
    };

    if config.if_not_exists {
        match catalog
            .get_partition(
                config.catalog_id.as_deref(),
                &config.database,
                &config.table,
                &config.partition_values,
            )
            .await
        {
            Ok(partition) => {
                return PartitionResult {
                    location: partition.location,
                    created_at: partition.created_at,
                    ..PartitionResult::success(config, true)
                };
            }
            Err(CatalogError::NotFound) => {}
            Err(error) => return PartitionResult::failure(config, error),
        }
    }

    let descriptor = match descriptor::resolve(catalog, config, location).await {
        Ok(descriptor) => descriptor,
        Err(error) => return PartitionResult::failure(config, error),
    };

    match catalog
        .create_partition(
            config.catalog_id.as_deref(),
            &config.database,
            &config.table,
            &config.partition_values,
            &descriptor,
        )
        .await
    {
        Ok(()) => {
            info!(
                database = %config.database,
                table = %config.table,
                %location,
                "registered partition"
            );
            PartitionResult {
                location: Some(location.to_owned()),
                ..PartitionResult::success(config, true)
            }
        }
        // lost the race between the existence check and the create call
        Err(CatalogError::AlreadyExists) if config.if_not_exists => {
            info!(
                database = %config.database,
                table = %config.table,
                "partition created concurrently, treating as success"
            );
            PartitionResult {
                location: Some(location.to_owned()),
                ..PartitionResult::success(config, true)
            }
        }
        Err(error) => PartitionResult::failure(config, error),
    }
}

/// Remove the partition. Deleting a partition that is not there is a
/// success: the desired end state already holds.
pub async fn delete(catalog: &dyn CatalogClient, config: &PartitionConfig) -> PartitionResult {
    match catalog
        .delete_partition(
            config.catalog_id.as_deref(),
            &config.database,
            &config.table,
            &config.partition_values,
        )
        .await
    {
        Ok(()) => {
            info!(
                database = %config.database,
                table = %config.table,
                "deleted partition"
            );
            PartitionResult::success(config, false)
        }
        Err(CatalogError::NotFound) => PartitionResult::success(config, false),
        Err(error) => PartitionResult::failure(config, error),
    }
}
