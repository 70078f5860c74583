//! In-memory implementation of the catalog interface. Used by the tests in
//! this workspace; also handy for dry-running the operation handlers
//! without a catalog service.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use crate::descriptor::StorageDescriptor;
use crate::interface::{CatalogClient, CatalogError, Partition, Result, TableMeta};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct TableKey {
    catalog_id: Option<String>,
    database: String,
    table: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct PartitionKey {
    catalog_id: Option<String>,
    database: String,
    table: String,
    values: Vec<String>,
}

#[derive(Debug, Default)]
struct MemCollections {
    tables: HashMap<TableKey, TableMeta>,
    partitions: HashMap<PartitionKey, Partition>,
}

/// In-memory catalog with the same compare-and-create semantics the remote
/// service provides: a create that collides with an existing partition
/// reports [`CatalogError::AlreadyExists`] instead of overwriting.
#[derive(Debug, Default)]
pub struct MemCatalog {
    collections: Mutex<MemCollections>,
}

impl MemCatalog {
    /// Seed a table, optionally with its own storage descriptor.
    pub async fn put_table(
        &self,
        catalog_id: Option<&str>,
        database: &str,
        table: &str,
        descriptor: Option<StorageDescriptor>,
    ) {
        let key = TableKey {
            catalog_id: catalog_id.map(str::to_owned),
            database: database.to_owned(),
            table: table.to_owned(),
        };
        let meta = TableMeta {
            name: table.to_owned(),
            descriptor,
        };
        self.collections.lock().await.tables.insert(key, meta);
    }
}

#[async_trait]
impl CatalogClient for MemCatalog {
    async fn get_partition(
        &self,
        catalog_id: Option<&str>,
        database: &str,
        table: &str,
        values: &[String],
    ) -> Result<Partition> {
        let key = partition_key(catalog_id, database, table, values);
        self.collections
            .lock()
            .await
            .partitions
            .get(&key)
            .cloned()
            .ok_or(CatalogError::NotFound)
    }

    async fn create_partition(
        &self,
        catalog_id: Option<&str>,
        database: &str,
        table: &str,
        values: &[String],
        descriptor: &StorageDescriptor,
    ) -> Result<()> {
        let key = partition_key(catalog_id, database, table, values);
        match self.collections.lock().await.partitions.entry(key) {
            Entry::Occupied(_) => Err(CatalogError::AlreadyExists),
            Entry::Vacant(entry) => {
                entry.insert(Partition {
                    values: values.to_vec(),
                    location: Some(descriptor.location.clone()),
                    created_at: Some(Utc::now()),
                });
                Ok(())
            }
        }
    }

    async fn delete_partition(
        &self,
        catalog_id: Option<&str>,
        database: &str,
        table: &str,
        values: &[String],
    ) -> Result<()> {
        let key = partition_key(catalog_id, database, table, values);
        self.collections
            .lock()
            .await
            .partitions
            .remove(&key)
            .map(|_| ())
            .ok_or(CatalogError::NotFound)
    }

    async fn get_table(
        &self,
        catalog_id: Option<&str>,
        database: &str,
        table: &str,
    ) -> Result<TableMeta> {
        let key = TableKey {
            catalog_id: catalog_id.map(str::to_owned),
            database: database.to_owned(),
            table: table.to_owned(),
        };
        self.collections
            .lock()
            .await
            .tables
            .get(&key)
            .cloned()
            .ok_or(CatalogError::NotFound)
    }
}

fn partition_key(
    catalog_id: Option<&str>,
    database: &str,
    table: &str,
    values: &[String],
) -> PartitionKey {
    PartitionKey {
        catalog_id: catalog_id.map(str::to_owned),
        database: database.to_owned(),
        table: table.to_owned(),
        values: values.to_vec(),
    }
}
