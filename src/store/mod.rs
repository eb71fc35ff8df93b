//! # Store Boundary
//!
//! The document database is an external collaborator. This module declares
//! the contract the service layer consumes:
//!
//! - [`Entity`] - a persisted shape declares its table once
//! - [`EntityStore`] - save / find / query / delete, generic over the entity
//!
//! Two implementations ship with the crate: [`OnyxClient`] talks to Onyx
//! Cloud over HTTPS, [`InMemoryStore`] keeps documents in process for tests
//! and local runs.

pub mod errors;
pub mod memory;
pub mod onyx;

pub use errors::{StoreError, StoreResult};
pub use memory::InMemoryStore;
pub use onyx::OnyxClient;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// A document type persisted in a single table
pub trait Entity: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Table (entity type) name in the database schema
    const TABLE: &'static str;

    /// Primary key
    fn id(&self) -> &str;

    /// Partition the document is written to, if the schema partitions it
    fn partition(&self) -> Option<&str> {
        None
    }
}

/// Options for id-addressed calls (find and delete)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FindOptions {
    pub partition: Option<String>,
}

impl FindOptions {
    pub fn in_partition(partition: Option<String>) -> Self {
        Self { partition }
    }
}

/// A select-all query over one table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub partition: Option<String>,
    pub page_size: Option<usize>,
}

impl Query {
    /// Every record of the table, store default partition, no limit
    pub fn all() -> Self {
        Self::default()
    }

    pub fn in_partition(mut self, partition: impl Into<String>) -> Self {
        self.partition = Some(partition.into());
        self
    }

    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = Some(page_size);
        self
    }
}

/// Database client contract
///
/// Every call is a single attempt; implementations do not retry.
#[async_trait]
pub trait EntityStore: Send + Sync {
    /// Write the entity, overwriting any record with the same id
    async fn save<E: Entity>(&self, entity: &E) -> StoreResult<E>;

    /// Look up one record; `Ok(None)` when the store has no match
    async fn find_by_id<E: Entity>(&self, id: &str, options: &FindOptions)
        -> StoreResult<Option<E>>;

    /// Run a select-all query, results in store order
    async fn query<E: Entity>(&self, query: &Query) -> StoreResult<Vec<E>>;

    /// Remove one record
    async fn delete<E: Entity>(&self, id: &str, options: &FindOptions) -> StoreResult<()>;

    /// Release the handle. Called once at shutdown.
    async fn close(&self) -> StoreResult<()> {
        Ok(())
    }
}
