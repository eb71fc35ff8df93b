//! # In-Memory Store
//!
//! Process-local [`EntityStore`] keyed by table, partition and id.
//! Documents are kept in their serialized JSON form so the same
//! serde rules apply as on the wire.

use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use async_trait::async_trait;
use serde_json::Value;

use super::{Entity, EntityStore, FindOptions, Query, StoreError, StoreResult};

/// Documents by id, ordered so listings are stable
type Partition = BTreeMap<String, Value>;

/// Partition name used for documents without a partition value
const DEFAULT_PARTITION: &str = "";

/// In-memory document store
#[derive(Debug, Default)]
pub struct InMemoryStore {
    /// table -> partition -> id -> document
    tables: RwLock<HashMap<&'static str, BTreeMap<String, Partition>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents in a table across all partitions
    pub fn count(&self, table: &str) -> usize {
        self.tables
            .read()
            .map(|tables| {
                tables
                    .get(table)
                    .map(|partitions| partitions.values().map(BTreeMap::len).sum())
                    .unwrap_or(0)
            })
            .unwrap_or(0)
    }
}

fn partition_key(partition: Option<&str>) -> String {
    match partition {
        Some(p) if !p.trim().is_empty() => p.to_string(),
        _ => DEFAULT_PARTITION.to_string(),
    }
}

/// Partitions a call may touch: the named one, or all of them when unscoped
fn scoped<'a>(
    partitions: &'a BTreeMap<String, Partition>,
    partition: Option<&'a str>,
) -> Box<dyn Iterator<Item = &'a Partition> + 'a> {
    match partition {
        Some(p) => Box::new(partitions.get(p).into_iter()),
        None => Box::new(partitions.values()),
    }
}

#[async_trait]
impl EntityStore for InMemoryStore {
    async fn save<E: Entity>(&self, entity: &E) -> StoreResult<E> {
        let document = serde_json::to_value(entity)?;
        let stored = serde_json::from_value(document.clone())?;

        let mut tables = self.tables.write().map_err(|_| StoreError::Poisoned)?;
        tables
            .entry(E::TABLE)
            .or_default()
            .entry(partition_key(entity.partition()))
            .or_default()
            .insert(entity.id().to_string(), document);

        Ok(stored)
    }

    async fn find_by_id<E: Entity>(
        &self,
        id: &str,
        options: &FindOptions,
    ) -> StoreResult<Option<E>> {
        let tables = self.tables.read().map_err(|_| StoreError::Poisoned)?;
        let Some(partitions) = tables.get(E::TABLE) else {
            return Ok(None);
        };

        let found = scoped(partitions, options.partition.as_deref())
            .find_map(|documents| documents.get(id));

        match found {
            Some(document) => Ok(Some(serde_json::from_value(document.clone())?)),
            None => Ok(None),
        }
    }

    async fn query<E: Entity>(&self, query: &Query) -> StoreResult<Vec<E>> {
        let tables = self.tables.read().map_err(|_| StoreError::Poisoned)?;
        let Some(partitions) = tables.get(E::TABLE) else {
            return Ok(Vec::new());
        };

        let limit = query.page_size.unwrap_or(usize::MAX);
        scoped(partitions, query.partition.as_deref())
            .flat_map(|documents| documents.values())
            .take(limit)
            .map(|document| serde_json::from_value(document.clone()).map_err(StoreError::from))
            .collect()
    }

    async fn delete<E: Entity>(&self, id: &str, options: &FindOptions) -> StoreResult<()> {
        let mut tables = self.tables.write().map_err(|_| StoreError::Poisoned)?;
        let removed = tables.get_mut(E::TABLE).and_then(|partitions| match &options.partition {
            Some(p) => partitions.get_mut(p).and_then(|documents| documents.remove(id)),
            None => partitions
                .values_mut()
                .find_map(|documents| documents.remove(id)),
        });

        match removed {
            Some(_) => Ok(()),
            None => Err(StoreError::not_found(E::TABLE, id)),
        }
    }
}
