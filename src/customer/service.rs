//! # Customer Service
//!
//! Operations behind the `/api/customers` routes. Each call is one store
//! round trip, two for update (read then write). Store faults propagate
//! unchanged except on delete, where they become [`DeleteOutcome::NotDeleted`].

use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use uuid::Uuid;

use super::mapper::to_record;
use super::model::Customer;
use super::partition::PartitionResolver;
use super::validator::ValidatedRequest;
use crate::store::{EntityStore, FindOptions, Query, StoreResult};

/// Result of a delete call
///
/// `NotDeleted` covers both "no such record" and "store failed". Some store
/// deployments report failure on deletes that did succeed, so the two are
/// not told apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    NotDeleted,
}

impl DeleteOutcome {
    pub fn is_deleted(self) -> bool {
        matches!(self, Self::Deleted)
    }
}

/// Current UTC time, millisecond precision, `Z` suffix
fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Customer operations over an [`EntityStore`]
pub struct CustomerService<S: EntityStore> {
    store: Arc<S>,
    partitions: PartitionResolver,
}

impl<S: EntityStore> CustomerService<S> {
    pub fn new(store: Arc<S>, default_partition: Option<String>) -> Self {
        let partitions = PartitionResolver::new(default_partition);
        tracing::debug!(
            default_partition = ?partitions.default_partition(),
            "customer service ready"
        );
        Self { store, partitions }
    }

    /// Mint an id and timestamp, then save
    pub async fn create(&self, request: &ValidatedRequest) -> StoreResult<Customer> {
        let id = Uuid::new_v4().to_string();
        let customer = to_record(&id, &now(), request);

        let saved = self.store.save(&customer).await?;
        tracing::info!(customer_id = %saved.customer_id, "customer created");
        Ok(saved)
    }

    /// `Ok(None)` when the store has no match
    pub async fn get(
        &self,
        id: &str,
        partition: Option<&str>,
        fallback_partition: Option<&str>,
    ) -> StoreResult<Option<Customer>> {
        let target = self.partitions.resolve(partition, fallback_partition);
        tracing::debug!(customer_id = %id, partition = ?target, "get customer");

        self.store
            .find_by_id(id, &FindOptions::in_partition(target))
            .await
    }

    /// All customers in the resolved partition, capped when `page_size > 0`
    pub async fn list(
        &self,
        partition: Option<&str>,
        page_size: Option<i64>,
    ) -> StoreResult<Vec<Customer>> {
        let mut query = Query::all();
        if let Some(target) = self.partitions.resolve(partition, None) {
            query = query.in_partition(target);
        }
        if let Some(size) = page_size.filter(|size| *size > 0) {
            query = query.page_size(usize::try_from(size).unwrap_or(usize::MAX));
        }
        tracing::debug!(partition = ?query.partition, page_size = ?query.page_size, "list customers");

        self.store.query(&query).await
    }

    /// Replace every field but id and creation time; creates when absent
    pub async fn update(
        &self,
        id: &str,
        request: &ValidatedRequest,
        partition: Option<&str>,
    ) -> StoreResult<Customer> {
        let target = self
            .partitions
            .resolve(partition, Some(request.country_code.as_str()));

        let current: Option<Customer> = self
            .store
            .find_by_id(id, &FindOptions::in_partition(target))
            .await?;
        let created_at = match current {
            Some(existing) => existing.date_created,
            None => {
                tracing::debug!(customer_id = %id, "no current record, updating as insert");
                now()
            }
        };

        let customer = to_record(id, &created_at, request);
        let saved = self.store.save(&customer).await?;
        tracing::info!(customer_id = %id, "customer updated");
        Ok(saved)
    }

    /// Store errors are absorbed, see [`DeleteOutcome`]
    pub async fn delete(&self, id: &str, partition: Option<&str>) -> DeleteOutcome {
        let target = self.partitions.resolve(partition, None);
        let options = FindOptions::in_partition(target);

        match self.store.delete::<Customer>(id, &options).await {
            Ok(()) => {
                tracing::info!(customer_id = %id, "customer deleted");
                DeleteOutcome::Deleted
            }
            Err(err) if err.is_not_found() => {
                tracing::debug!(customer_id = %id, "customer already absent");
                DeleteOutcome::NotDeleted
            }
            Err(err) => {
                tracing::warn!(customer_id = %id, error = %err, "customer not deleted");
                DeleteOutcome::NotDeleted
            }
        }
    }
}
