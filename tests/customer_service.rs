//! Customer Service Tests
//!
//! Behaviour of the customer operations over a process-local store:
//! - Identities are fresh and timestamps are never in the future
//! - Updates preserve creation time and upsert when absent
//! - List honours partition scoping and page size
//! - Delete reports absence and store failure as not-deleted

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use customer_api::customer::{
    validate, CustomerRequest, CustomerService, DeleteOutcome, ProfilePicRequest, ValidatedRequest,
};
use customer_api::store::{
    Entity, EntityStore, FindOptions, InMemoryStore, Query, StoreError, StoreResult,
};
use rust_decimal::Decimal;

// =============================================================================
// Helper Functions
// =============================================================================

fn request(country: &str) -> ValidatedRequest {
    validate(CustomerRequest {
        first_name: Some("Ada".to_string()),
        last_name: Some("Lovelace".to_string()),
        email: Some("ada@example.com".to_string()),
        age: Some(36),
        is_active: Some(true),
        balance: Some(Decimal::new(10050, 2)),
        profile_pic: None,
        country_code: Some(country.to_string()),
    })
    .unwrap()
}

fn service() -> (Arc<InMemoryStore>, CustomerService<InMemoryStore>) {
    let store = Arc::new(InMemoryStore::new());
    let service = CustomerService::new(Arc::clone(&store), None);
    (store, service)
}

/// Store whose every call fails, standing in for an unreachable database
struct UnreachableStore;

#[async_trait]
impl EntityStore for UnreachableStore {
    async fn save<E: Entity>(&self, _entity: &E) -> StoreResult<E> {
        Err(StoreError::Status {
            status: 503,
            body: "unavailable".to_string(),
        })
    }

    async fn find_by_id<E: Entity>(
        &self,
        _id: &str,
        _options: &FindOptions,
    ) -> StoreResult<Option<E>> {
        Err(StoreError::Status {
            status: 503,
            body: "unavailable".to_string(),
        })
    }

    async fn query<E: Entity>(&self, _query: &Query) -> StoreResult<Vec<E>> {
        Err(StoreError::Status {
            status: 503,
            body: "unavailable".to_string(),
        })
    }

    async fn delete<E: Entity>(&self, _id: &str, _options: &FindOptions) -> StoreResult<()> {
        Err(StoreError::Status {
            status: 503,
            body: "unavailable".to_string(),
        })
    }
}

// =============================================================================
// Create Tests
// =============================================================================

/// Every create mints a distinct identity.
#[tokio::test]
async fn test_create_mints_distinct_ids() {
    let (store, svc) = service();

    let mut ids = HashSet::new();
    for _ in 0..20 {
        let created = svc.create(&request("GB")).await.unwrap();
        assert!(ids.insert(created.customer_id));
    }
    assert_eq!(store.count("Customer"), 20);
}

/// Creation time parses and is not in the future.
#[tokio::test]
async fn test_create_timestamp_not_in_future() {
    let (_store, svc) = service();
    let created = svc.create(&request("GB")).await.unwrap();

    let stamp = DateTime::parse_from_rfc3339(&created.date_created).unwrap();
    assert!(stamp <= Utc::now());
    assert!(created.date_created.ends_with('Z'));
}

/// Picture fields survive the round trip through the store.
#[tokio::test]
async fn test_create_with_picture() {
    let (_store, svc) = service();
    let validated = validate(CustomerRequest {
        profile_pic: Some(ProfilePicRequest {
            url: Some("https://img.example/ada.png".to_string()),
            content_type: Some("image/png".to_string()),
            size_bytes: Some(2048),
        }),
        ..CustomerRequest {
            first_name: Some("Ada".to_string()),
            last_name: Some("Lovelace".to_string()),
            email: Some("ada@example.com".to_string()),
            is_active: Some(true),
            balance: Some(Decimal::ZERO),
            country_code: Some("GB".to_string()),
            ..Default::default()
        }
    })
    .unwrap();

    let created = svc.create(&validated).await.unwrap();
    let found = svc
        .get(&created.customer_id, Some("GB"), None)
        .await
        .unwrap()
        .unwrap();

    let picture = found.profile_pic.unwrap();
    assert_eq!(picture.url, "https://img.example/ada.png");
    assert_eq!(picture.size_bytes, Some(2048));
}

// =============================================================================
// Update Tests
// =============================================================================

/// Update keeps id and creation time, replaces everything else.
#[tokio::test]
async fn test_update_preserves_creation_time() {
    let (_store, svc) = service();
    let created = svc.create(&request("GB")).await.unwrap();

    let mut changed = request("GB");
    changed.email = "augusta@example.com".to_string();
    changed.age = None;
    changed.balance = Decimal::new(-1, 0);

    let updated = svc
        .update(&created.customer_id, &changed, None)
        .await
        .unwrap();
    assert_eq!(updated.customer_id, created.customer_id);
    assert_eq!(updated.date_created, created.date_created);
    assert_eq!(updated.email, "augusta@example.com");
    assert_eq!(updated.age, None);
    assert_eq!(updated.balance, Decimal::new(-1, 0));
}

/// Update on an unknown id creates it with a fresh timestamp.
#[tokio::test]
async fn test_update_unknown_id_upserts() {
    let (store, svc) = service();
    let updated = svc.update("missing", &request("FR"), None).await.unwrap();

    assert_eq!(updated.customer_id, "missing");
    assert!(DateTime::parse_from_rfc3339(&updated.date_created).is_ok());
    assert_eq!(store.count("Customer"), 1);
}

// =============================================================================
// List Tests
// =============================================================================

/// Non-positive page sizes do not limit; positive ones cap the result.
#[tokio::test]
async fn test_list_page_size() {
    let (_store, svc) = service();
    for _ in 0..8 {
        svc.create(&request("GB")).await.unwrap();
    }

    assert_eq!(svc.list(None, None).await.unwrap().len(), 8);
    assert_eq!(svc.list(None, Some(0)).await.unwrap().len(), 8);
    assert_eq!(svc.list(None, Some(-3)).await.unwrap().len(), 8);
    assert_eq!(svc.list(None, Some(5)).await.unwrap().len(), 5);
}

/// An explicit partition scopes the list.
#[tokio::test]
async fn test_list_by_partition() {
    let (_store, svc) = service();
    svc.create(&request("GB")).await.unwrap();
    svc.create(&request("GB")).await.unwrap();
    svc.create(&request("US")).await.unwrap();

    let gb = svc.list(Some("GB"), None).await.unwrap();
    assert_eq!(gb.len(), 2);
    assert!(gb.iter().all(|c| c.country_code == "GB"));

    assert_eq!(svc.list(Some(""), None).await.unwrap().len(), 3);
}

// =============================================================================
// Delete Tests
// =============================================================================

/// Deleting a present record removes it; deleting again reports not-deleted.
#[tokio::test]
async fn test_delete_present_then_absent() {
    let (_store, svc) = service();
    let created = svc.create(&request("GB")).await.unwrap();

    assert!(svc.delete(&created.customer_id, Some("GB")).await.is_deleted());
    assert!(svc
        .get(&created.customer_id, Some("GB"), None)
        .await
        .unwrap()
        .is_none());
    assert_eq!(
        svc.delete(&created.customer_id, Some("GB")).await,
        DeleteOutcome::NotDeleted
    );
}

// =============================================================================
// Store Failure Tests
// =============================================================================

/// Store faults propagate from reads and writes.
#[tokio::test]
async fn test_store_faults_propagate() {
    let svc = CustomerService::new(Arc::new(UnreachableStore), None);

    assert!(matches!(
        svc.create(&request("GB")).await,
        Err(StoreError::Status { status: 503, .. })
    ));
    assert!(svc.get("id", None, None).await.is_err());
    assert!(svc.list(None, None).await.is_err());
    assert!(svc.update("id", &request("GB"), None).await.is_err());
}

/// Delete absorbs store faults.
#[tokio::test]
async fn test_delete_absorbs_store_fault() {
    let svc = CustomerService::new(Arc::new(UnreachableStore), None);
    assert_eq!(svc.delete("id", None).await, DeleteOutcome::NotDeleted);
}
