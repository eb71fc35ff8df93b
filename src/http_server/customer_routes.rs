//! Customer HTTP Routes
//!
//! CRUD endpoints for customer records, nested under `/api`.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use super::errors::{ApiError, ApiResult};
use crate::customer::{validate, Customer, CustomerRequest, CustomerService, ValidatedRequest};
use crate::store::EntityStore;

// ==================
// Shared State
// ==================

/// Customer state shared across handlers
pub struct CustomerState<S: EntityStore> {
    pub service: CustomerService<S>,
}

impl<S: EntityStore> CustomerState<S> {
    pub fn new(service: CustomerService<S>) -> Self {
        Self { service }
    }
}

// ==================
// Request Types
// ==================

/// `?countryCode=` on single-record routes
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartitionQuery {
    pub country_code: Option<String>,
}

/// `?countryCode=&pageSize=` on the list route
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub country_code: Option<String>,
    pub page_size: Option<i64>,
}

// ==================
// Route Configuration
// ==================

pub fn customer_routes<S: EntityStore + 'static>(state: Arc<CustomerState<S>>) -> Router {
    Router::new()
        .route(
            "/customers",
            get(list_customers_handler::<S>).post(create_customer_handler::<S>),
        )
        .route(
            "/customers/:customer_id",
            get(get_customer_handler::<S>)
                .put(update_customer_handler::<S>)
                .delete(delete_customer_handler::<S>),
        )
        .with_state(state)
}

// ==================
// Helper Functions
// ==================

fn read_body(body: Result<Json<CustomerRequest>, JsonRejection>) -> ApiResult<ValidatedRequest> {
    let Json(request) = body.map_err(|e| ApiError::InvalidBody(e.body_text()))?;
    Ok(validate(request)?)
}

fn read_query<T>(query: Result<Query<T>, QueryRejection>) -> ApiResult<T> {
    query
        .map(|Query(q)| q)
        .map_err(|e| ApiError::InvalidQueryParam(e.body_text()))
}

// ==================
// Customer Handlers
// ==================

async fn create_customer_handler<S: EntityStore>(
    State(state): State<Arc<CustomerState<S>>>,
    body: Result<Json<CustomerRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Customer>)> {
    let request = read_body(body)?;
    let created = state.service.create(&request).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn get_customer_handler<S: EntityStore>(
    State(state): State<Arc<CustomerState<S>>>,
    Path(customer_id): Path<String>,
    query: Result<Query<PartitionQuery>, QueryRejection>,
) -> ApiResult<Json<Customer>> {
    let query = read_query(query)?;
    state
        .service
        .get(&customer_id, query.country_code.as_deref(), None)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound)
}

async fn list_customers_handler<S: EntityStore>(
    State(state): State<Arc<CustomerState<S>>>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<Customer>>> {
    let query = read_query(query)?;
    let customers = state
        .service
        .list(query.country_code.as_deref(), query.page_size)
        .await?;
    Ok(Json(customers))
}

async fn update_customer_handler<S: EntityStore>(
    State(state): State<Arc<CustomerState<S>>>,
    Path(customer_id): Path<String>,
    query: Result<Query<PartitionQuery>, QueryRejection>,
    body: Result<Json<CustomerRequest>, JsonRejection>,
) -> ApiResult<Json<Customer>> {
    let query = read_query(query)?;
    let request = read_body(body)?;
    let updated = state
        .service
        .update(&customer_id, &request, query.country_code.as_deref())
        .await?;
    Ok(Json(updated))
}

async fn delete_customer_handler<S: EntityStore>(
    State(state): State<Arc<CustomerState<S>>>,
    Path(customer_id): Path<String>,
    query: Result<Query<PartitionQuery>, QueryRejection>,
) -> ApiResult<StatusCode> {
    let query = read_query(query)?;
    let outcome = state
        .service
        .delete(&customer_id, query.country_code.as_deref())
        .await;

    if outcome.is_deleted() {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound)
    }
}
