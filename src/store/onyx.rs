//! # Onyx Cloud Client
//!
//! Thin HTTPS client for the Onyx Cloud data endpoints. Query planning,
//! partitioning and persistence happen server-side; this type only shapes
//! requests and decodes documents.
//!
//! Endpoints used (all relative to `{base_url}/data/{database_id}`):
//!
//! - `PUT /{table}` - save
//! - `GET /{table}/{id}` - find by id
//! - `PUT /query/{table}` - select query
//! - `DELETE /{table}/{id}` - delete

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use serde::Deserialize;
use serde_json::{json, Value};

use super::{Entity, EntityStore, FindOptions, Query, StoreError, StoreResult};
use crate::config::OnyxConfig;

const KEY_HEADER: &str = "x-onyx-key";
const SECRET_HEADER: &str = "x-onyx-secret";

/// Query endpoint response envelope
#[derive(Debug, Deserialize)]
struct QueryPage {
    #[serde(default)]
    records: Vec<Value>,
}

/// Long-lived Onyx Cloud handle
pub struct OnyxClient {
    http: Client,
    data_url: Url,
    api_key: String,
    api_secret: String,
    log_requests: bool,
    log_responses: bool,
    closed: AtomicBool,
}

impl OnyxClient {
    /// Build a client from validated configuration
    pub fn connect(config: &OnyxConfig) -> StoreResult<Self> {
        let mut builder = Client::builder();
        if let Some(ms) = config.request_timeout_ms {
            builder = builder.timeout(Duration::from_millis(ms));
        }
        if let Some(ms) = config.connect_timeout_ms {
            builder = builder.connect_timeout(Duration::from_millis(ms));
        }
        let http = builder.build()?;

        let data_url = data_url(&config.base_url, &config.database_id)?;

        tracing::info!(
            url = %data_url,
            ttl_ms = ?config.ttl,
            request_timeout_ms = ?config.request_timeout_ms,
            connect_timeout_ms = ?config.connect_timeout_ms,
            "onyx client initialised"
        );

        Ok(Self {
            http,
            data_url,
            api_key: config.api_key.clone(),
            api_secret: config.api_secret.clone(),
            log_requests: config.request_logging_enabled.unwrap_or(false),
            log_responses: config.response_logging_enabled.unwrap_or(false),
            closed: AtomicBool::new(false),
        })
    }

    /// `{data_url}/{segments...}`
    fn endpoint(&self, segments: &[&str]) -> StoreResult<Url> {
        let mut url = self.data_url.clone();
        url.path_segments_mut()
            .map_err(|_| StoreError::InvalidUrl(self.data_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(
        &self,
        method: Method,
        url: Url,
        body: Option<&Value>,
    ) -> StoreResult<RequestBuilder> {
        if self.closed.load(Ordering::Acquire) {
            return Err(StoreError::Closed);
        }

        if self.log_requests {
            tracing::info!(%method, %url, body = ?body, "onyx request");
        }

        let mut request = self
            .http
            .request(method, url)
            .header(KEY_HEADER, &self.api_key)
            .header(SECRET_HEADER, &self.api_secret);
        if let Some(body) = body {
            request = request.json(body);
        }
        Ok(request)
    }

    /// Send and return `(status, body)` for any status; transport faults only are errors
    async fn send(&self, request: RequestBuilder) -> StoreResult<(StatusCode, String)> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if self.log_responses {
            tracing::info!(status = status.as_u16(), %body, "onyx response");
        }

        Ok((status, body))
    }

    /// Send and fail on any non-success status
    async fn send_ok(&self, request: RequestBuilder) -> StoreResult<String> {
        let (status, body) = self.send(request).await?;
        if !status.is_success() {
            return Err(StoreError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }
}

impl fmt::Debug for OnyxClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OnyxClient")
            .field("data_url", &self.data_url.as_str())
            .field("api_key", &self.api_key)
            .field("api_secret", &"***")
            .field("closed", &self.closed.load(Ordering::Relaxed))
            .finish()
    }
}

/// Resolve `{base_url}/data/{database_id}`
fn data_url(base_url: &str, database_id: &str) -> StoreResult<Url> {
    let mut url =
        Url::parse(base_url).map_err(|e| StoreError::InvalidUrl(format!("{}: {}", base_url, e)))?;
    url.path_segments_mut()
        .map_err(|_| StoreError::InvalidUrl(base_url.to_string()))?
        .pop_if_empty()
        .extend(["data", database_id]);
    Ok(url)
}

fn with_partition(mut url: Url, partition: Option<&str>) -> Url {
    if let Some(partition) = partition {
        url.query_pairs_mut().append_pair("partition", partition);
    }
    url
}

#[async_trait]
impl EntityStore for OnyxClient {
    async fn save<E: Entity>(&self, entity: &E) -> StoreResult<E> {
        let document = serde_json::to_value(entity)?;
        let url = self.endpoint(&[E::TABLE])?;
        let request = self.request(Method::PUT, url, Some(&document))?;
        let body = self.send_ok(request).await?;

        // Some deployments answer with an empty body; the written document stands in.
        if body.trim().is_empty() {
            return Ok(serde_json::from_value(document)?);
        }
        Ok(serde_json::from_str(&body)?)
    }

    async fn find_by_id<E: Entity>(
        &self,
        id: &str,
        options: &FindOptions,
    ) -> StoreResult<Option<E>> {
        let url = with_partition(self.endpoint(&[E::TABLE, id])?, options.partition.as_deref());
        let request = self.request(Method::GET, url, None)?;
        let (status, body) = self.send(request).await?;

        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(StoreError::Status {
                status: status.as_u16(),
                body,
            });
        }
        if body.trim().is_empty() || body.trim() == "null" {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(&body)?))
    }

    async fn query<E: Entity>(&self, query: &Query) -> StoreResult<Vec<E>> {
        let mut url = with_partition(
            self.endpoint(&["query", E::TABLE])?,
            query.partition.as_deref(),
        );
        if let Some(page_size) = query.page_size {
            url.query_pairs_mut()
                .append_pair("pageSize", &page_size.to_string());
        }

        let select = json!({
            "type": "SelectQuery",
            "partition": query.partition,
        });
        let request = self.request(Method::PUT, url, Some(&select))?;
        let body = self.send_ok(request).await?;

        let page: QueryPage = serde_json::from_str(&body)?;
        page.records
            .into_iter()
            .map(|record| serde_json::from_value(record).map_err(StoreError::from))
            .collect()
    }

    async fn delete<E: Entity>(&self, id: &str, options: &FindOptions) -> StoreResult<()> {
        let url = with_partition(self.endpoint(&[E::TABLE, id])?, options.partition.as_deref());
        let request = self.request(Method::DELETE, url, None)?;
        self.send_ok(request).await?;
        Ok(())
    }

    async fn close(&self) -> StoreResult<()> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Err(StoreError::Closed);
        }
        tracing::info!(url = %self.data_url, "onyx client closed");
        Ok(())
    }
}
