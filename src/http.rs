//! HTTP orchestration layer
//!
//! Thin axum plumbing over the resolver and the storage capability. All
//! resolution logic lives in [`crate::resolver`]; handlers validate input,
//! invoke the core and shape responses.

use crate::config::Config;
use crate::error::ShelfError;
use crate::keys::basename;
use crate::partition::Partition;
use crate::resolver::{self, PartitionOutcome};
use crate::storage::ObjectStore;
use axum::body::Body;
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

/// Shared handler state: the long-lived store handle and the immutable
/// process configuration
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ObjectStore>,
    pub config: Arc<Config>,
}

/// Error wrapper mapping the crate taxonomy to HTTP statuses
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    fn internal(detail: String) -> Self {
        ApiError {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            detail,
        }
    }
}

impl<E: Into<ShelfError>> From<E> for ApiError {
    fn from(err: E) -> Self {
        let err = err.into();
        let status = match &err {
            ShelfError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ShelfError::NotFound { .. } => StatusCode::NOT_FOUND,
            ShelfError::Storage(_) | ShelfError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        ApiError {
            status,
            detail: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({ "detail": self.detail }));
        (self.status, body).into_response()
    }
}

#[derive(Debug, Deserialize)]
pub struct PresignRequest {
    pub domain: String,
    /// Base name, suffixed name or full filename
    pub dataset: String,
    /// Optional TTL override in seconds
    pub expires_in: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct PresignResponse {
    pub raw_url: Option<String>,
    pub curated_url: Option<String>,
    pub metadata_url: Option<String>,
    pub expires_in: u64,
    pub missing: Vec<Partition>,
    /// Every key probed, in probe order, per partition
    pub tried_keys: BTreeMap<Partition, Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub include_curated: bool,
}

#[derive(Debug, Deserialize)]
pub struct ProxyQuery {
    pub domain: String,
    pub dataset: String,
    #[serde(default = "default_which")]
    pub which: String,
}

fn default_which() -> String {
    "raw".to_string()
}

/// Build the service router
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers([header::CONTENT_DISPOSITION]);

    Router::new()
        .route("/api/datasets/:domain", get(list_datasets))
        .route("/api/presign", post(presign))
        .route("/api/proxy", get(proxy))
        .layer(cors)
        .with_state(state)
}

fn require_nonempty(value: &str, field: &str) -> Result<(), ApiError> {
    if value.is_empty() {
        return Err(ShelfError::InvalidInput(format!(
            "'{}' is required and must be non-empty",
            field
        ))
        .into());
    }
    Ok(())
}

/// `GET /api/datasets/{domain}` — friendly base names under the domain's
/// raw (and optionally curated) prefix
async fn list_datasets(
    State(state): State<AppState>,
    Path(domain): Path<String>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<String>>, ApiError> {
    let domain = domain.trim().trim_matches('/').to_string();
    require_nonempty(&domain, "domain")?;

    let bases = resolver::list_datasets(
        state.store.as_ref(),
        &state.config.prefix,
        &domain,
        query.include_curated,
    )
    .await?;
    Ok(Json(bases))
}

/// `POST /api/presign` — resolve the identifier across all partitions and
/// issue a download URL for each object that exists
async fn presign(
    State(state): State<AppState>,
    Json(request): Json<PresignRequest>,
) -> Result<Json<PresignResponse>, ApiError> {
    let domain = request.domain.trim().trim_matches('/').to_string();
    let dataset = request.dataset.trim().trim_start_matches('/').to_string();
    require_nonempty(&domain, "domain")?;
    require_nonempty(&dataset, "dataset")?;

    let expires_in = request.expires_in.unwrap_or(state.config.default_ttl_secs);
    let ttl = Duration::from_secs(expires_in);

    let resolution =
        resolver::resolve(state.store.as_ref(), &state.config.prefix, &domain, &dataset).await;

    // Sibling partitions were still resolved, but a probe failure makes the
    // request a server-side failure rather than a silent "missing".
    if let Some((partition, err)) = resolution.first_failure() {
        return Err(ApiError::internal(format!(
            "probing {} partition failed: {}",
            partition, err
        )));
    }

    let mut urls: BTreeMap<Partition, String> = BTreeMap::new();
    for partition in [Partition::Raw, Partition::Curated, Partition::Metadata] {
        if let PartitionOutcome::Found(found) = resolution.outcome(partition) {
            let url = state
                .store
                .presign_get(&found.key, &found.filename, ttl)
                .await?;
            urls.insert(partition, url);
        }
    }

    info!(
        %domain,
        %dataset,
        missing = ?resolution.missing(),
        "presign request resolved"
    );

    Ok(Json(PresignResponse {
        raw_url: urls.remove(&Partition::Raw),
        curated_url: urls.remove(&Partition::Curated),
        metadata_url: urls.remove(&Partition::Metadata),
        expires_in,
        missing: resolution.missing(),
        tried_keys: resolution.probed,
    }))
}

/// `GET /api/proxy` — stream the object through the service for clients
/// that cannot use presigned URLs
async fn proxy(
    State(state): State<AppState>,
    Query(query): Query<ProxyQuery>,
) -> Result<Response, ApiError> {
    let domain = query.domain.trim().trim_matches('/').to_string();
    let dataset = query.dataset.trim().trim_start_matches('/').to_string();
    require_nonempty(&domain, "domain")?;
    require_nonempty(&dataset, "dataset")?;
    let partition: Partition = query.which.parse()?;

    let found = resolver::resolve_partition(
        state.store.as_ref(),
        &state.config.prefix,
        partition,
        &domain,
        &dataset,
    )
    .await?
    .ok_or_else(|| ShelfError::NotFound {
        partition,
        domain: domain.clone(),
        dataset: dataset.clone(),
    })?;

    let (stream, content_type) = state.store.open_stream(&found.key).await?;
    let disposition = format!("attachment; filename=\"{}\"", basename(&found.key));

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_DISPOSITION, disposition)
        .body(Body::from_stream(stream))
        .map_err(|e| ApiError::internal(format!("failed to build response: {}", e)))?;
    Ok(response)
}
