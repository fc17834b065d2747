use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use http_body_util::BodyExt;
use serde::de::DeserializeOwned;
use tracing::info;

use super::{
    models::{
        AddonSummary, AddonsResponse, HealthResponse, ResolveBody, ResolveResponse,
        SourceOutcome, StreamsResponse,
    },
    state::{AddonRuntime, AppState},
    validation,
};
use crate::api::error::ApiError;
use crate::engine::ResolvePolicy;
use crate::handlers::{CatalogRequest, StageRequest, StageResponse};
use crate::model::MediaIdentity;

/// Catalog stage endpoint (POST /addons/{addon_id}/catalog)
///
/// Body is a `CatalogRequest`; an absent or null cursor requests the first
/// page. Returns the handler's `CatalogPage` unchanged.
pub async fn addon_catalog(
    State(state): State<AppState>,
    Path(addon_id): Path<String>,
    headers: HeaderMap,
    body: axum::body::Body,
) -> Result<impl IntoResponse, ApiError> {
    let runtime = lookup_addon(&state, &addon_id)?;
    let request: CatalogRequest = read_json_body(&state, &headers, body).await?;

    state.metrics.stage_dispatched();
    let response = runtime
        .addon
        .dispatch(StageRequest::Catalog(request), state.request_context())
        .await?;

    let StageResponse::Catalog(page) = response else {
        return Err(ApiError::Internal("stage response mismatch".into()));
    };
    Ok((StatusCode::OK, Json(page)))
}

/// Item stage endpoint (POST /addons/{addon_id}/item)
///
/// Returns the item, or JSON `null` when the identity is unknown: not
/// found is a valid outcome, not an error.
pub async fn addon_item(
    State(state): State<AppState>,
    Path(addon_id): Path<String>,
    headers: HeaderMap,
    body: axum::body::Body,
) -> Result<impl IntoResponse, ApiError> {
    let runtime = lookup_addon(&state, &addon_id)?;
    let identity: MediaIdentity = read_json_body(&state, &headers, body).await?;
    validation::validate_identity(&identity)
        .map_err(|err| ApiError::InvalidPayload(err.to_string()))?;

    state.metrics.stage_dispatched();
    let response = runtime
        .addon
        .dispatch(StageRequest::Item(identity), state.request_context())
        .await?;

    let StageResponse::Item(item) = response else {
        return Err(ApiError::Internal("stage response mismatch".into()));
    };
    Ok((StatusCode::OK, Json(item)))
}

/// Source stage endpoint (POST /addons/{addon_id}/source)
///
/// Returns the sources the addon found for the identity; an empty array
/// means none.
pub async fn addon_source(
    State(state): State<AppState>,
    Path(addon_id): Path<String>,
    headers: HeaderMap,
    body: axum::body::Body,
) -> Result<impl IntoResponse, ApiError> {
    let runtime = lookup_addon(&state, &addon_id)?;
    let identity: MediaIdentity = read_json_body(&state, &headers, body).await?;
    validation::validate_identity(&identity)
        .map_err(|err| ApiError::InvalidPayload(err.to_string()))?;

    state.metrics.stage_dispatched();
    let response = runtime
        .addon
        .dispatch(StageRequest::Source(identity), state.request_context())
        .await?;

    let StageResponse::Sources(sources) = response else {
        return Err(ApiError::Internal("stage response mismatch".into()));
    };
    Ok((StatusCode::OK, Json(sources)))
}

/// Resolution endpoint (POST /addons/{addon_id}/resolve)
///
/// Drives one source through the addon's resolver chains to a terminal
/// outcome. A source whose URL matches no resolver comes back as a
/// `direct` outcome.
pub async fn addon_resolve(
    State(state): State<AppState>,
    Path(addon_id): Path<String>,
    headers: HeaderMap,
    body: axum::body::Body,
) -> Result<impl IntoResponse, ApiError> {
    let runtime = lookup_addon(&state, &addon_id)?;
    let request: ResolveBody = read_json_body(&state, &headers, body).await?;
    validation::validate_source(&request.source)
        .map_err(|err| ApiError::InvalidPayload(err.to_string()))?;

    let policy = ResolvePolicy {
        trust_direct: request.trust_direct,
    };
    let ctx = state.request_context();
    let resolution = runtime
        .engine
        .resolve_with(&request.source, policy, &ctx)
        .await
        .inspect_err(|_| state.metrics.resolve_failed())?;

    state.metrics.source_resolved();
    Ok((StatusCode::OK, Json(ResolveResponse::from(resolution))))
}

/// Full pipeline endpoint (POST /addons/{addon_id}/streams)
///
/// Runs the source stage for the identity, then resolves every returned
/// source concurrently. Per-source failures are reported in place; they
/// do not fail the sibling sources or the request.
pub async fn addon_streams(
    State(state): State<AppState>,
    Path(addon_id): Path<String>,
    headers: HeaderMap,
    body: axum::body::Body,
) -> Result<impl IntoResponse, ApiError> {
    let runtime = lookup_addon(&state, &addon_id)?;
    let identity: MediaIdentity = read_json_body(&state, &headers, body).await?;
    validation::validate_identity(&identity)
        .map_err(|err| ApiError::InvalidPayload(err.to_string()))?;

    let ctx = state.request_context();
    state.metrics.stage_dispatched();
    let response = runtime
        .addon
        .dispatch(StageRequest::Source(identity), ctx.clone())
        .await?;
    let StageResponse::Sources(sources) = response else {
        return Err(ApiError::Internal("stage response mismatch".into()));
    };

    info!(
        addon = %addon_id,
        sources = sources.len(),
        request_id = %ctx.request_id(),
        "Resolving sources"
    );

    let results = runtime
        .engine
        .resolve_all(sources, &ctx)
        .await
        .into_iter()
        .map(|(source, outcome)| {
            match &outcome {
                Ok(_) => state.metrics.source_resolved(),
                Err(_) => state.metrics.resolve_failed(),
            }
            SourceOutcome::new(source, outcome)
        })
        .collect();

    Ok((StatusCode::OK, Json(StreamsResponse { results })))
}

/// Addon listing endpoint (GET /addons)
pub async fn list_addons(State(state): State<AppState>) -> impl IntoResponse {
    let addons = state
        .addons()
        .map(|runtime| AddonSummary {
            manifest: runtime.addon.manifest().clone(),
            stages: runtime.addon.actions().stages(),
            resolve_handlers: runtime.addon.resolvers().len(),
        })
        .collect();

    (StatusCode::OK, Json(AddonsResponse { addons }))
}

/// Manifest endpoint (GET /addons/{addon_id}/manifest)
pub async fn get_manifest(
    State(state): State<AppState>,
    Path(addon_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let runtime = lookup_addon(&state, &addon_id)?;
    Ok((StatusCode::OK, Json(runtime.addon.manifest().clone())))
}

/// Health check endpoint (GET /health)
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let response = HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        started_at: state.started_at,
        addons: state.addon_count(),
    };

    (StatusCode::OK, Json(response))
}

fn lookup_addon(state: &AppState, addon_id: &str) -> Result<AddonRuntime, ApiError> {
    state
        .addon(addon_id)
        .cloned()
        .ok_or_else(|| ApiError::UnknownAddon(addon_id.to_string()))
}

/// Reads and deserializes a JSON request body.
///
/// Decompression is handled by the RequestDecompressionLayer middleware,
/// so the bytes here are already plain JSON.
async fn read_json_body<T: DeserializeOwned>(
    state: &AppState,
    headers: &HeaderMap,
    body: axum::body::Body,
) -> Result<T, ApiError> {
    let content_type = headers
        .get(axum::http::header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| ApiError::InvalidPayload("missing Content-Type header".into()))?;
    super::utils::parse_content_type(content_type)?;

    let data = body
        .collect()
        .await
        .map_err(|err| ApiError::Internal(err.to_string()))?
        .to_bytes();
    super::utils::validate_body_size(&data, state.config.server.api.max_payload_bytes)?;

    Ok(serde_json::from_slice(&data)?)
}
