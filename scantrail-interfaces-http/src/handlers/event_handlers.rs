use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use tracing::error;

use scantrail_application::commands::{ingest_commands, removal_commands};
use scantrail_application::queries::verify_queries;
use scantrail_application::AppState;
use scantrail_domain::{
    BatchResponse, BulkRemoveRequest, RemoveItemRequest, RemoveResponse, VerifyRequest,
    VerifyResponse,
};

use crate::error::HttpError;
use crate::middleware::{authorize, parse_batch};

pub async fn ingest_batch(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: axum::body::Bytes,
) -> Result<Json<BatchResponse>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let request = parse_batch(&headers, &body).map_err(|err| {
        error!("failed to parse ingest body: {}", err);
        HttpError::BadRequest(err.to_string())
    })?;
    let response = ingest_commands::process_batch(&state, request).await?;
    Ok(Json(response))
}

pub async fn verify_uuids(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<VerifyRequest>,
) -> Result<Json<VerifyResponse>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let response = verify_queries::verify_present(&state, request).await?;
    Ok(Json(response))
}

pub async fn remove_item(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<RemoveItemRequest>,
) -> Result<Json<RemoveResponse>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let response = removal_commands::remove_item(&state, request).await?;
    Ok(Json(response))
}

pub async fn bulk_remove(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<BulkRemoveRequest>,
) -> Result<Json<RemoveResponse>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let response = removal_commands::bulk_remove(&state, request).await?;
    Ok(Json(response))
}
