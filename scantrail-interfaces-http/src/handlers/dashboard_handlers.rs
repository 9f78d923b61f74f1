use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::Json;

use scantrail_application::queries::{box_queries, dashboard_queries, log_queries};
use scantrail_application::AppState;
use scantrail_domain::{
    BoxesStateResponse, DashboardQuery, DashboardStateResponse, RawLogQuery, RawLogsResponse,
};

use crate::error::HttpError;
use crate::middleware::authorize;

pub async fn dashboard_state(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<DashboardStateResponse>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let response = dashboard_queries::dashboard_state(&state, query).await?;
    Ok(Json(response))
}

pub async fn boxes_state(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<BoxesStateResponse>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let response = box_queries::boxes_state(&state, query).await?;
    Ok(Json(response))
}

pub async fn raw_logs(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<RawLogQuery>,
) -> Result<Json<RawLogsResponse>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let response = log_queries::raw_logs(&state, query).await?;
    Ok(Json(response))
}
