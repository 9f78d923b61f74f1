use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, HeaderValue};
use axum::response::{IntoResponse, Response};

use scantrail_application::queries::export_queries::{self, CsvExport};
use scantrail_application::AppState;
use scantrail_domain::ExportQuery;

use crate::error::HttpError;
use crate::middleware::authorize;

pub async fn export_csv(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ExportQuery>,
) -> Result<Response, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let export = export_queries::export_csv(&state, query).await?;
    Ok(csv_response(export))
}

pub async fn export_boxes_csv(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ExportQuery>,
) -> Result<Response, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let export = export_queries::export_boxes_csv(&state, query).await?;
    Ok(csv_response(export))
}

fn csv_response(export: CsvExport) -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/csv; charset=utf-8"),
    );
    let disposition = format!("attachment; filename=\"{}\"", export.filename);
    if let Ok(value) = HeaderValue::from_str(&disposition) {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }
    (headers, export.content).into_response()
}
