use axum::Router;

use scantrail_application::AppState;

use crate::handlers::{dashboard_handlers, event_handlers, export_handlers, ops_handlers};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/v1/events/batch",
            axum::routing::post(event_handlers::ingest_batch),
        )
        .route(
            "/v1/events/verify",
            axum::routing::post(event_handlers::verify_uuids),
        )
        .route(
            "/v1/events/remove",
            axum::routing::post(event_handlers::remove_item),
        )
        .route(
            "/v1/events/bulk-remove",
            axum::routing::post(event_handlers::bulk_remove),
        )
        .route(
            "/v1/dashboard/state",
            axum::routing::get(dashboard_handlers::dashboard_state),
        )
        .route(
            "/v1/dashboard/boxes",
            axum::routing::get(dashboard_handlers::boxes_state),
        )
        .route(
            "/v1/logs/raw",
            axum::routing::get(dashboard_handlers::raw_logs),
        )
        .route(
            "/v1/export/csv",
            axum::routing::get(export_handlers::export_csv),
        )
        .route(
            "/v1/export/boxes-csv",
            axum::routing::get(export_handlers::export_boxes_csv),
        )
        .route(
            "/v1/ops/health/live",
            axum::routing::get(ops_handlers::health_live),
        )
        .route(
            "/v1/ops/health/ready",
            axum::routing::get(ops_handlers::health_ready),
        )
        .route(
            "/v1/ops/metrics/prometheus",
            axum::routing::get(ops_handlers::metrics_prometheus),
        )
        .with_state(state)
}
