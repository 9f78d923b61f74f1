pub mod box_queries;
pub mod dashboard_queries;
pub mod export_queries;
pub mod log_queries;
pub mod verify_queries;
