pub mod dashboard_handlers;
pub mod event_handlers;
pub mod export_handlers;
pub mod ops_handlers;

pub use dashboard_handlers::*;
pub use event_handlers::*;
pub use export_handlers::*;
pub use ops_handlers::*;
