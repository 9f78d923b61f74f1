use std::sync::Arc;

use scantrail_domain::ports::EventStore;
use scantrail_domain::RuntimeConfig;

use crate::Metrics;

#[derive(Clone)]
pub struct AppState {
    pub config: RuntimeConfig,
    pub event_store: Arc<dyn EventStore>,
    pub metrics: Arc<Metrics>,
}
