use std::sync::Arc;

use anyhow::Result;
use clickhouse::Client;

use scantrail_application::{AppState, Metrics};
use scantrail_domain::ports::EventStore;
use scantrail_infrastructure::{AppConfig, ClickhouseEventStore};

pub struct AppContext {
    pub state: AppState,
}

impl AppContext {
    pub async fn new() -> Result<Self> {
        let config = AppConfig::load().await?;
        let runtime_config = config.to_runtime_config();
        let db_config = config.to_db_config();

        let mut clickhouse = Client::default()
            .with_url(&db_config.clickhouse_url)
            .with_database(&db_config.clickhouse_database);
        if let Some(user) = &db_config.clickhouse_user {
            clickhouse = clickhouse.with_user(user);
        }
        if let Some(password) = &db_config.clickhouse_password {
            clickhouse = clickhouse.with_password(password);
        }

        let event_store = Arc::new(ClickhouseEventStore::new(
            clickhouse,
            db_config.clickhouse_database.clone(),
        ));
        event_store.ensure_schema().await?;

        let state = AppState {
            config: runtime_config,
            event_store,
            metrics: Arc::new(Metrics::default()),
        };

        Ok(Self { state })
    }
}
