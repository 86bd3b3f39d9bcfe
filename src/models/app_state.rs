use diesel::r2d2::{self, ConnectionManager};
use diesel::SqliteConnection;
use std::sync::Arc;

use crate::config::app_config::AppConfig;
use crate::events::EventBroker;

pub type DbPool = r2d2::Pool<ConnectionManager<SqliteConnection>>;

#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub config: AppConfig,
    pub events: Arc<EventBroker>,
}

impl AppState {
    pub fn new(db: DbPool, config: AppConfig) -> Arc<Self> {
        let events = Arc::new(EventBroker::new(config.event_queue_capacity));
        Arc::new(Self { db, config, events })
    }
}
