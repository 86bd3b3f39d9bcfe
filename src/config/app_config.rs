use eyre::Report;
use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,

    /// Seconds between `heartbeat` broadcasts on the event stream.
    pub heartbeat_interval_secs: u64,

    /// Bound of each subscriber's event queue; a subscriber that falls
    /// this far behind is dropped rather than buffered further.
    pub event_queue_capacity: usize,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, Report> {
        Ok(Self {
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "fruitline.db".into()),

            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),

            port: env::var("PORT").unwrap_or_else(|_| "8080".into()).parse()?,

            heartbeat_interval_secs: env::var("HEARTBEAT_INTERVAL_SECS")
                .unwrap_or_else(|_| "25".into())
                .parse()?,

            event_queue_capacity: env::var("EVENT_QUEUE_CAPACITY")
                .unwrap_or_else(|_| "32".into())
                .parse()?,
        })
    }
}
