pub mod app;
pub mod clients;
pub mod config;
pub mod error;
pub mod events;
pub mod handlers;
pub mod logging;
pub mod models;
pub mod observability;
pub mod repositories;
pub mod schema;
pub mod services;
pub mod utility;

pub use error::ApiError;
pub use models::AppState;

use crate::config::app_config::AppConfig;
use crate::logging::setup_logging;
use crate::utility::db_pool::{create_db_pool, run_migrations};
use crate::utility::server::serve;
use crate::utility::tasks::{build_router, load_env, spawn_background_tasks};
use eyre::Report;
use tracing::info;

pub async fn run() -> Result<(), Report> {
    // 1. load environment variables
    load_env();

    // 2. initialize logging first (so we can log everything else)
    setup_logging();

    info!("Starting Fruitline back office...");

    // 3. load configuration
    let config = AppConfig::from_env()?;

    // 4. create database connection pool
    let pool = create_db_pool(&config.database_url)?;

    // 5. apply embedded migrations
    run_migrations(&pool)?;

    // 6. build application state (owns the event broker)
    let state = AppState::new(pool, config);

    // 7. start background tasks
    spawn_background_tasks(state.clone());

    // 8. initialize metrics
    let (metric_layer, metric_handle) = observability::metrics::setup_metrics();

    // 9. build axum router
    let app = build_router(state.clone(), metric_layer, metric_handle)?;

    // 10. start HTTP server
    serve(app, &state.config).await?;

    info!("Fruitline back office shut down gracefully");
    Ok(())
}
