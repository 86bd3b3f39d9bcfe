use axum::Router;
use axum_prometheus::metrics_exporter_prometheus::PrometheusHandle;
use axum_prometheus::PrometheusMetricLayer;
use diesel_migrations::MigrationHarness;
use fruitline::config::app_config::AppConfig;
use fruitline::models::app_state::DbPool;
use fruitline::models::AppState;
use fruitline::utility::db_pool::{create_db_pool, MIGRATIONS};
use std::sync::{Arc, OnceLock};
use tempfile::TempDir;

pub mod fixtures;

/// Create a migrated test database pool on a throwaway SQLite file.
/// Keep the returned TempDir guard alive for the duration of the test;
/// the database is deleted when it drops.
#[allow(dead_code)]
pub fn create_test_db_pool() -> (DbPool, TempDir) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let pool = build_pool(&dir);
    (pool, dir)
}

fn build_pool(dir: &TempDir) -> DbPool {
    let db_path = dir.path().join("fruitline_test.db");
    let pool = create_db_pool(db_path.to_str().expect("temp db path is not UTF-8"))
        .expect("Failed to create test database pool");

    let mut conn = pool
        .get()
        .expect("Failed to get DB connection for migrations");
    conn.run_pending_migrations(MIGRATIONS)
        .expect("Failed to run migrations");

    pool
}

/// Create a test AppState backed by its own database file. Heartbeats
/// run every second so event-stream tests see them without waiting.
#[allow(dead_code)]
pub fn create_test_app_state() -> (Arc<AppState>, TempDir) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let pool = build_pool(&dir);

    let config = AppConfig {
        database_url: dir.path().join("fruitline_test.db").display().to_string(),
        host: "127.0.0.1".to_string(),
        port: 0,
        heartbeat_interval_secs: 1,
        event_queue_capacity: 8,
    };

    (AppState::new(pool, config), dir)
}

/// Create a test application Router.
#[allow(dead_code)]
pub fn create_test_app(state: Arc<AppState>) -> Router {
    let (metric_layer, metric_handle) = test_metric_pair();
    fruitline::app::create_router(state, metric_layer, metric_handle)
}

// The prometheus recorder is process-global and installable only once,
// so every test router in the binary shares the first install's handle.
#[allow(dead_code)]
fn test_metric_pair() -> (PrometheusMetricLayer<'static>, PrometheusHandle) {
    static HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();
    let handle =
        HANDLE.get_or_init(|| fruitline::observability::metrics::setup_metrics().1);
    (PrometheusMetricLayer::new(), handle.clone())
}
