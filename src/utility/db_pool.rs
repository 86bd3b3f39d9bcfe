use diesel::connection::SimpleConnection;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool};
use diesel::SqliteConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use eyre::Report;
use std::time::Duration;
use tracing::info;

use crate::models::app_state::DbPool;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// Applied to every pooled connection. WAL keeps readers unblocked
/// during the reconciliation writes; the busy timeout covers writer
/// handoff; foreign keys are off by default in SQLite.
#[derive(Debug)]
struct SqlitePragmas;

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for SqlitePragmas {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        conn.batch_execute(
            "PRAGMA journal_mode = WAL; \
             PRAGMA synchronous = NORMAL; \
             PRAGMA foreign_keys = ON; \
             PRAGMA busy_timeout = 5000;",
        )
        .map_err(diesel::r2d2::Error::QueryError)
    }
}

pub fn create_db_pool(database_url: &str) -> Result<DbPool, Report> {
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);

    let pool = Pool::builder()
        .max_size(8)
        .connection_timeout(Duration::from_secs(8))
        .connection_customizer(Box::new(SqlitePragmas))
        .test_on_check_out(true)
        .build(manager)?;

    info!("SQLite connection pool created (max_size: 8, WAL)");

    Ok(pool)
}

pub fn run_migrations(pool: &DbPool) -> Result<(), Report> {
    let mut conn = pool.get()?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| eyre::eyre!("Failed to run migrations: {}", e))?;
    info!("Database migrations applied");
    Ok(())
}
