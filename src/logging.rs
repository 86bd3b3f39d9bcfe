use std::env;
use std::io::{stdout, IsTerminal};
use tracing_subscriber::EnvFilter;

/// Terminal sessions get ANSI pretty logs; anything else (containers,
/// the systemd unit) gets JSON lines for the log shipper.
pub fn setup_logging() {
    let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_thread_ids(true);

    if IsTerminal::is_terminal(&stdout()) {
        builder.with_ansi(true).init();
    } else {
        builder.json().with_ansi(false).init();
    }

    tracing::info!(%log_level, "Logging initialized");
}
