use std::path::PathBuf;

use clap::Parser;
use eyre::{Report, WrapErr};
use validator::Validate;

use fruitline::logging::setup_logging;
use fruitline::models::dtos::IncomingDeposit;
use fruitline::services::reconciliation_service::ReconciliationService;
use fruitline::utility::db_pool::{create_db_pool, run_migrations};
use fruitline::utility::tasks::load_env;

/// Offline reconciliation runner. Feeds a bank CSV export straight into
/// the same engine the HTTP endpoint uses, so an operator can replay a
/// day's file without the API server running.
#[derive(Parser)]
#[command(
    name = "deposit-sync",
    about = "Reconcile a bank CSV export against member deposit balances."
)]
struct Cli {
    /// Path to the bank CSV export (columns: bkcode,bkjukyo,bkinput,bkoutput)
    file: PathBuf,

    /// SQLite database path
    #[arg(long, env = "DATABASE_URL", default_value = "fruitline.db")]
    database_url: String,
}

fn main() -> Result<(), Report> {
    load_env();
    setup_logging();

    let cli = Cli::parse();

    let rows = read_rows(&cli.file)
        .wrap_err_with(|| format!("Failed to read bank rows from {}", cli.file.display()))?;
    if rows.is_empty() {
        println!("No rows in {}, nothing to do.", cli.file.display());
        return Ok(());
    }
    for row in &rows {
        row.validate()
            .wrap_err_with(|| format!("Rejected bank row (bkcode: {})", row.bkcode))?;
    }

    let pool = create_db_pool(&cli.database_url)?;
    run_migrations(&pool)?;

    let mut conn = pool.get()?;
    let summary = ReconciliationService::process_batch(&mut conn, &rows)?;

    println!(
        "Processed {} rows: {} credited, {} duplicate-name, {} unmatched, {} already seen.",
        summary.processed,
        summary.credited,
        summary.duplicates,
        summary.unmatched,
        summary.skipped
    );

    Ok(())
}

fn read_rows(path: &PathBuf) -> Result<Vec<IncomingDeposit>, Report> {
    let file = std::fs::File::open(path)?;
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(std::io::BufReader::new(file));

    let mut rows = Vec::new();
    for result in rdr.deserialize() {
        let row: IncomingDeposit = result?;
        rows.push(row);
    }
    Ok(rows)
}
