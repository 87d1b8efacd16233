//! One-shot repair of `family_connections` display names.
//!
//! Takes no arguments. Store selection and dry-run come from the
//! environment (see `config::Settings`). Safe to rerun.

use std::process::ExitCode;

use mediguide_lib::config::{self, Settings, StoreBackend};
use mediguide_lib::db::open_existing_database;
use mediguide_lib::repair::{AuditReport, ConnectionAuditor, RepairError};
use mediguide_lib::supabase::SupabaseClient;

fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    mediguide_lib::init_tracing();

    tracing::info!("{} connection audit v{}", config::APP_NAME, config::APP_VERSION);
    tracing::warn!(
        "Corrected shape (sender_display_name NULL, receiver_display_name = sender's name) \
         is inferred from bug reports and still awaits product confirmation"
    );

    match run() {
        Ok(report) => {
            print_summary(&report);
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Connection audit aborted");
            ExitCode::FAILURE
        }
    }
}

#[derive(Debug, thiserror::Error)]
enum RunError {
    #[error(transparent)]
    Config(#[from] config::ConfigError),
    #[error(transparent)]
    Repair(#[from] RepairError),
}

fn run() -> Result<AuditReport, RunError> {
    let settings = Settings::from_env()?;

    let report = match settings.require_store()? {
        StoreBackend::Sqlite(path) => {
            tracing::info!(path = %path.display(), "Using SQLite store");
            let conn = open_existing_database(path).map_err(RepairError::from)?;
            ConnectionAuditor::new(&conn, &conn)
                .dry_run(settings.dry_run)
                .run()?
        }
        StoreBackend::Supabase { url, service_key } => {
            tracing::info!(url = %url, "Using Supabase store");
            let client = SupabaseClient::new(url, service_key, settings.http_timeout_secs)
                .map_err(RepairError::from)?;
            ConnectionAuditor::new(&client, &client)
                .dry_run(settings.dry_run)
                .run()?
        }
    };
    Ok(report)
}

fn print_summary(report: &AuditReport) {
    let verb = if report.dry_run { "would repair" } else { "repaired" };
    println!(
        "Checked {} connections: {} {verb}, {} already consistent, {} skipped.",
        report.total,
        report.repaired(),
        report.consistent(),
        report.skipped(),
    );
    for id in report.repaired_ids() {
        println!("  {verb}: {id}");
    }
}
