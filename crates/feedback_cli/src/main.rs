//! Operator status check over the configured feedback store.
//!
//! # Responsibility
//! - Verify `feedback_core` linkage and database bootstrap.
//! - Print one page of entry summaries; message bodies are never printed.
//!
//! Configuration comes from `FEEDBACK_*` environment variables.

use clap::Parser;
use feedback_core::db::open_db;
use feedback_core::{
    core_version, init_logging, FeedbackConfig, FeedbackService, PageRequest,
    SqliteEntryRepository,
};
use log::info;
use std::error::Error;
use std::process::ExitCode;

/// Feedback store status check
#[derive(Parser, Debug)]
#[command(name = "feedback_cli")]
#[command(about = "Print feedback store status and one page of entry summaries")]
struct Args {
    /// Page of entry summaries to print (1-based)
    #[arg(default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
    page: u64,
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("feedback_cli status=error error={err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let config = FeedbackConfig::from_env()?;
    if let Some(log_dir) = &config.log_dir {
        init_logging(config.log_level, log_dir)?;
    }

    let conn = open_db(&config.db_path)?;
    let service = FeedbackService::new(SqliteEntryRepository::try_new(&conn)?);
    let listing = service.list(PageRequest {
        page: Some(args.page),
        per_page: None,
    })?;
    info!(
        "event=cli_list module=cli status=ok page={} rows={}",
        listing.page,
        listing.rows.len()
    );

    println!("feedback_core version={}", core_version());
    println!("db_path={}", config.db_path.display());
    println!(
        "entries total={} page={}/{} per_page={}",
        listing.total,
        listing.page,
        listing.page_count(),
        listing.per_page
    );
    for row in &listing.rows {
        println!(
            "{}\t{}\t{} {}\t<{}>\t{}",
            row.id, row.created_at, row.first_name, row.last_name, row.email, row.subject
        );
    }
    Ok(())
}
