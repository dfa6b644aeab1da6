//! Taskboard
//!
//! A minimal task-management web application: SQLite schema, JSON REST
//! API, and a single embedded client page, plus a destructive seed
//! subcommand for fixture data.

use anyhow::Result;
use clap::Parser;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Arc;
use taskboard::cli::{Cli, Command};
use taskboard::config::Config;
use taskboard::db::{seed, Database};
use taskboard::web;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on --log option
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    match cli.log.as_str() {
        "0" | "off" => {
            // No logging
        }
        "1" | "stdout" => {
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_writer(std::io::stdout)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        "2" | "stderr" => {
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_writer(std::io::stderr)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        filename => {
            // Log to file (append mode)
            let file = OpenOptions::new().create(true).append(true).open(filename)?;
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_writer(file)
                .with_ansi(false)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
    }

    let mut config = Config::load(cli.config.as_deref().map(Path::new))?;

    // Override config from CLI arguments
    if let Some(db_path) = &cli.database {
        config.server.db_path = db_path.into();
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            let db = Arc::new(Database::open(&config.server.db_path)?);
            info!(db_path = %config.server.db_path.display(), "Database opened");
            web::serve(db, &config.server.bind, config.server.port).await
        }
        Command::Seed => {
            let db = Database::open(&config.server.db_path)?;
            match seed::run(&db) {
                Ok(summary) => {
                    info!(
                        users = summary.users,
                        tags = summary.tags,
                        tasks = summary.tasks,
                        "Seeding complete"
                    );
                    Ok(())
                }
                Err(e) => {
                    error!(error = %e, "Seeding failed");
                    // The connection is released before exiting.
                    drop(db);
                    std::process::exit(2);
                }
            }
        }
    }
}
