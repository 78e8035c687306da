// Inventory manager: products, suppliers, sales and low-stock alerts kept
// in a local SQLite file.

// Declare modules
pub mod cli;
pub mod commands;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod table;

use clap::Parser;
use std::process::ExitCode;

pub use config::Config;
pub use db::Database;
pub use error::{InventoryError, InventoryResult};

/// Parse arguments, set up logging and run the selected tab action
pub fn run() -> ExitCode {
    let cli = cli::Cli::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(cli::log_level(cli.verbose)),
    )
    .init();

    match cli::execute(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if let Some(notice) = err.downcast_ref::<commands::Notice>() {
                if cli.json {
                    match serde_json::to_string(notice) {
                        Ok(json) => eprintln!("{}", json),
                        Err(_) => eprintln!("{}", notice),
                    }
                } else {
                    eprintln!("{}", notice);
                }
            } else {
                eprintln!("Error: {:#}", err);
            }
            ExitCode::FAILURE
        }
    }
}
