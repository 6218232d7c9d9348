//! Handover CLI - record and export IT asset handovers from the terminal

mod cli;
mod commands;
mod error;

use clap::Parser;

use crate::cli::{Cli, Commands};
use crate::commands::add::run_add;
use crate::commands::common::resolve_db_path;
use crate::commands::delete::run_delete;
use crate::commands::export::run_export;
use crate::commands::import::run_import;
use crate::commands::list::run_list;
use crate::commands::print::run_print;
use crate::commands::show::run_show;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    let mut filter = tracing_subscriber::EnvFilter::from_default_env();
    for directive in ["handover=warn", "handover_core=warn"] {
        if let Ok(directive) = directive.parse() {
            filter = filter.add_directive(directive);
        }
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let db_path = resolve_db_path(cli.db_path);

    match cli.command {
        Commands::List { limit, query, json } => {
            run_list(limit, query.as_deref(), json, &db_path).await?;
        }
        Commands::Show { id, json } => run_show(&id, json, &db_path).await?,
        Commands::Add { file } => run_add(&file, &db_path).await?,
        Commands::Delete { id } => run_delete(&id, &db_path).await?,
        Commands::Export { output } => run_export(output.as_deref(), &db_path).await?,
        Commands::Import {
            path,
            allow_unsigned,
        } => run_import(&path, allow_unsigned, &db_path).await?,
        Commands::Print { id, output } => run_print(&id, output.as_deref(), &db_path).await?,
    }

    Ok(())
}
