use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "handover")]
#[command(about = "Record, list and export IT asset handovers")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Optional path to local database file
    #[arg(long, global = true, value_name = "PATH")]
    pub db_path: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List handovers, newest first
    #[command(alias = "ls")]
    List {
        /// Maximum number of handovers to show
        #[arg(short, long)]
        limit: Option<usize>,
        /// Only show handovers matching staff or device details
        #[arg(short, long)]
        query: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one handover
    Show {
        /// Handover ID
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Record a handover from a JSON payload file
    Add {
        /// Path to the handover payload (`-` reads stdin)
        #[arg(short, long, value_name = "PAYLOAD")]
        file: PathBuf,
    },
    /// Delete a handover
    Delete {
        /// Handover ID
        id: String,
    },
    /// Export every handover as CSV, one row per device
    Export {
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Import handovers from a CSV export
    Import {
        /// CSV file to import
        path: PathBuf,
        /// Accept rows without signatures (CSV files never carry them)
        #[arg(long)]
        allow_unsigned: bool,
    },
    /// Render the printable requisition for a handover
    Print {
        /// Handover ID
        id: String,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}
