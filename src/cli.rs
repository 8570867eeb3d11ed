use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// pg-analyse - Run diagnostic inspections against a PostgreSQL database
#[derive(Parser, Debug)]
#[command(name = "pg-analyse")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run analysis
    Run {
        /// DSN to connect to PG
        #[arg(long, env = "PG_ANALYSE_DSN")]
        dsn: Option<String>,

        /// Format used for output
        #[arg(short, long)]
        fmt: Option<String>,

        /// Inspection alias to limit runs (repeatable)
        #[arg(long = "one")]
        one: Vec<String>,

        /// Use human friendly values formatting (e.g. sizes)
        #[arg(long)]
        human: bool,

        /// Arguments to pass to inspections. E.g.: "idx_bloat:schema=my,bloat_min=20;idx_unused:schema=my"
        #[arg(long, default_value = "")]
        args: String,

        /// Directory with SQL templates overriding the built-in ones
        #[arg(long)]
        sql_dir: Option<PathBuf>
    },

    /// List known inspections
    Inspections
}
