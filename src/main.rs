//! # pg-analyse
//!
//! Diagnostic inspections for PostgreSQL databases.
//!
//! `pg-analyse` runs a catalog of known health inspections (index bloat,
//! unused indexes, missing keys, etc.) against a database and renders the
//! results for humans or machines. Every inspection is a parameterized SQL
//! template; parameters can be overridden per inspection from the command
//! line without touching the SQL.
//!
//! # Quick Start
//!
//! ```bash
//! # Run every inspection against the default schema
//! pg-analyse run --dsn "host=localhost user=postgres"
//!
//! # DSN from the environment
//! export PG_ANALYSE_DSN="host=localhost user=postgres"
//! pg-analyse run
//!
//! # Limit the run and override inspection arguments
//! pg-analyse run --one idx_bloat --one idx_unused \
//!     --args "idx_bloat:schema=my,bloat_min=20;idx_unused:schema=my"
//!
//! # Machine-readable output
//! pg-analyse run --fmt json > report.json
//!
//! # Human friendly sizes
//! pg-analyse run --human
//! ```
//!
//! # Inspections
//!
//! | Alias | Title |
//! |-------|-------|
//! | idx_bloat | Bloating indexes |
//! | idx_dub | Duplicated indexes |
//! | idx_fk | Foreign keys without indexes |
//! | idx_nulls | Indexes with NULLs |
//! | idx_intersect | Intersecting indexes |
//! | idx_invalid | Invalid indexes |
//! | idx_unused | Unused indexes |
//! | tbl_bloat | Bloating tables |
//! | tbl_noindex | Tables lacking indexes |
//! | tbl_nopk | Tables without Primary Key |
//!
//! `pg-analyse inspections` prints the list with descriptions and default
//! parameters.
//!
//! # Failure Model
//!
//! A failing inspection (missing template, SQL error, insufficient
//! privileges) never aborts the batch: its error text is shown in place of a
//! table and the run continues. Only a failure to connect is fatal.
//!
//! # Output Formats
//!
//! - `table` - titled per-inspection tables (default)
//! - `json` - array of per-inspection records
//! - `yaml` - one YAML document per inspection
//!
//! # Exit Codes
//!
//! - `0` - the batch completed (individual inspections may have failed)
//! - `1` - fatal error: bad configuration, unknown formatter, connection
//!   failure
//!
//! # Modules
//!
//! - [`analyser`] - run orchestration and the result model
//! - [`inspections`] - the inspection catalog
//! - [`binder`] - SQL template binding
//! - [`templates`] - SQL template resources
//! - [`formatters`] - output formatting
//! - [`args`] - inspection argument handling
//! - [`config`] - configuration loading
//! - [`cache`] - template text cache
//! - [`error`] - error types and constructors

mod analyser;
mod args;
mod binder;
mod cache;
mod cli;
mod config;
mod error;
mod formatters;
mod inspections;
mod templates;

use std::{process, time::Duration};

use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::main;

use crate::{
    analyser::Analyser,
    args::parse_args_string,
    cli::{Cli, Commands},
    config::Config,
    error::AppResult,
    formatters::{DEFAULT_FORMATTER, format_runs},
    inspections::Registry,
    templates::TemplateStore
};

#[main]
async fn main() {
    match run().await {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

async fn run() -> AppResult<i32> {
    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Run {
            dsn,
            fmt,
            one,
            human,
            args,
            sql_dir
        } => {
            let dsn = dsn.or(config.dsn).unwrap_or_default();
            let fmt = fmt
                .or(config.output.fmt)
                .unwrap_or_else(|| DEFAULT_FORMATTER.to_string());
            let human = human || config.output.human;
            let template_dir = sql_dir.or(config.templates.dir);

            // Resolve the formatter before opening a connection
            let formatter = formatters::by_alias(&fmt)?;

            let mut analyser = Analyser::new(dsn)?;
            if let Some(dir) = template_dir {
                analyser = analyser.with_templates(TemplateStore::with_dir(dir));
            }

            let overrides = parse_args_string(&args);

            let pb = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}")
            {
                pb.set_style(style);
            }
            pb.set_message("Running inspections...");
            pb.enable_steady_tick(Duration::from_millis(100));

            let outcome = analyser.run(&one, &overrides).await;

            pb.finish_and_clear();

            let runs = outcome?;
            println!("{}", format_runs(&*formatter, &runs, human));

            Ok(0)
        }
        Commands::Inspections => {
            list_inspections()?;
            Ok(0)
        }
    }
}

fn list_inspections() -> AppResult<()> {
    let registry = Registry::builtin()?;

    for definition in registry.all() {
        println!(
            "{}",
            format!("* {} [{}]", definition.title, definition.alias).blue()
        );
        println!("  {}", definition.description);
        println!();
        println!("  Parameters:");
        for (key, value) in &definition.default_params {
            println!("    {}: {}", key, value);
        }
        println!();
    }

    Ok(())
}
