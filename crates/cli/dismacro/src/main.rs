//! DIS macro solution CLI
//!
//! Lists, shows and checks the macros of a DIS macro solution

#![allow(
    clippy::print_stdout,
    clippy::print_stderr,
    reason = "CLI tool needs to print to stdout/stderr"
)]

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod check;
mod list;
mod show;
mod solution;

#[derive(Parser)]
#[command(name = "dismacro")]
#[command(about = "DIS macro solution tools", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Print debug logging to stderr
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List the macros of a solution
    List {
        /// Path to the solution file or its directory
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Print the code of a macro
    Show {
        /// Description of the macro
        description: String,

        /// Path to the solution file or its directory
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Load every macro and report files that fail
    Check {
        /// Path to the solution file or its directory
        #[arg(default_value = ".")]
        path: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::List { path, format } => {
            list::list(&path, &format)?;
        }
        Commands::Show { description, path } => {
            show::show(&path, &description)?;
        }
        Commands::Check { path } => {
            check::check(&path)?;
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
