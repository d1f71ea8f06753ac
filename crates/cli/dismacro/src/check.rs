//! Check command implementation

use anyhow::Result;
use colored::Colorize;
use dm_log::RecordingLogCollector;
use std::path::Path;

pub fn check(path: &Path) -> Result<()> {
    println!("{} solution at {}", "Checking".green().bold(), path.display());

    let log = RecordingLogCollector::new();
    let solution = crate::solution::load(path, &log)?;

    for status in log.statuses() {
        tracing::debug!("{status}");
    }

    println!("  {} {} macros", "Loaded:".bold(), solution.macros().len());

    let errors = log.errors();
    for error in &errors {
        eprintln!("    {} {}", "✗".red(), error);
    }

    println!();
    if errors.is_empty() {
        println!("{} No errors found", "Success:".green().bold());
        Ok(())
    } else {
        eprintln!("{} {} errors found", "Failed:".red().bold(), errors.len());
        anyhow::bail!("Check failed with {} errors", errors.len())
    }
}
