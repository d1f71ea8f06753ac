//! List command implementation

use anyhow::Result;
use colored::Colorize;
use dm_driver::MacroSolution;
use dm_log::TracingLogCollector;
use dm_macro::Macro;
use serde::Serialize;
use std::path::Path;

/// A macro as printed by `list --format json`
#[derive(Serialize)]
struct MacroReport<'a> {
    folder: &'a str,
    #[serde(flatten)]
    details: &'a Macro,
}

pub fn list(path: &Path, format: &str) -> Result<()> {
    let solution = crate::solution::load(path, &TracingLogCollector)?;

    match format {
        "json" => {
            let reports: Vec<MacroReport<'_>> = solution
                .macros()
                .map(|(details, folder)| MacroReport {
                    folder: &folder.name,
                    details,
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&reports)?);
        }
        "text" => print_table(&solution),
        _ => anyhow::bail!("Unknown format: {format} (expected text or json)"),
    }

    Ok(())
}

fn print_table(solution: &MacroSolution) {
    println!(
        "{} {}",
        "Solution:".green().bold(),
        solution.solution_path().display()
    );
    println!(
        "  {} {} projects, {} macros",
        "Found:".bold(),
        solution.projects().len(),
        solution.macros().len()
    );

    if solution.macros().len() == 0 {
        println!("\n{} No macros found", "Info:".cyan().bold());
        return;
    }

    println!();
    println!(
        "{:<20} {:<30} {:<20} {:>6}  {}",
        "Folder", "Description", "Author", "Lines", "DLL imports"
    );
    println!("{}", "-".repeat(100));

    for (details, folder) in solution.macros() {
        let lines = details
            .code()
            .map_or_else(|| "-".to_string(), |code| code.lines().len().to_string());
        println!(
            "{:<20} {:<30} {:<20} {:>6}  {}",
            folder.name,
            details.description().unwrap_or("-"),
            details.author().unwrap_or("-"),
            lines,
            details.dll_imports().join(", ")
        );
    }
}
