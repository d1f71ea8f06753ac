//! Show command implementation

use anyhow::Result;
use colored::Colorize;
use dm_log::TracingLogCollector;
use std::path::Path;

pub fn show(path: &Path, description: &str) -> Result<()> {
    let solution = crate::solution::load(path, &TracingLogCollector)?;

    let Some((details, folder)) = solution.find_by_description(description) else {
        anyhow::bail!("No macro with description '{description}' in {}", path.display());
    };

    println!("{} {} ({})", "Macro:".green().bold(), description, folder.name);
    if let Some(author) = details.author() {
        println!("  {} {}", "Author:".bold(), author);
    }
    for import in details.dll_imports() {
        println!("  {} {}", "DllImport:".bold(), import);
    }

    match details.code() {
        Some(code) => {
            println!();
            for (number, line) in code.lines().iter().enumerate() {
                println!("{:>4} | {}", number + 1, line);
            }
        }
        None => println!("\n{} Macro has no code block", "Info:".cyan().bold()),
    }

    Ok(())
}
