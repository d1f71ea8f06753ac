//! Solution lookup shared by the commands

use anyhow::{Context, Result};
use dm_driver::MacroSolution;
use dm_log::LogCollector;
use std::fs;
use std::path::{Path, PathBuf};

/// Loads the solution at `path`, or the single `.sln` inside it
pub fn load(path: &Path, log: &dyn LogCollector) -> Result<MacroSolution> {
    let solution_path = find_solution(path)?;
    let solution = MacroSolution::load(&solution_path, log)
        .with_context(|| format!("Failed to load solution {}", solution_path.display()))?;
    Ok(solution)
}

fn find_solution(path: &Path) -> Result<PathBuf> {
    if !path.is_dir() {
        return Ok(path.to_path_buf());
    }

    let mut candidates = Vec::new();
    for entry in fs::read_dir(path)
        .with_context(|| format!("Failed to read directory {}", path.display()))?
    {
        let candidate = entry?.path();
        if candidate.is_file() && candidate.extension().is_some_and(|ext| ext == "sln") {
            candidates.push(candidate);
        }
    }
    candidates.sort();

    match candidates.as_slice() {
        [] => anyhow::bail!("No solution file found in {}", path.display()),
        [single] => Ok(single.clone()),
        _ => anyhow::bail!(
            "Multiple solution files found in {}, pass one explicitly",
            path.display()
        ),
    }
}
