//! Integration test utilities for DIS macro solutions

pub mod fixture;

use anyhow::Result;
use dm_driver::MacroSolution;
use std::fmt::Write;
use std::path::PathBuf;

/// Path of a checked-in solution under `test-solutions`
#[must_use]
pub fn test_solution(name: &str, file_name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("test-solutions")
        .join(name)
        .join(file_name)
}

/// Renders the loaded macros as stable text for snapshot assertions
///
/// # Errors
///
/// Returns an error if formatting fails
pub fn describe(solution: &MacroSolution) -> Result<String> {
    let mut out = String::new();
    for (details, folder) in solution.macros() {
        writeln!(out, "{}/", folder.name)?;
        writeln!(out, "  description: {:?}", details.description())?;
        writeln!(out, "  author: {:?}", details.author())?;
        match details.code() {
            Some(code) => {
                writeln!(out, "  code ({:?}):", code.source())?;
                for line in code.lines() {
                    writeln!(out, "    | {line}")?;
                }
            }
            None => writeln!(out, "  code: none")?,
        }
        writeln!(out, "  dll imports: {:?}", details.dll_imports())?;
    }
    Ok(out)
}
