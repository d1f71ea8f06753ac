//! Solution-level macro loading
//!
//! This crate ties the solution reader and the macro parser together: it
//! walks the `Macros` folder of a solution and collects every macro document
//! found below it, together with the folder that lists it.

use dm_log::LogCollector;
use dm_macro::Macro;
use dm_solution::{FolderId, Project, Solution, SolutionError, SolutionFile, SolutionFolder};
use dm_vfs::VirtualFileSystem;
use miette::Diagnostic;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the root solution folder holding the macros
pub const MACROS_FOLDER: &str = "Macros";

/// Extension of candidate macro files
pub const MACRO_EXTENSION: &str = "xml";

/// Fatal errors while loading a macro solution
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum LoadError {
    /// The solution file does not exist
    #[error("could not find solution file: {}", path.display())]
    #[diagnostic(code(dismacro::solution_not_found))]
    FileNotFound {
        /// Requested path
        path: PathBuf,
    },

    /// The solution file could not be read
    #[error(transparent)]
    #[diagnostic(transparent)]
    Solution(#[from] SolutionError),

    /// The solution has no `Macros` folder at its root
    #[error("could not find 'Macros' folder in root of solution {}", path.display())]
    #[diagnostic(
        code(dismacro::missing_macros_folder),
        help("add a solution folder named `Macros` at the top level of the solution")
    )]
    MissingMacrosFolder {
        /// Solution path
        path: PathBuf,
    },
}

/// A solution together with the macros found under its `Macros` folder
#[derive(Debug, Clone)]
pub struct MacroSolution {
    solution: Solution,
    macros: Vec<(Macro, FolderId)>,
}

impl MacroSolution {
    /// Loads a solution from disk
    ///
    /// # Errors
    ///
    /// See [`MacroSolution::load_in`]
    pub fn load(path: impl AsRef<Path>, log: &dyn LogCollector) -> Result<Self, LoadError> {
        Self::load_in(&VirtualFileSystem::new(), path, log)
    }

    /// Loads a solution through `vfs`
    ///
    /// Every file listed in a folder below `Macros` (at any depth, `Macros`
    /// itself excluded) is considered. Files without the `.xml` extension or
    /// that do not classify as a macro document are skipped. A file that
    /// classifies as a macro but fails to load is reported to `log` and
    /// skipped; it never aborts the load.
    ///
    /// # Errors
    ///
    /// Returns an error if the solution file is missing or malformed, or if
    /// it has no `Macros` folder at its root
    pub fn load_in(
        vfs: &VirtualFileSystem,
        path: impl AsRef<Path>,
        log: &dyn LogCollector,
    ) -> Result<Self, LoadError> {
        let path = path.as_ref();
        if !vfs.exists(path) {
            return Err(LoadError::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let solution = Solution::load(vfs, path)?;
        let macros_folder =
            solution
                .sub_folder(MACROS_FOLDER)
                .ok_or_else(|| LoadError::MissingMacrosFolder {
                    path: path.to_path_buf(),
                })?;

        let mut macros = Vec::new();
        for folder_id in solution.descendant_folders(macros_folder) {
            let folder = solution.folder(folder_id);
            log.report_status(&format!(
                "Loading macros from descendant folder: {}",
                folder.name
            ));

            for file in &folder.files {
                if !is_candidate(vfs, file, log) {
                    continue;
                }

                match Macro::load(vfs, &file.absolute_path) {
                    Ok(loaded) => macros.push((loaded, folder_id)),
                    Err(err) => log.report_error(&format!(
                        "failed to load macro {}: {}",
                        file.absolute_path.display(),
                        error_chain(&err)
                    )),
                }
            }
        }

        tracing::debug!(
            solution = %path.display(),
            count = macros.len(),
            "loaded macros"
        );

        Ok(Self { solution, macros })
    }

    /// Macros with the folder listing them, in folder walk order
    pub fn macros(&self) -> impl ExactSizeIterator<Item = (&Macro, &SolutionFolder)> {
        self.macros
            .iter()
            .map(|(loaded, folder)| (loaded, self.solution.folder(*folder)))
    }

    /// Macros with the handle of the folder listing them
    pub fn macro_entries(&self) -> &[(Macro, FolderId)] {
        &self.macros
    }

    /// First macro whose description matches exactly
    pub fn find_by_description(&self, description: &str) -> Option<(&Macro, &SolutionFolder)> {
        self.macros()
            .find(|(loaded, _)| loaded.description() == Some(description))
    }

    /// The underlying solution
    pub fn solution(&self) -> &Solution {
        &self.solution
    }

    /// Path of the solution file
    pub fn solution_path(&self) -> &Path {
        self.solution.path()
    }

    /// Directory containing the solution file
    pub fn solution_directory(&self) -> &Path {
        self.solution.directory()
    }

    /// Build projects of the solution
    pub fn projects(&self) -> &[Project] {
        self.solution.projects()
    }
}

fn is_candidate(vfs: &VirtualFileSystem, file: &SolutionFile, log: &dyn LogCollector) -> bool {
    let has_extension = file
        .extension()
        .is_some_and(|extension| extension.eq_ignore_ascii_case(MACRO_EXTENSION));
    if !has_extension {
        return false;
    }

    // A path the classifier rejects as an argument is just not a macro
    matches!(Macro::is_macro_file(vfs, &file.absolute_path, log), Ok(true))
}

fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
