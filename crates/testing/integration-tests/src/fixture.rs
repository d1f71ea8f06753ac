//! Solution fixtures written to a temporary directory.
//!
//! A [`SolutionFixture`] describes solution folders, the files listed in
//! them and build projects, and renders them as a real `.sln` file next to
//! the listed files.

use anyhow::{Context, Result};
use std::fmt::Write;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const FOLDER_TYPE: &str = "{2150E333-8FDC-42A3-9474-1A3956D46DE8}";
const CSHARP_TYPE: &str = "{9A19103F-16F7-4668-BE54-9A1E7A4F7556}";

/// Handle to a folder added to a [`SolutionFixture`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FolderRef(usize);

#[derive(Debug, Clone)]
struct FixtureFolder {
    name: String,
    guid: String,
    parent: Option<FolderRef>,
    items: Vec<String>,
}

#[derive(Debug, Clone)]
struct FixtureProject {
    name: String,
    path: String,
    guid: String,
}

/// A solution built up in memory and written out on demand
#[derive(Debug, Default)]
pub struct SolutionFixture {
    folders: Vec<FixtureFolder>,
    projects: Vec<FixtureProject>,
    /// Files to write, keyed by their backslash separated relative path
    files: Vec<(String, String)>,
    next_guid: u32,
}

/// A fixture written to disk; the directory is removed on drop
#[derive(Debug)]
pub struct WrittenSolution {
    /// Temporary directory holding the solution
    pub dir: TempDir,
    /// Path of the `.sln` file
    pub path: PathBuf,
}

impl SolutionFixture {
    /// Creates an empty fixture
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a solution folder under `parent`, or at the root
    pub fn folder(&mut self, name: &str, parent: Option<FolderRef>) -> FolderRef {
        let guid = self.guid();
        self.folders.push(FixtureFolder {
            name: name.to_string(),
            guid,
            parent,
            items: Vec::new(),
        });
        FolderRef(self.folders.len() - 1)
    }

    /// Lists a file in `folder` and writes `contents` to it
    pub fn file(&mut self, folder: FolderRef, relative_path: &str, contents: &str) -> &mut Self {
        self.files
            .push((relative_path.to_string(), contents.to_string()));
        self.listed(folder, relative_path)
    }

    /// Lists a file in `folder` without creating it
    pub fn listed(&mut self, folder: FolderRef, relative_path: &str) -> &mut Self {
        if let Some(entry) = self.folders.get_mut(folder.0) {
            entry.items.push(relative_path.to_string());
        }
        self
    }

    /// Adds a C# build project
    pub fn project(&mut self, name: &str, relative_path: &str) -> &mut Self {
        let guid = self.guid();
        self.projects.push(FixtureProject {
            name: name.to_string(),
            path: relative_path.to_string(),
            guid,
        });
        self
    }

    /// Renders the `.sln` text
    ///
    /// # Errors
    ///
    /// Returns an error if formatting fails
    pub fn render(&self) -> Result<String> {
        let mut out = String::new();
        writeln!(out, "Microsoft Visual Studio Solution File, Format Version 12.00")?;
        writeln!(out, "# Visual Studio Version 17")?;

        for folder in &self.folders {
            writeln!(
                out,
                "Project(\"{FOLDER_TYPE}\") = \"{}\", \"{}\", \"{}\"",
                folder.name, folder.name, folder.guid
            )?;
            if !folder.items.is_empty() {
                writeln!(out, "\tProjectSection(SolutionItems) = preProject")?;
                for item in &folder.items {
                    writeln!(out, "\t\t{item} = {item}")?;
                }
                writeln!(out, "\tEndProjectSection")?;
            }
            writeln!(out, "EndProject")?;
        }

        for project in &self.projects {
            writeln!(
                out,
                "Project(\"{CSHARP_TYPE}\") = \"{}\", \"{}\", \"{}\"",
                project.name, project.path, project.guid
            )?;
            writeln!(out, "EndProject")?;
        }

        writeln!(out, "Global")?;
        writeln!(out, "\tGlobalSection(NestedProjects) = preSolution")?;
        for folder in &self.folders {
            if let Some(parent) = folder.parent.and_then(|parent| self.folders.get(parent.0)) {
                writeln!(out, "\t\t{} = {}", folder.guid, parent.guid)?;
            }
        }
        writeln!(out, "\tEndGlobalSection")?;
        writeln!(out, "EndGlobal")?;

        Ok(out)
    }

    /// Writes the solution and its files into a new temporary directory
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or any file cannot be written
    pub fn write(&self, file_name: &str) -> Result<WrittenSolution> {
        let dir = tempfile::tempdir().context("Failed to create temporary directory")?;
        let path = dir.path().join(file_name);
        fs::write(&path, self.render()?)
            .with_context(|| format!("Failed to write {}", path.display()))?;

        for (relative_path, contents) in &self.files {
            let file_path = on_disk(dir.path(), relative_path);
            if let Some(parent) = file_path.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            fs::write(&file_path, contents)
                .with_context(|| format!("Failed to write {}", file_path.display()))?;
        }

        Ok(WrittenSolution { dir, path })
    }

    fn guid(&mut self) -> String {
        self.next_guid += 1;
        format!("{{00000000-0000-0000-0000-{:012}}}", self.next_guid)
    }
}

/// Path of a backslash separated solution item below `root`
#[must_use]
pub fn on_disk(root: &Path, relative_path: &str) -> PathBuf {
    relative_path
        .split('\\')
        .fold(root.to_path_buf(), |path, component| path.join(component))
}
