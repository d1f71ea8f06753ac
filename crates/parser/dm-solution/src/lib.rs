//! Visual Studio solution reader
//!
//! Reads a `.sln` file into its build projects and its tree of solution
//! folders. Solution folders are virtual: their files are the solution items
//! listed in the solution file, resolved against the solution directory.

pub mod error;
mod reader;

pub use error::SolutionError;

use dm_vfs::VirtualFileSystem;
use la_arena::{Arena, Idx};
use rustc_hash::FxHashMap;
use std::path::{Path, PathBuf};

/// Project type GUID used for solution folders
pub const SOLUTION_FOLDER_TYPE_GUID: &str = "2150E333-8FDC-42A3-9474-1A3956D46DE8";

/// Handle to a folder inside a [`Solution`]
pub type FolderId = Idx<SolutionFolder>;

/// A build project referenced by the solution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    /// Display name
    pub name: String,
    /// Path as written in the solution file
    pub relative_path: String,
    /// Path resolved against the solution directory
    pub absolute_path: PathBuf,
    /// Project GUID, braces included
    pub guid: String,
    /// Project type GUID, braces included
    pub type_guid: String,
}

/// A file listed as a solution item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolutionFile {
    /// Last path component
    pub file_name: String,
    /// Path as written in the solution file
    pub relative_path: String,
    /// Path resolved against the solution directory
    pub absolute_path: PathBuf,
}

impl SolutionFile {
    fn new(directory: &Path, relative_path: &str) -> Self {
        let absolute_path = resolve(directory, relative_path);
        let file_name = absolute_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            file_name,
            relative_path: relative_path.to_string(),
            absolute_path,
        }
    }

    /// Text after the last dot of the file name
    ///
    /// A name made only of an extension, such as `.xml`, has that extension.
    /// A name without a dot has none.
    pub fn extension(&self) -> Option<&str> {
        self.file_name
            .rsplit_once('.')
            .map(|(_, extension)| extension)
    }
}

/// A virtual folder in the solution tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolutionFolder {
    /// Folder name
    pub name: String,
    /// Folder GUID, braces included
    pub guid: String,
    /// Files directly inside this folder, in solution file order
    pub files: Vec<SolutionFile>,
    /// Direct sub folders, in solution file order
    pub children: Vec<FolderId>,
}

/// A loaded solution
#[derive(Debug, Clone)]
pub struct Solution {
    path: PathBuf,
    directory: PathBuf,
    projects: Vec<Project>,
    folders: Arena<SolutionFolder>,
    root_folders: Vec<FolderId>,
}

impl Solution {
    /// Loads a solution file
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist, cannot be read, or is
    /// not a well-formed solution file
    pub fn load(vfs: &VirtualFileSystem, path: impl AsRef<Path>) -> Result<Self, SolutionError> {
        let path = path.as_ref();
        if !vfs.exists(path) {
            return Err(SolutionError::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let source = vfs.read_to_string(path).map_err(|err| SolutionError::Io {
            path: path.to_path_buf(),
            message: format!("{err:#}"),
        })?;

        Self::parse(path, &source)
    }

    /// Parses solution file contents as if they were read from `path`
    ///
    /// # Errors
    ///
    /// Returns an error if the contents are not a well-formed solution file
    pub fn parse(path: impl AsRef<Path>, source: &str) -> Result<Self, SolutionError> {
        let path = path.as_ref().to_path_buf();
        let directory = path.parent().map(Path::to_path_buf).unwrap_or_default();
        let raw = reader::read_solution(source)?;

        let mut projects = Vec::new();
        let mut folders: Arena<SolutionFolder> = Arena::default();
        let mut by_guid: FxHashMap<String, FolderId> = FxHashMap::default();
        let mut order = Vec::new();

        for entry in raw.entries {
            if guid_key(&entry.type_guid) != SOLUTION_FOLDER_TYPE_GUID {
                projects.push(Project {
                    absolute_path: resolve(&directory, &entry.path),
                    name: entry.name,
                    relative_path: entry.path,
                    guid: entry.guid,
                    type_guid: entry.type_guid,
                });
                continue;
            }

            let files = entry
                .items
                .iter()
                .map(|item| SolutionFile::new(&directory, item))
                .collect();
            let key = guid_key(&entry.guid);
            let id = folders.alloc(SolutionFolder {
                name: entry.name,
                guid: entry.guid,
                files,
                children: Vec::new(),
            });
            by_guid.insert(key, id);
            order.push(id);
        }

        let parents: FxHashMap<String, String> = raw
            .nested
            .into_iter()
            .map(|(child, parent)| (guid_key(&child), guid_key(&parent)))
            .collect();

        // Folders nested under a project or an unknown GUID stay at the root
        let mut root_folders = Vec::new();
        for id in order {
            let parent = parents
                .get(&guid_key(&folders[id].guid))
                .and_then(|parent| by_guid.get(parent))
                .copied()
                .filter(|&parent| parent != id);

            match parent {
                Some(parent) => folders[parent].children.push(id),
                None => root_folders.push(id),
            }
        }

        Ok(Self {
            path,
            directory,
            projects,
            folders,
            root_folders,
        })
    }

    /// Path of the solution file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory containing the solution file
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Build projects in solution file order
    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    /// Folders directly under the solution root
    pub fn root_folders(&self) -> &[FolderId] {
        &self.root_folders
    }

    /// Looks up a folder by handle
    pub fn folder(&self, id: FolderId) -> &SolutionFolder {
        &self.folders[id]
    }

    /// Folder directly under the solution root with exactly this name
    pub fn sub_folder(&self, name: &str) -> Option<FolderId> {
        self.root_folders
            .iter()
            .copied()
            .find(|&id| self.folders[id].name == name)
    }

    /// Direct sub folder of `parent` with exactly this name
    pub fn child_folder(&self, parent: FolderId, name: &str) -> Option<FolderId> {
        self.folders[parent]
            .children
            .iter()
            .copied()
            .find(|&id| self.folders[id].name == name)
    }

    /// Every folder below `id` at any depth, `id` excluded
    ///
    /// Folders are listed depth first, each parent before its children.
    pub fn descendant_folders(&self, id: FolderId) -> Vec<FolderId> {
        let mut descendants = Vec::new();
        let mut stack: Vec<FolderId> = self.folders[id].children.iter().rev().copied().collect();

        while let Some(next) = stack.pop() {
            descendants.push(next);
            stack.extend(self.folders[next].children.iter().rev().copied());
        }

        descendants
    }
}

/// Upper-cased GUID without braces
fn guid_key(guid: &str) -> String {
    guid.trim()
        .trim_start_matches('{')
        .trim_end_matches('}')
        .to_ascii_uppercase()
}

/// Resolves a backslash or slash separated path against `directory`
fn resolve(directory: &Path, relative_path: &str) -> PathBuf {
    relative_path
        .split(['\\', '/'])
        .filter(|component| !component.is_empty())
        .fold(directory.to_path_buf(), |path, component| path.join(component))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOLUTION: &str = r#"
Microsoft Visual Studio Solution File, Format Version 12.00
# Visual Studio Version 17
VisualStudioVersion = 17.5.33424.131
Project("{2150E333-8FDC-42A3-9474-1A3956D46DE8}") = "Macros", "Macros", "{10000000-0000-0000-0000-000000000000}"
	ProjectSection(SolutionItems) = preProject
		Macros\Readme.xml = Macros\Readme.xml
	EndProjectSection
EndProject
Project("{2150E333-8FDC-42A3-9474-1A3956D46DE8}") = "Group", "Group", "{20000000-0000-0000-0000-000000000000}"
EndProject
Project("{2150E333-8FDC-42A3-9474-1A3956D46DE8}") = "Nested", "Nested", "{30000000-0000-0000-0000-000000000000}"
	ProjectSection(SolutionItems) = preProject
		Macros\Group\Nested\Deep.xml = Macros\Group\Nested\Deep.xml
	EndProjectSection
EndProject
Project("{2150E333-8FDC-42A3-9474-1A3956D46DE8}") = "Second", "Second", "{40000000-0000-0000-0000-000000000000}"
EndProject
Project("{9A19103F-16F7-4668-BE54-9A1E7A4F7556}") = "Script_2", "Script_2\Script_2.csproj", "{50000000-0000-0000-0000-000000000000}"
EndProject
Project("{2150E333-8FDC-42A3-9474-1A3956D46DE8}") = "Orphan", "Orphan", "{60000000-0000-0000-0000-000000000000}"
EndProject
Global
	GlobalSection(NestedProjects) = preSolution
		{20000000-0000-0000-0000-000000000000} = {10000000-0000-0000-0000-000000000000}
		{30000000-0000-0000-0000-000000000000} = {20000000-0000-0000-0000-000000000000}
		{40000000-0000-0000-0000-000000000000} = {10000000-0000-0000-0000-000000000000}
		{60000000-0000-0000-0000-000000000000} = {50000000-0000-0000-0000-000000000000}
	EndGlobalSection
EndGlobal
"#;

    fn names(solution: &Solution, ids: &[FolderId]) -> Vec<String> {
        ids.iter()
            .map(|&id| solution.folder(id).name.clone())
            .collect()
    }

    #[test]
    fn test_builds_folder_tree() {
        let solution = Solution::parse("/solutions/One/DisMacro.sln", SOLUTION).unwrap();

        assert_eq!(solution.directory(), Path::new("/solutions/One"));
        assert_eq!(names(&solution, solution.root_folders()), vec!["Macros", "Orphan"]);

        let macros = solution.sub_folder("Macros").unwrap();
        assert_eq!(
            names(&solution, &solution.descendant_folders(macros)),
            vec!["Group", "Nested", "Second"]
        );
        assert!(solution.sub_folder("macros").is_none());
        assert!(solution.sub_folder("Group").is_none());

        let group = solution.child_folder(macros, "Group").unwrap();
        let nested = solution.child_folder(group, "Nested").unwrap();
        assert!(solution.descendant_folders(nested).is_empty());
    }

    #[test]
    fn test_resolves_solution_items() {
        let solution = Solution::parse("/solutions/One/DisMacro.sln", SOLUTION).unwrap();
        let macros = solution.sub_folder("Macros").unwrap();
        let group = solution.child_folder(macros, "Group").unwrap();
        let nested = solution.child_folder(group, "Nested").unwrap();

        let file = &solution.folder(nested).files[0];
        assert_eq!(file.file_name, "Deep.xml");
        assert_eq!(file.extension(), Some("xml"));
        assert_eq!(
            file.absolute_path,
            Path::new("/solutions/One")
                .join("Macros")
                .join("Group")
                .join("Nested")
                .join("Deep.xml")
        );
    }

    #[test]
    fn test_extension_of_dot_names() {
        let directory = Path::new("/solutions/One");
        let extension = |name: &str| SolutionFile::new(directory, name).extension().map(str::to_string);

        assert_eq!(extension(r"Macros\.xml").as_deref(), Some("xml"));
        assert_eq!(extension(r"Macros\Macro.backup.XML").as_deref(), Some("XML"));
        assert_eq!(extension(r"Macros\notes.").as_deref(), Some(""));
        assert_eq!(extension(r"Macros\README").as_deref(), None);
    }

    #[test]
    fn test_separates_projects() {
        let solution = Solution::parse("/solutions/One/DisMacro.sln", SOLUTION).unwrap();

        assert_eq!(solution.projects().len(), 1);
        let project = &solution.projects()[0];
        assert_eq!(project.name, "Script_2");
        assert_eq!(
            project.absolute_path,
            Path::new("/solutions/One").join("Script_2").join("Script_2.csproj")
        );
    }

    #[test]
    fn test_load_reports_missing_file() {
        let vfs = VirtualFileSystem::new();
        let error = Solution::load(&vfs, "/nowhere/Missing.sln").unwrap_err();
        assert_eq!(
            error,
            SolutionError::FileNotFound {
                path: PathBuf::from("/nowhere/Missing.sln")
            }
        );
    }

    #[test]
    fn test_load_reads_through_vfs() {
        let vfs = VirtualFileSystem::new();
        vfs.add_file("/virtual/DisMacro.sln", SOLUTION).unwrap();

        let solution = Solution::load(&vfs, "/virtual/DisMacro.sln").unwrap();
        assert_eq!(solution.path(), Path::new("/virtual/DisMacro.sln"));
        assert!(solution.sub_folder("Macros").is_some());
    }
}
