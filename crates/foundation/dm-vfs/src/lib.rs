//! Virtual File System for solution and macro files
//!
//! Provides an abstraction layer over the file system. Files can be backed by
//! the disk or by in-memory contents, which lets the loaders be exercised
//! without touching the real file system.

use anyhow::{Context, Result};
use rustc_hash::FxHashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// A unique identifier for a registered file
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq, PartialOrd, Ord)]
pub struct FileId(u32);

impl FileId {
    /// Creates a file ID from its raw index
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }
}

/// Virtual File System that tracks solution and macro files
pub struct VirtualFileSystem {
    inner: Arc<RwLock<VfsInner>>,
}

struct VfsInner {
    files: FxHashMap<FileId, FileData>,
    paths: FxHashMap<PathBuf, FileId>,
    next_id: u32,
}

/// Data associated with a file
#[derive(Clone, Debug)]
pub struct FileData {
    /// Path the file was registered under
    pub path: PathBuf,
    /// In-memory contents; when set they shadow the file on disk
    pub contents: Option<Vec<u8>>,
}

impl VirtualFileSystem {
    /// Creates a new empty virtual file system
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(VfsInner {
                files: FxHashMap::default(),
                paths: FxHashMap::default(),
                next_id: 0,
            })),
        }
    }

    /// Registers a file path and returns its ID
    ///
    /// # Errors
    ///
    /// Returns an error if the lock is poisoned
    pub fn register_file(&self, path: impl AsRef<Path>) -> Result<FileId> {
        let path = path.as_ref().to_path_buf();
        let mut inner = self
            .inner
            .write()
            .map_err(|_| anyhow::anyhow!("Lock poisoned"))?;

        if let Some(&file_id) = inner.paths.get(&path) {
            return Ok(file_id);
        }

        let file_id = FileId::new(inner.next_id);
        inner.next_id += 1;

        inner.files.insert(
            file_id,
            FileData {
                path: path.clone(),
                contents: None,
            },
        );
        inner.paths.insert(path, file_id);

        Ok(file_id)
    }

    /// Registers a file backed by in-memory contents
    ///
    /// # Errors
    ///
    /// Returns an error if the lock is poisoned
    pub fn add_file(&self, path: impl AsRef<Path>, contents: impl Into<Vec<u8>>) -> Result<FileId> {
        let file_id = self.register_file(path)?;
        self.set_file_contents(file_id, contents.into())?;
        Ok(file_id)
    }

    /// Loads the raw bytes of a file
    ///
    /// In-memory contents win; otherwise the file is read from disk on every
    /// call.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the lock is poisoned
    pub fn load_file(&self, file_id: FileId) -> Result<Vec<u8>> {
        let data = {
            let inner = self
                .inner
                .read()
                .map_err(|_| anyhow::anyhow!("Lock poisoned"))?;
            inner
                .files
                .get(&file_id)
                .ok_or_else(|| anyhow::anyhow!("File not found: {file_id:?}"))?
                .clone()
        };

        if let Some(contents) = data.contents {
            return Ok(contents);
        }

        fs::read(&data.path)
            .with_context(|| format!("Failed to read file: {}", data.path.display()))
    }

    /// Reads the raw bytes of a file by path, registering it first if needed
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the lock is poisoned
    pub fn read_bytes(&self, path: impl AsRef<Path>) -> Result<Vec<u8>> {
        let file_id = self.register_file(path)?;
        self.load_file(file_id)
    }

    /// Reads a UTF-8 text file by path, registering it first if needed
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid UTF-8, or
    /// the lock is poisoned
    pub fn read_to_string(&self, path: impl AsRef<Path>) -> Result<String> {
        let path = path.as_ref();
        let bytes = self.read_bytes(path)?;
        String::from_utf8(bytes)
            .with_context(|| format!("File is not valid UTF-8: {}", path.display()))
    }

    /// Checks whether a file exists, either in memory or on disk
    pub fn exists(&self, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        let in_memory = self.inner.read().is_ok_and(|inner| {
            inner
                .paths
                .get(path)
                .and_then(|file_id| inner.files.get(file_id))
                .is_some_and(|data| data.contents.is_some())
        });

        in_memory || path.is_file()
    }

    /// Sets file contents (useful for testing or in-memory files)
    ///
    /// # Errors
    ///
    /// Returns an error if the lock is poisoned or file doesn't exist
    pub fn set_file_contents(&self, file_id: FileId, contents: Vec<u8>) -> Result<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| anyhow::anyhow!("Lock poisoned"))?;
        let file_data = inner
            .files
            .get_mut(&file_id)
            .ok_or_else(|| anyhow::anyhow!("File not found: {file_id:?}"))?;
        file_data.contents = Some(contents);
        Ok(())
    }
}

impl Default for VirtualFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for VirtualFileSystem {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}
