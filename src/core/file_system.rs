use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/*
 * This module is the scanning core's only contact with the file system. It defines
 * the errors of listing and reading, the `DirectoryListerOperations` and
 * `ContentReaderOperations` traits that the walker and scanner are written
 * against, and the concrete `CoreDirectoryLister` / `CoreContentReader`.
 * Tests substitute their own implementations to simulate unreadable files or
 * directories that vanish mid-walk.
 */

#[derive(Debug)]
pub enum FileSystemError {
    Io(io::Error),
    Walk(walkdir::Error),
    InvalidPath(PathBuf),
}

impl From<io::Error> for FileSystemError {
    fn from(err: io::Error) -> Self {
        FileSystemError::Io(err)
    }
}

impl From<walkdir::Error> for FileSystemError {
    fn from(err: walkdir::Error) -> Self {
        FileSystemError::Walk(err)
    }
}

impl std::fmt::Display for FileSystemError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileSystemError::Io(e) => write!(f, "I/O error: {e}"),
            FileSystemError::Walk(e) => write!(f, "Directory traversal error: {e}"),
            FileSystemError::InvalidPath(p) => write!(f, "Invalid path: {p:?}"),
        }
    }
}

impl std::error::Error for FileSystemError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FileSystemError::Io(e) => Some(e),
            FileSystemError::Walk(e) => Some(e),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, FileSystemError>;

/*
 * One entry of a directory listing. Symbolic links are reported with both
 * `is_dir` and `is_file` false, so the walker neither follows nor scans them.
 */
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub name: String,
    pub path: PathBuf,
    pub is_dir: bool,
    pub is_file: bool,
}

pub trait DirectoryListerOperations: Send + Sync {
    /*
     * Lists the immediate children of `dir_path`. An error means the directory
     * as a whole could not be read; callers treat it as contributing nothing.
     */
    fn list_directory(&self, dir_path: &Path) -> Result<Vec<DirectoryEntry>>;
}

pub trait ContentReaderOperations: Send + Sync {
    fn read_to_string(&self, file_path: &Path) -> Result<String>;
}

/*
 * Lists one directory level with `walkdir`, sorted by file name so traversal
 * order does not depend on the platform's readdir order.
 */
pub struct CoreDirectoryLister {}

impl CoreDirectoryLister {
    pub fn new() -> Self {
        CoreDirectoryLister {}
    }
}

impl Default for CoreDirectoryLister {
    fn default() -> Self {
        Self::new()
    }
}

impl DirectoryListerOperations for CoreDirectoryLister {
    fn list_directory(&self, dir_path: &Path) -> Result<Vec<DirectoryEntry>> {
        let mut entries = Vec::new();
        let walker = WalkDir::new(dir_path)
            .min_depth(1)
            .max_depth(1)
            .follow_links(false)
            .sort_by_file_name();

        for entry_result in walker {
            let entry = match entry_result {
                Ok(entry) => entry,
                // Depth 0 is the directory itself: the whole listing failed.
                Err(e) if e.depth() == 0 => return Err(e.into()),
                Err(e) => {
                    log::warn!("DirectoryLister: Skipping unreadable entry in {dir_path:?}: {e}");
                    continue;
                }
            };
            let file_type = entry.file_type();
            entries.push(DirectoryEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                path: entry.path().to_path_buf(),
                is_dir: file_type.is_dir(),
                is_file: file_type.is_file(),
            });
        }
        Ok(entries)
    }
}

pub struct CoreContentReader {}

impl CoreContentReader {
    pub fn new() -> Self {
        CoreContentReader {}
    }
}

impl Default for CoreContentReader {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentReaderOperations for CoreContentReader {
    /*
     * Reads the whole file and decodes it as UTF-8, replacing invalid sequences
     * with U+FFFD. Legacy Latin-1 sources still yield their markers. Directories
     * and missing or unreadable paths are errors.
     */
    fn read_to_string(&self, file_path: &Path) -> Result<String> {
        if !file_path.is_file() {
            return Err(FileSystemError::InvalidPath(file_path.to_path_buf()));
        }
        let bytes = fs::read(file_path)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}
