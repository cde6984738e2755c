/*
 * The platform-agnostic scanning core. It finds `@do:` / `@bookmark:` markers in a
 * workspace and keeps them in a per-file cache behind the `BookmarkIndex` facade.
 * File system and configuration access go through the `DirectoryListerOperations`,
 * `ContentReaderOperations` and `ConfigProviderOperations` traits so the index can
 * be exercised with mocks.
 */
pub mod bookmark_cache;
pub mod bookmark_index;
pub mod config;
pub mod directory_filter;
pub mod file_scanner;
pub mod file_system;
pub mod file_walker;
pub mod marker_pattern;
pub mod models;
pub mod outline;
pub mod path_utils;

pub use models::{BookmarkRecord, MarkerKind};

pub use bookmark_cache::BookmarkCache;
pub use bookmark_index::BookmarkIndex;

pub use config::{
    BookmarkSettings, ConfigError, ConfigProviderOperations, CoreConfigProvider, FolderMode,
    FolderScanConfig,
};

pub use file_system::{
    ContentReaderOperations, CoreContentReader, CoreDirectoryLister, DirectoryEntry,
    DirectoryListerOperations, FileSystemError,
};

pub use outline::{OutlineEntry, build_outline, render_text};
