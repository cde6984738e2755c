/*
 * Bookmark scanning settings: which file suffixes to scan and which folders to
 * include or exclude. Settings are looked up on every traversal so edits take
 * effect without a restart.
 *
 * The lookup goes through the `ConfigProviderOperations` trait so the index can be
 * driven by a mock in tests. The concrete `CoreConfigProvider` reads JSON, first
 * from the project-local `.bookmarks/config.json`, then from the per-user
 * configuration directory, and finally falls back to built-in defaults.
 */
use crate::core::path_utils;
use serde::Deserialize;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

pub const PROJECT_CONFIG_DIR_NAME: &str = ".bookmarks";
pub const PROJECT_CONFIG_FILENAME: &str = "config.json";

pub const DEFAULT_EXTENSIONS: &[&str] = &[".js", ".php", ".blade.php", ".ts", ".vue", ".jsx", ".tsx"];

#[derive(Debug)]
pub enum ConfigError {
    Io(io::Error),
    Serde(serde_json::Error),
    NoConfigDirectory,
}

impl From<io::Error> for ConfigError {
    fn from(err: io::Error) -> Self {
        ConfigError::Io(err)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Serde(err)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "Configuration I/O error: {e}"),
            ConfigError::Serde(e) => write!(f, "Malformed configuration: {e}"),
            ConfigError::NoConfigDirectory => {
                write!(f, "Could not determine a user configuration directory")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Serde(e) => Some(e),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/*
 * `Exclude` scans everything except `exclude_folders`; `Include` scans only
 * `include_folders` (falling back to exclude behavior when that list is empty).
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FolderMode {
    Include,
    #[default]
    Exclude,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FolderScanConfig {
    pub include_folders: Vec<String>,
    pub exclude_folders: Vec<String>,
    pub mode: FolderMode,
}

/*
 * On-disk settings. Keys use the same camelCase names as the editor settings
 * (`extensions`, `includeFolders`, `excludeFolders`, `folderMode`); every key is
 * optional.
 */
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BookmarkSettings {
    pub extensions: Vec<String>,
    pub include_folders: Vec<String>,
    pub exclude_folders: Vec<String>,
    pub folder_mode: FolderMode,
}

impl BookmarkSettings {
    /// Configured suffixes with blanks dropped, or the defaults when none remain.
    pub fn effective_extensions(&self) -> Vec<String> {
        let configured: Vec<String> = self
            .extensions
            .iter()
            .map(|ext| ext.trim())
            .filter(|ext| !ext.is_empty())
            .map(str::to_string)
            .collect();
        if configured.is_empty() {
            DEFAULT_EXTENSIONS.iter().map(|ext| ext.to_string()).collect()
        } else {
            configured
        }
    }

    pub fn folder_config(&self) -> FolderScanConfig {
        fn clean(patterns: &[String]) -> Vec<String> {
            patterns
                .iter()
                .map(|p| p.trim())
                .filter(|p| !p.is_empty())
                .map(str::to_string)
                .collect()
        }
        FolderScanConfig {
            include_folders: clean(&self.include_folders),
            exclude_folders: clean(&self.exclude_folders),
            mode: self.folder_mode,
        }
    }
}

pub trait ConfigProviderOperations: Send + Sync {
    /*
     * Returns the settings that apply to `workspace_root`. Called before every
     * traversal and every incremental rescan; implementations must not cache.
     */
    fn load_settings(&self, workspace_root: &Path) -> Result<BookmarkSettings>;
}

pub struct CoreConfigProvider {
    app_name: String,
}

impl CoreConfigProvider {
    pub fn new(app_name: &str) -> Self {
        CoreConfigProvider {
            app_name: app_name.to_string(),
        }
    }

    pub fn project_config_path(workspace_root: &Path) -> PathBuf {
        workspace_root
            .join(PROJECT_CONFIG_DIR_NAME)
            .join(PROJECT_CONFIG_FILENAME)
    }

    fn read_settings_file(file_path: &Path) -> Result<Option<BookmarkSettings>> {
        if !file_path.is_file() {
            log::trace!("CoreConfigProvider: No settings file at {file_path:?}.");
            return Ok(None);
        }
        let file = File::open(file_path)?;
        let settings: BookmarkSettings = serde_json::from_reader(BufReader::new(file))?;
        log::debug!("CoreConfigProvider: Loaded settings from {file_path:?}.");
        Ok(Some(settings))
    }
}

impl ConfigProviderOperations for CoreConfigProvider {
    fn load_settings(&self, workspace_root: &Path) -> Result<BookmarkSettings> {
        let project_file = Self::project_config_path(workspace_root);
        if let Some(settings) = Self::read_settings_file(&project_file)? {
            return Ok(settings);
        }

        let user_file = path_utils::get_user_config_file_path(&self.app_name)
            .ok_or(ConfigError::NoConfigDirectory)?;
        if let Some(settings) = Self::read_settings_file(&user_file)? {
            return Ok(settings);
        }

        log::trace!("CoreConfigProvider: Using default settings for {workspace_root:?}.");
        Ok(BookmarkSettings::default())
    }
}
