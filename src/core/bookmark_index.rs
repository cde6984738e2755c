/*
 * The public face of the scanning core. A `BookmarkIndex` owns its cache and the
 * services it scans through, answers "all current bookmarks" queries, and takes the
 * three notifications an editor integration produces: a file was saved, the
 * workspace changed, or the user asked for a refresh.
 *
 * Nothing is scanned at construction. The first query performs the initial full
 * scan; afterwards a saved file costs one file read instead of a workspace walk.
 * All mutating operations take `&mut self`, so two full rebuilds can never
 * overlap and a returning call has finished updating the cache.
 */
use crate::core::bookmark_cache::BookmarkCache;
use crate::core::config::{BookmarkSettings, ConfigProviderOperations, CoreConfigProvider};
use crate::core::file_scanner;
use crate::core::file_system::{
    ContentReaderOperations, CoreContentReader, CoreDirectoryLister, DirectoryListerOperations,
};
use crate::core::file_walker;
use crate::core::models::BookmarkRecord;
use crate::core::path_utils;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub struct BookmarkIndex {
    workspace_root: Option<PathBuf>,
    cache: BookmarkCache,
    config_provider: Arc<dyn ConfigProviderOperations>,
    directory_lister: Arc<dyn DirectoryListerOperations>,
    content_reader: Arc<dyn ContentReaderOperations>,
}

/*
 * Settings for `workspace_root`, or the defaults when they cannot be loaded.
 * A broken settings file must never stop bookmarks from being listed.
 */
fn load_settings_or_default(
    config_provider: &dyn ConfigProviderOperations,
    workspace_root: &Path,
) -> BookmarkSettings {
    match config_provider.load_settings(workspace_root) {
        Ok(settings) => settings,
        Err(e) => {
            log::warn!("BookmarkIndex: Failed to load settings, using defaults: {e}");
            BookmarkSettings::default()
        }
    }
}

/*
 * Maps a saved path onto the key a full walk would have produced for it.
 * Relative paths are taken relative to `workspace_root`. `.` and `..` are
 * resolved lexically. When the file still exists and its canonical form lies
 * under the root (a path through a symlinked directory, say), that form wins.
 */
fn resolve_saved_path(file_path: &Path, workspace_root: &Path) -> PathBuf {
    let joined = if file_path.is_relative() {
        workspace_root.join(file_path)
    } else {
        file_path.to_path_buf()
    };
    let normalized = path_utils::normalize_lexically(&joined);
    if normalized.starts_with(workspace_root) {
        return normalized;
    }
    match fs::canonicalize(&normalized) {
        Ok(canonical) if canonical.starts_with(workspace_root) => canonical,
        _ => normalized,
    }
}

fn walk_and_scan(
    workspace_root: &Path,
    config_provider: &dyn ConfigProviderOperations,
    directory_lister: &dyn DirectoryListerOperations,
    content_reader: &dyn ContentReaderOperations,
) -> Vec<(PathBuf, Vec<BookmarkRecord>)> {
    log::info!("BookmarkIndex: Starting scan of all files in {workspace_root:?}");
    let settings = load_settings_or_default(config_provider, workspace_root);
    let files = file_walker::find_files(
        workspace_root,
        &settings.effective_extensions(),
        &settings.folder_config(),
        directory_lister,
    );
    log::debug!("BookmarkIndex: Found {} files to search", files.len());

    let scanned: Vec<(PathBuf, Vec<BookmarkRecord>)> = files
        .into_iter()
        .map(|file_path| {
            let records = file_scanner::scan_file(&file_path, content_reader);
            (file_path, records)
        })
        .collect();

    let total: usize = scanned.iter().map(|(_, records)| records.len()).sum();
    log::info!("BookmarkIndex: Total bookmarks found: {total}");
    scanned
}

impl BookmarkIndex {
    pub fn new(
        workspace_root: Option<PathBuf>,
        config_provider: Arc<dyn ConfigProviderOperations>,
        directory_lister: Arc<dyn DirectoryListerOperations>,
        content_reader: Arc<dyn ContentReaderOperations>,
    ) -> Self {
        BookmarkIndex {
            workspace_root,
            cache: BookmarkCache::new(),
            config_provider,
            directory_lister,
            content_reader,
        }
    }

    /// An index backed by the real file system and the JSON settings files of `app_name`.
    pub fn with_core_services(workspace_root: Option<PathBuf>, app_name: &str) -> Self {
        Self::new(
            workspace_root,
            Arc::new(CoreConfigProvider::new(app_name)),
            Arc::new(CoreDirectoryLister::new()),
            Arc::new(CoreContentReader::new()),
        )
    }

    pub fn workspace_root(&self) -> Option<&Path> {
        self.workspace_root.as_deref()
    }

    pub fn is_initialized(&self) -> bool {
        self.cache.is_initialized()
    }

    fn rebuild_cache(&mut self, force: bool) {
        let workspace_root = self.workspace_root.clone();
        let config_provider = Arc::clone(&self.config_provider);
        let directory_lister = Arc::clone(&self.directory_lister);
        let content_reader = Arc::clone(&self.content_reader);
        let procedure = move || match workspace_root {
            Some(root) => walk_and_scan(
                &root,
                config_provider.as_ref(),
                directory_lister.as_ref(),
                content_reader.as_ref(),
            ),
            None => {
                log::debug!("BookmarkIndex: No workspace root, nothing to scan.");
                Vec::new()
            }
        };
        if force {
            self.cache.full_rebuild(procedure);
        } else {
            self.cache.ensure_initialized(procedure);
        }
    }

    /*
     * All current bookmarks, sorted by file path and then line. Triggers the
     * initial full scan on first use.
     */
    pub fn query_all(&mut self) -> Vec<BookmarkRecord> {
        self.rebuild_cache(false);
        let mut records = self.cache.all_records();
        records.sort_by(|a, b| a.file_path.cmp(&b.file_path).then(a.line.cmp(&b.line)));
        records
    }

    /// Discards everything and rescans the whole workspace.
    pub fn refresh_all(&mut self) {
        log::info!("BookmarkIndex: Performing full refresh of all bookmarks");
        self.rebuild_cache(true);
        log::info!(
            "BookmarkIndex: {} files carry bookmarks",
            self.cache.file_count()
        );
    }

    /*
     * Rescans a single file after it was saved. Before the initial scan this
     * falls back to a full refresh. Relative paths are taken relative to the
     * workspace root. A file that a full walk would skip (wrong extension,
     * excluded or hidden folder, outside the workspace) is dropped from the
     * cache and not read.
     */
    pub fn refresh_file(&mut self, file_path: &Path) {
        log::debug!("BookmarkIndex: Refreshing bookmarks for file: {file_path:?}");
        if !self.cache.is_initialized() {
            self.refresh_all();
            return;
        }

        let Some(root) = self.workspace_root.as_deref() else {
            self.cache.invalidate_file(file_path);
            return;
        };
        let file_path = resolve_saved_path(file_path, root);
        let previous = self.cache.records_for(&file_path).map_or(0, <[_]>::len);

        self.cache.invalidate_file(&file_path);

        let settings = load_settings_or_default(self.config_provider.as_ref(), root);
        if !file_walker::is_eligible_file(
            &file_path,
            root,
            &settings.effective_extensions(),
            &settings.folder_config(),
        ) {
            log::debug!("BookmarkIndex: {file_path:?} is not part of the scan, dropped from cache");
            return;
        }

        let records = file_scanner::scan_file(&file_path, self.content_reader.as_ref());
        log::debug!(
            "BookmarkIndex: {} bookmarks in {file_path:?} after refresh (was {previous})",
            records.len()
        );
        self.cache.update_file(&file_path, records);
    }

    /*
     * Switches to another workspace (or to none) and rescans. Used when the
     * editor opens a different folder.
     */
    pub fn change_workspace_root(&mut self, workspace_root: Option<PathBuf>) {
        log::info!("BookmarkIndex: Workspace root changed to {workspace_root:?}");
        self.workspace_root = workspace_root;
        self.refresh_all();
    }
}
