/*
 * Discovers the files a full bookmark scan should read.
 *
 * The walk is depth-first and pre-order: a directory's entries are visited in
 * listing order and each subdirectory is descended into as soon as it is met.
 * Directories rejected by the folder filter are pruned without being listed.
 * Directories whose name starts with `.` are never entered, whatever the folder
 * patterns say. A directory that cannot be listed is logged and skipped.
 */
use crate::core::config::FolderScanConfig;
use crate::core::directory_filter::should_include_directory;
use crate::core::file_system::DirectoryListerOperations;
use crate::core::path_utils;
use std::path::{Path, PathBuf};

pub fn is_hidden_name(name: &str) -> bool {
    name.starts_with('.')
}

/*
 * Suffix test on the full path string, so `.php` and `.blade.php` both accept
 * `view.blade.php`.
 */
pub fn has_scanned_extension(path: &Path, extensions: &[String]) -> bool {
    let path_text = path.to_string_lossy();
    extensions.iter().any(|ext| path_text.ends_with(ext.as_str()))
}

pub fn find_files(
    workspace_root: &Path,
    extensions: &[String],
    folder_config: &FolderScanConfig,
    lister: &dyn DirectoryListerOperations,
) -> Vec<PathBuf> {
    log::debug!("FileWalker: Finding files in {workspace_root:?}");
    let mut files = Vec::new();
    traverse_directory(
        workspace_root,
        workspace_root,
        extensions,
        folder_config,
        lister,
        &mut files,
    );
    log::debug!("FileWalker: Found {} files", files.len());
    files
}

fn traverse_directory(
    dir_path: &Path,
    workspace_root: &Path,
    extensions: &[String],
    folder_config: &FolderScanConfig,
    lister: &dyn DirectoryListerOperations,
    files: &mut Vec<PathBuf>,
) {
    if !should_include_directory(dir_path, workspace_root, folder_config) {
        log::debug!("FileWalker: Skipping directory {dir_path:?} (excluded by settings)");
        return;
    }

    let entries = match lister.list_directory(dir_path) {
        Ok(entries) => entries,
        Err(e) => {
            log::error!("FileWalker: Error traversing directory {dir_path:?}: {e}");
            return;
        }
    };

    for entry in entries {
        if entry.is_dir {
            if is_hidden_name(&entry.name) {
                log::trace!("FileWalker: Skipping hidden directory {:?}", entry.path);
                continue;
            }
            traverse_directory(
                &entry.path,
                workspace_root,
                extensions,
                folder_config,
                lister,
                files,
            );
        } else if entry.is_file && has_scanned_extension(&entry.path, extensions) {
            files.push(entry.path);
        }
    }
}

/*
 * True if a full walk with the same settings would have produced `file_path`:
 * it lies under the root, has a scanned extension, no directory on the way is
 * hidden, and the folder filter accepts every directory on the way.
 * Only the path is inspected; whether the file exists is not checked.
 */
pub fn is_eligible_file(
    file_path: &Path,
    workspace_root: &Path,
    extensions: &[String],
    folder_config: &FolderScanConfig,
) -> bool {
    if !file_path.starts_with(workspace_root) || file_path == workspace_root {
        return false;
    }
    if !has_scanned_extension(file_path, extensions) {
        return false;
    }
    if path_utils::has_hidden_ancestor(file_path, workspace_root) {
        return false;
    }
    file_path
        .ancestors()
        .skip(1)
        .take_while(|dir| dir.starts_with(workspace_root))
        .all(|dir| should_include_directory(dir, workspace_root, folder_config))
}
