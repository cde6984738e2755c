/*
 * Decides whether a directory takes part in a bookmark scan, based on the folder
 * patterns of a `FolderScanConfig`.
 *
 * Patterns are workspace-relative folder paths such as `vendor` or `src/app`,
 * optionally ending in a slash-star suffix. A pattern covers that folder and everything below it;
 * matching is done on whole path segments, so `src` covers `src/app` but not
 * `srcx`. There is no glob or regex support.
 */
use crate::core::config::{FolderMode, FolderScanConfig};
use crate::core::path_utils;
use std::path::Path;

fn pattern_covers(pattern: &str, relative_path: &str) -> bool {
    let base = pattern.strip_suffix("/*").unwrap_or(pattern);
    let base = base.trim_end_matches('/');
    if base.is_empty() {
        return false;
    }
    relative_path == base
        || relative_path
            .strip_prefix(base)
            .is_some_and(|rest| rest.starts_with('/'))
}

fn any_pattern_covers(patterns: &[String], relative_path: &str) -> bool {
    patterns
        .iter()
        .any(|pattern| pattern_covers(pattern, relative_path))
}

/*
 * The workspace root is always included. Otherwise, in `Include` mode with a
 * non-empty include list, a directory is included only if an include pattern
 * covers it; in every other case it is included unless an exclude pattern covers it.
 */
pub fn should_include_directory(
    dir_path: &Path,
    workspace_root: &Path,
    config: &FolderScanConfig,
) -> bool {
    let relative_path = path_utils::relative_slash_path(dir_path, workspace_root);
    if relative_path.is_empty() {
        return true;
    }

    if config.mode == FolderMode::Include && !config.include_folders.is_empty() {
        return any_pattern_covers(&config.include_folders, &relative_path);
    }

    if !config.exclude_folders.is_empty() {
        return !any_pattern_covers(&config.exclude_folders, &relative_path);
    }

    true
}
