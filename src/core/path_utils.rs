/*
 * Path helpers shared by the scanning core: locating the per-user configuration
 * file and expressing paths relative to the workspace root in the `/`-separated
 * form that folder patterns and outline labels use on every platform.
 */
use directories::ProjectDirs;
use serde::Serializer;
use std::path::{Component, Path, PathBuf};

pub const USER_CONFIG_FILENAME: &str = "config.json";

/*
 * Resolves the per-user configuration file for `app_name`, e.g.
 * `~/.config/bookmark_outline/config.json` on Linux or
 * `AppData/Local/bookmark_outline/config/config.json` on Windows.
 * Nothing is created on disk; the file is optional and only read when present.
 * Returns `None` when the platform has no notion of a home directory.
 */
pub fn get_user_config_file_path(app_name: &str) -> Option<PathBuf> {
    log::trace!("PathUtils: Resolving user config file for '{app_name}'");
    ProjectDirs::from("", "", app_name)
        .map(|proj_dirs| proj_dirs.config_local_dir().join(USER_CONFIG_FILENAME))
}

/*
 * Returns `path` relative to `root`, joined with `/`. The root itself maps to the
 * empty string. Paths outside `root` are returned in full (lossy) so they never
 * accidentally match a relative folder pattern.
 */
pub fn relative_slash_path(path: &Path, root: &Path) -> String {
    match path.strip_prefix(root) {
        Ok(relative) => relative
            .components()
            .filter_map(|component| match component {
                Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/"),
        Err(_) => path.to_string_lossy().into_owned(),
    }
}

/*
 * True if any directory between `root` (exclusive) and `path` (exclusive) has a
 * name starting with `.`. The file name itself is not considered.
 */
pub fn has_hidden_ancestor(path: &Path, root: &Path) -> bool {
    let Ok(relative) = path.strip_prefix(root) else {
        return false;
    };
    let Some(parent) = relative.parent() else {
        return false;
    };
    parent.components().any(|component| match component {
        Component::Normal(part) => part.to_string_lossy().starts_with('.'),
        _ => false,
    })
}

/*
 * `serialize_with` helper for path fields. File names that are not valid UTF-8
 * are emitted with U+FFFD replacements instead of failing the whole document.
 */
pub fn serialize_path_lossy<S: Serializer>(path: &Path, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&path.to_string_lossy())
}

/*
 * Resolves `.` and `..` components without touching the file system. A `..`
 * at the root stays at the root.
 */
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push(component);
                }
            }
            other => normalized.push(other),
        }
    }
    normalized
}
