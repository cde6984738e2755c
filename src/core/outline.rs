/*
 * Turns bookmark records into outline entries for an editor tree view or a
 * terminal listing. Each entry shows the description, `file name:line` as a
 * detail, a per-kind icon, and two children: the workspace-relative path and
 * the line number. Every row opens the same location.
 */
use crate::core::models::{BookmarkRecord, MarkerKind};
use crate::core::path_utils;
use serde::Serialize;
use std::path::{Path, PathBuf};

const CHILD_ICON: &str = "debug-breakpoint-log-unverified";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OpenTarget {
    #[serde(serialize_with = "path_utils::serialize_path_lossy")]
    pub path: PathBuf,
    // Zero-based, as editors address lines.
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutlineChild {
    pub label: String,
    pub icon: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutlineEntry {
    pub kind: MarkerKind,
    pub label: String,
    pub detail: String,
    pub tooltip: String,
    pub icon: &'static str,
    pub target: OpenTarget,
    pub children: Vec<OutlineChild>,
}

pub fn icon_for(kind: MarkerKind) -> &'static str {
    match kind {
        MarkerKind::Do => "debug-continue",
        MarkerKind::Bookmark => "bookmark",
    }
}

pub fn build_entry(record: &BookmarkRecord, workspace_root: &Path) -> OutlineEntry {
    let file_name = record
        .file_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| record.file_path.to_string_lossy().into_owned());
    OutlineEntry {
        kind: record.kind,
        label: record.description.clone(),
        detail: format!("{file_name}:{}", record.line),
        tooltip: record.file_path.to_string_lossy().into_owned(),
        icon: icon_for(record.kind),
        target: OpenTarget {
            path: record.file_path.clone(),
            line: record.line.saturating_sub(1),
        },
        children: vec![
            OutlineChild {
                label: path_utils::relative_slash_path(&record.file_path, workspace_root),
                icon: CHILD_ICON,
            },
            OutlineChild {
                label: format!("line: {}", record.line),
                icon: CHILD_ICON,
            },
        ],
    }
}

pub fn build_outline(records: &[BookmarkRecord], workspace_root: &Path) -> Vec<OutlineEntry> {
    records
        .iter()
        .map(|record| build_entry(record, workspace_root))
        .collect()
}

/*
 * Plain-text rendering used by the `list` command:
 * `[do] description  (src/app.js:12)`, one line per record.
 */
pub fn render_text(records: &[BookmarkRecord], workspace_root: &Path) -> String {
    let mut out = String::new();
    for record in records {
        let relative = path_utils::relative_slash_path(&record.file_path, workspace_root);
        let tag = match record.kind {
            MarkerKind::Do => "[do]      ",
            MarkerKind::Bookmark => "[bookmark]",
        };
        out.push_str(&format!(
            "{tag} {}  ({relative}:{})\n",
            record.description, record.line
        ));
    }
    out
}
