use crate::core::path_utils;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/*
 * The two marker keywords recognized in source comments.
 * Serialized in lowercase ("do" / "bookmark") since that is the spelling used
 * in the comment itself and what editor-side consumers expect.
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerKind {
    Do,
    Bookmark,
}

impl MarkerKind {
    pub const ALL: [MarkerKind; 2] = [MarkerKind::Do, MarkerKind::Bookmark];

    /// The keyword as written after `@` in a comment.
    pub fn keyword(self) -> &'static str {
        match self {
            MarkerKind::Do => "do",
            MarkerKind::Bookmark => "bookmark",
        }
    }
}

impl fmt::Display for MarkerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/*
 * One tagged comment found in a source file.
 * Records are immutable once created. When a file changes, every record for that
 * file is discarded and replaced by a fresh scan; records are never patched in place.
 * `line` is 1-based and refers to the file contents at scan time.
 */
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookmarkRecord {
    pub kind: MarkerKind,
    pub description: String,
    #[serde(serialize_with = "path_utils::serialize_path_lossy")]
    pub file_path: PathBuf,
    pub line: usize,
}

impl BookmarkRecord {
    pub fn new(kind: MarkerKind, description: String, file_path: PathBuf, line: usize) -> Self {
        debug_assert!(line >= 1, "BookmarkRecord lines are 1-based");
        BookmarkRecord {
            kind,
            description,
            file_path,
            line,
        }
    }
}
