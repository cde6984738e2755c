/*
 * Extracts the bookmark records of one file: read it whole, split on `\n`, and run
 * the marker matcher over each line. Lines are numbered from 1. A trailing `\r`
 * is removed before matching so CRLF files produce the same records as LF files.
 * A read failure is logged and yields no records.
 */
use crate::core::file_system::ContentReaderOperations;
use crate::core::marker_pattern;
use crate::core::models::BookmarkRecord;
use std::path::Path;

pub fn scan_content(file_path: &Path, content: &str) -> Vec<BookmarkRecord> {
    let mut records = Vec::new();
    for (index, raw_line) in content.split('\n').enumerate() {
        let line = raw_line.strip_suffix('\r').unwrap_or(raw_line);
        for found in marker_pattern::match_line(line) {
            log::trace!(
                "FileScanner: Found @{}: ({}) in {:?} at line {}",
                found.kind,
                found.syntax,
                file_path,
                index + 1
            );
            records.push(BookmarkRecord::new(
                found.kind,
                found.description,
                file_path.to_path_buf(),
                index + 1,
            ));
        }
    }
    records
}

pub fn scan_file(file_path: &Path, reader: &dyn ContentReaderOperations) -> Vec<BookmarkRecord> {
    match reader.read_to_string(file_path) {
        Ok(content) => scan_content(file_path, &content),
        Err(e) => {
            log::warn!("FileScanner: Error reading file {file_path:?}: {e}");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::file_system::{CoreContentReader, FileSystemError, Result as FsResult};
    use crate::core::models::MarkerKind;
    use std::fs;
    use std::io;
    use std::path::PathBuf;
    use tempfile::tempdir;

    struct UnreadableReader;

    impl ContentReaderOperations for UnreadableReader {
        fn read_to_string(&self, _file_path: &Path) -> FsResult<String> {
            Err(FileSystemError::Io(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "mocked unreadable file",
            )))
        }
    }

    #[test]
    fn test_single_bookmark_end_to_end() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("main.js");
        fs::write(&path, "line1\n// @bookmark: fix this\nline3\n").unwrap();

        let records = scan_file(&path, &CoreContentReader::new());

        assert_eq!(
            records,
            vec![BookmarkRecord::new(
                MarkerKind::Bookmark,
                "fix this".to_string(),
                path.clone(),
                2
            )]
        );
    }

    #[test]
    fn test_records_follow_line_order() {
        let path = PathBuf::from("/ws/view.blade.php");
        let content = "{{-- @do: first --}}\n<p>text</p>\n// @bookmark: second\n\n// @do: third";

        let records = scan_content(&path, content);

        let summary: Vec<(MarkerKind, &str, usize)> = records
            .iter()
            .map(|r| (r.kind, r.description.as_str(), r.line))
            .collect();
        assert_eq!(
            summary,
            vec![
                (MarkerKind::Do, "first", 1),
                (MarkerKind::Bookmark, "second", 3),
                (MarkerKind::Do, "third", 5),
            ]
        );
    }

    #[test]
    fn test_crlf_lines_are_handled_like_lf() {
        let path = PathBuf::from("/ws/win.php");
        let records = scan_content(&path, "<?php\r\n{{-- @do: x --}}\r\n// @bookmark: y\r\n");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].description, "x");
        assert_eq!(records[0].line, 2);
        assert_eq!(records[1].description, "y");
        assert_eq!(records[1].line, 3);
    }

    #[test]
    fn test_unreadable_file_yields_nothing() {
        let records = scan_file(Path::new("/ws/locked.js"), &UnreadableReader);
        assert!(records.is_empty());
    }

    #[test]
    fn test_file_without_markers_yields_nothing() {
        let records = scan_content(Path::new("/ws/plain.ts"), "const a = 1;\n// regular\n");
        assert!(records.is_empty());
    }
}
