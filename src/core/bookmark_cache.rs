/*
 * Per-file cache of bookmark records.
 *
 * Maps each file path to that file's records in line order. Files without
 * records are never stored, so the map only grows with files that actually
 * carry markers. Iteration follows insertion order, which after a full rebuild is
 * the walker's discovery order; callers wanting a stable presentation order sort
 * at their own boundary.
 *
 * The cache starts uninitialized and becomes initialized when a full rebuild
 * completes. A rebuild collects everything into a new map and swaps it in at the
 * end, so the old contents stay intact until the new ones are complete.
 */
use crate::core::models::BookmarkRecord;
use indexmap::IndexMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Default)]
pub struct BookmarkCache {
    entries: IndexMap<PathBuf, Vec<BookmarkRecord>>,
    initialized: bool,
}

impl BookmarkCache {
    /// Creates an empty, uninitialized cache. No I/O happens here.
    pub fn new() -> Self {
        BookmarkCache {
            entries: IndexMap::new(),
            initialized: false,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /*
     * Replaces the whole cache with the output of `walk_and_scan`, which yields
     * `(file, records)` pairs in discovery order. The cache counts as
     * uninitialized while the procedure runs and as initialized afterwards.
     */
    pub fn full_rebuild<F>(&mut self, walk_and_scan: F)
    where
        F: FnOnce() -> Vec<(PathBuf, Vec<BookmarkRecord>)>,
    {
        self.initialized = false;
        let mut rebuilt = IndexMap::new();
        for (file_path, records) in walk_and_scan() {
            if !records.is_empty() {
                rebuilt.insert(file_path, records);
            }
        }
        self.entries = rebuilt;
        self.initialized = true;
        log::debug!(
            "BookmarkCache: Rebuilt with {} bookmarks in {} files.",
            self.record_count(),
            self.file_count()
        );
    }

    /// Runs a full rebuild unless one has already completed.
    pub fn ensure_initialized<F>(&mut self, walk_and_scan: F)
    where
        F: FnOnce() -> Vec<(PathBuf, Vec<BookmarkRecord>)>,
    {
        if !self.initialized {
            log::debug!("BookmarkCache: Not initialized yet, performing initial scan.");
            self.full_rebuild(walk_and_scan);
        }
    }

    /// Drops every record of `file_path`, whether or not any were cached.
    pub fn invalidate_file(&mut self, file_path: &Path) {
        if self.entries.shift_remove(file_path).is_some() {
            log::trace!("BookmarkCache: Invalidated {file_path:?}.");
        }
    }

    /*
     * Stores `records` as the complete set for `file_path`. An empty set leaves
     * the file absent from the cache.
     */
    pub fn update_file(&mut self, file_path: &Path, records: Vec<BookmarkRecord>) {
        if records.is_empty() {
            self.entries.shift_remove(file_path);
        } else {
            self.entries.insert(file_path.to_path_buf(), records);
        }
    }

    pub fn records_for(&self, file_path: &Path) -> Option<&[BookmarkRecord]> {
        self.entries.get(file_path).map(Vec::as_slice)
    }

    /// All cached records, file by file in insertion order, lines in order within a file.
    pub fn all_records(&self) -> Vec<BookmarkRecord> {
        self.entries.values().flatten().cloned().collect()
    }

    pub fn file_count(&self) -> usize {
        self.entries.len()
    }

    pub fn record_count(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }
}
