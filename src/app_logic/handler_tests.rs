use super::handler::*;

use crate::core::{BookmarkIndex, MarkerKind};

use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

/*
 * Tests for `ServeSession` and the serve loop. They run against real temporary
 * workspaces through `BookmarkIndex::with_core_services`; a random app name keeps
 * any per-user settings file out of the picture.
 */

fn new_session(root: Option<&Path>) -> ServeSession {
    let app_name = format!("TestApp_Serve_{}", rand::random::<u64>());
    ServeSession::new(BookmarkIndex::with_core_services(
        root.map(Path::to_path_buf),
        &app_name,
    ))
}

fn write(root: &Path, relative: &str, content: &str) -> PathBuf {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, content).unwrap();
    path
}

fn bookmarks_of(response: Response) -> Vec<crate::core::BookmarkRecord> {
    match response {
        Response::Ok {
            bookmarks: Some(bookmarks),
            ..
        } => bookmarks,
        other => panic!("Expected bookmarks in response, got {other:?}"),
    }
}

#[test]
fn test_query_returns_bookmarks() {
    let dir = tempdir().unwrap();
    write(dir.path(), "app.js", "line1\n// @bookmark: fix this\nline3\n");
    let mut session = new_session(Some(dir.path()));

    let bookmarks = bookmarks_of(session.handle_request(Request::Query));

    assert_eq!(bookmarks.len(), 1);
    assert_eq!(bookmarks[0].kind, MarkerKind::Bookmark);
    assert_eq!(bookmarks[0].line, 2);
}

#[test]
fn test_file_saved_updates_only_that_file() {
    let dir = tempdir().unwrap();
    let a = write(dir.path(), "a.php", "// @do: one\n// @do: two\n");
    write(dir.path(), "b.php", "// @bookmark: three\n");
    let mut session = new_session(Some(dir.path()));
    assert_eq!(bookmarks_of(session.handle_request(Request::Query)).len(), 3);

    fs::write(&a, "<?php\n").unwrap();
    let saved = session.handle_request(Request::FileSaved { path: a.clone() });

    assert!(matches!(saved, Response::Ok { bookmarks: None, outline: None }));
    let bookmarks = bookmarks_of(session.handle_request(Request::Query));
    assert_eq!(bookmarks.len(), 1);
    assert_eq!(bookmarks[0].description, "three");
}

#[test]
fn test_refresh_picks_up_external_changes() {
    let dir = tempdir().unwrap();
    let mut session = new_session(Some(dir.path()));
    assert!(bookmarks_of(session.handle_request(Request::Query)).is_empty());

    write(dir.path(), "src/new.tsx", "{/* */} // @do: added outside the editor\n");
    assert!(bookmarks_of(session.handle_request(Request::Query)).is_empty());
    session.handle_request(Request::Refresh);

    assert_eq!(bookmarks_of(session.handle_request(Request::Query)).len(), 1);
}

#[test]
fn test_workspace_changed_switches_root() {
    let first = tempdir().unwrap();
    let second = tempdir().unwrap();
    write(first.path(), "a.js", "// @do: first\n");
    write(second.path(), "b.js", "// @do: second\n");
    let mut session = new_session(Some(first.path()));

    session.handle_request(Request::WorkspaceChanged {
        root: Some(second.path().to_path_buf()),
    });

    let bookmarks = bookmarks_of(session.handle_request(Request::Query));
    assert_eq!(bookmarks.len(), 1);
    assert_eq!(bookmarks[0].description, "second");
}

#[test]
fn test_outline_request() {
    let dir = tempdir().unwrap();
    write(dir.path(), "src/app.js", "// @do: wire it\n");
    let mut session = new_session(Some(dir.path()));

    match session.handle_request(Request::Outline) {
        Response::Ok {
            outline: Some(entries),
            bookmarks: None,
        } => {
            assert_eq!(entries.len(), 1);
            assert_eq!(entries[0].label, "wire it");
            assert_eq!(entries[0].detail, "app.js:1");
            assert_eq!(entries[0].children[0].label, "src/app.js");
        }
        other => panic!("Expected an outline, got {other:?}"),
    }
}

#[test]
fn test_outline_without_workspace_is_empty() {
    let mut session = new_session(None);
    assert_eq!(
        session.handle_request(Request::Outline),
        Response::Ok {
            bookmarks: None,
            outline: Some(Vec::new())
        }
    );
}

#[test]
fn test_request_parsing() {
    let parse = |s: &str| serde_json::from_str::<Request>(s).unwrap();
    assert_eq!(parse(r#"{"command":"query"}"#), Request::Query);
    assert_eq!(parse(r#"{"command":"refresh"}"#), Request::Refresh);
    assert_eq!(
        parse(r#"{"command":"file_saved","path":"/ws/a.js"}"#),
        Request::FileSaved {
            path: PathBuf::from("/ws/a.js")
        }
    );
    assert_eq!(
        parse(r#"{"command":"workspace_changed","root":null}"#),
        Request::WorkspaceChanged { root: None }
    );
    assert_eq!(parse(r#"{"command":"shutdown"}"#), Request::Shutdown);
}

#[test]
fn test_malformed_line_yields_error_response() {
    let mut session = new_session(None);
    let response = session.handle_line("{\"command\":\"explode\"}");
    assert!(matches!(response, Response::Error { .. }));
    assert!(!session.is_shutdown_requested());
}

#[test]
fn test_serve_loop_answers_each_line_and_stops_on_shutdown() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a.js", "// @bookmark: here\n");
    let mut session = new_session(Some(dir.path()));
    let input = concat!(
        "{\"command\":\"query\"}\n",
        "\n",
        "not json\n",
        "{\"command\":\"shutdown\"}\n",
        "{\"command\":\"query\"}\n",
    );
    let mut output = Vec::new();

    run_serve_loop(&mut session, Cursor::new(input), &mut output).unwrap();

    let lines: Vec<serde_json::Value> = String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0]["status"], "ok");
    assert_eq!(lines[0]["bookmarks"][0]["description"], "here");
    assert_eq!(lines[0]["bookmarks"][0]["kind"], "bookmark");
    assert_eq!(lines[1]["status"], "error");
    assert_eq!(lines[2], serde_json::json!({ "status": "ok" }));
    assert!(session.is_shutdown_requested());
}

#[test]
fn test_query_finds_markers_in_latin1_file() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("legacy.php"),
        b"<?php // caf\xe9\n// @do: still here\n",
    )
    .unwrap();
    let mut session = new_session(Some(dir.path()));

    let bookmarks = bookmarks_of(session.handle_request(Request::Query));

    assert_eq!(bookmarks.len(), 1);
    assert_eq!(bookmarks[0].description, "still here");
    assert_eq!(bookmarks[0].line, 2);
}

#[cfg(target_os = "linux")]
#[test]
fn test_serve_loop_survives_non_utf8_file_name() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join(OsStr::from_bytes(b"bad\xff.js")),
        "// @bookmark: odd name\n",
    )
    .unwrap();
    let mut session = new_session(Some(dir.path()));
    let input = "{\"command\":\"query\"}\n{\"command\":\"outline\"}\n";
    let mut output = Vec::new();

    run_serve_loop(&mut session, Cursor::new(input), &mut output).unwrap();

    let lines: Vec<serde_json::Value> = String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["status"], "ok");
    let file_path = lines[0]["bookmarks"][0]["file_path"].as_str().unwrap();
    assert!(file_path.ends_with("bad\u{FFFD}.js"), "got {file_path}");
    assert_eq!(lines[1]["status"], "ok");
    assert_eq!(lines[1]["outline"][0]["label"], "odd name");
}
