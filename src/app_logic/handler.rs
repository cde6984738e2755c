use crate::core::{BookmarkIndex, BookmarkRecord, OutlineEntry, build_outline};
use serde::{Deserialize, Serialize};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

pub const APP_NAME: &str = "bookmark_outline";

#[derive(Debug)]
pub enum ProtocolError {
    Io(io::Error),
    Serde(serde_json::Error),
}

impl From<io::Error> for ProtocolError {
    fn from(err: io::Error) -> Self {
        ProtocolError::Io(err)
    }
}

impl From<serde_json::Error> for ProtocolError {
    fn from(err: serde_json::Error) -> Self {
        ProtocolError::Serde(err)
    }
}

impl std::fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProtocolError::Io(e) => write!(f, "Protocol I/O error: {e}"),
            ProtocolError::Serde(e) => write!(f, "Protocol encoding error: {e}"),
        }
    }
}

impl std::error::Error for ProtocolError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProtocolError::Io(e) => Some(e),
            ProtocolError::Serde(e) => Some(e),
        }
    }
}

/*
 * One line of input from the editor integration. `file_saved` and
 * `workspace_changed` are the change notifications; `refresh` is the manual
 * refresh command; `query` and `outline` read the current bookmarks.
 */
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Request {
    Query,
    Outline,
    Refresh,
    FileSaved { path: PathBuf },
    WorkspaceChanged { root: Option<PathBuf> },
    Shutdown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Response {
    Ok {
        #[serde(skip_serializing_if = "Option::is_none")]
        bookmarks: Option<Vec<BookmarkRecord>>,
        #[serde(skip_serializing_if = "Option::is_none")]
        outline: Option<Vec<OutlineEntry>>,
    },
    Error {
        message: String,
    },
}

impl Response {
    fn ok() -> Self {
        Response::Ok {
            bookmarks: None,
            outline: None,
        }
    }

    fn error(message: String) -> Self {
        Response::Error { message }
    }
}

/*
 * Drives a `BookmarkIndex` from editor requests. This is the wiring layer between
 * change notifications and the scanning core: it decides which index operation a
 * request maps to and shapes the reply, nothing more.
 */
pub struct ServeSession {
    pub(crate) index: BookmarkIndex,
    pub(crate) shutdown_requested: bool,
}

impl ServeSession {
    pub fn new(index: BookmarkIndex) -> Self {
        ServeSession {
            index,
            shutdown_requested: false,
        }
    }

    pub fn is_shutdown_requested(&self) -> bool {
        self.shutdown_requested
    }

    pub fn handle_request(&mut self, request: Request) -> Response {
        log::debug!("ServeSession: Handling {request:?}");
        match request {
            Request::Query => Response::Ok {
                bookmarks: Some(self.index.query_all()),
                outline: None,
            },
            Request::Outline => {
                let records = self.index.query_all();
                let entries = match self.index.workspace_root() {
                    Some(root) => build_outline(&records, root),
                    None => Vec::new(),
                };
                Response::Ok {
                    bookmarks: None,
                    outline: Some(entries),
                }
            }
            Request::Refresh => {
                self.index.refresh_all();
                Response::ok()
            }
            Request::FileSaved { path } => {
                self.index.refresh_file(&path);
                Response::ok()
            }
            Request::WorkspaceChanged { root } => {
                self.index.change_workspace_root(root);
                Response::ok()
            }
            Request::Shutdown => {
                log::info!("ServeSession: Shutdown requested.");
                self.shutdown_requested = true;
                Response::ok()
            }
        }
    }

    /*
     * Parses and answers one input line. Malformed input produces an error reply
     * and leaves the session running.
     */
    pub fn handle_line(&mut self, line: &str) -> Response {
        match serde_json::from_str::<Request>(line) {
            Ok(request) => self.handle_request(request),
            Err(e) => {
                log::warn!("ServeSession: Rejected malformed request {line:?}: {e}");
                Response::error(format!("Malformed request: {e}"))
            }
        }
    }
}

/*
 * Newline-delimited JSON loop: one request per input line, one response per
 * output line, flushed immediately. Ends at end of input or after `shutdown`.
 * Blank lines are ignored. A response is encoded in full before anything is
 * written, so a reply that cannot be encoded becomes an error line.
 */
pub fn run_serve_loop<R: BufRead, W: Write>(
    session: &mut ServeSession,
    input: R,
    mut output: W,
) -> Result<(), ProtocolError> {
    log::info!("ServeSession: Waiting for requests.");
    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let response = session.handle_line(&line);
        let encoded = match serde_json::to_vec(&response) {
            Ok(encoded) => encoded,
            Err(e) => {
                log::error!("ServeSession: Failed to encode response: {e}");
                serde_json::to_vec(&Response::error(format!("Failed to encode response: {e}")))?
            }
        };
        output.write_all(&encoded)?;
        output.write_all(b"\n")?;
        output.flush()?;
        if session.is_shutdown_requested() {
            break;
        }
    }
    log::info!("ServeSession: Input closed, stopping.");
    Ok(())
}
