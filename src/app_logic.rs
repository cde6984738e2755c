/*
 * The application layer between an editor integration and the scanning core.
 * `ServeSession` maps editor requests (query, refresh, file saved, workspace
 * changed) onto `BookmarkIndex` operations; `run_serve_loop` speaks the
 * newline-delimited JSON protocol on stdin/stdout.
 * Unit tests for the session are in `handler_tests.rs`.
 */
pub mod handler;

#[cfg(test)]
mod handler_tests;

pub use handler::{APP_NAME, ProtocolError, Request, Response, ServeSession, run_serve_loop};
