//! Polling chat: an HTTP server holding an append-only message log and a
//! desktop client that polls it for new messages behind a cursor.

pub mod common;
pub mod config;
pub mod network;
pub mod server;
pub mod storage;
pub mod ui;
