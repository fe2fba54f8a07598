//! Taskboard server library.
//!
//! Exposes the HTTP server for use in tests and embedding. The server
//! keeps the task collection in a JSON document and applies partial
//! updates to individual tasks.

pub mod config;
pub mod error;
pub mod merge;
pub mod server;
pub mod store;
