//! Taskboard client library.
//!
//! Talks to the task server through the [`api::TaskApi`] seam and drives
//! the edit workflow for a single task through [`edit::EditSession`].

pub mod api;
pub mod config;
pub mod edit;
