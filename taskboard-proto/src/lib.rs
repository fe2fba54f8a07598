//! Shared definitions for the Taskboard task model and HTTP wire format.

pub mod api;
pub mod dates;
pub mod task;
pub mod validate;
