//! Presentation logic shared by the CLI commands.

pub mod dashboard;
pub mod log;
pub mod protocol;
