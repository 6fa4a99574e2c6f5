//! Run configuration: pre-filled answers and their defaults

pub mod answers;

pub use answers::{default_project_name, validate_version, Answers, DEFAULT_VERSION};
