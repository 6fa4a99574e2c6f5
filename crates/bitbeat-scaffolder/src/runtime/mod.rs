//! Runtime detection and dependency installation
//!
//! This module provides:
//! - Node.js / package manager detection
//! - Running the package manager's install step

pub mod check;
pub mod install;

pub use check::{check_node, check_package_manager, check_runtimes, check_tool, RuntimeInfo};
pub use install::Installer;
