//! Runtime detection for Node.js and the package managers

use crate::flags::PackageManager;
use std::process::Command;

/// Runtime detection result
#[derive(Debug, Clone)]
pub struct RuntimeInfo {
    pub name: &'static str,
    pub version: Option<String>,
    pub available: bool,
}

impl RuntimeInfo {
    /// `Name (version)` or `Name (not installed)`
    pub fn describe(&self) -> String {
        if self.available {
            format!("{} ({})", self.name, self.version.as_deref().unwrap_or("unknown"))
        } else {
            format!("{} (not installed)", self.name)
        }
    }
}

/// Run `<binary> --version` and report what came back
pub fn check_tool(binary: &str, name: &'static str) -> RuntimeInfo {
    let output = Command::new(binary).arg("--version").output();

    match output {
        Ok(out) if out.status.success() => {
            let version = String::from_utf8_lossy(&out.stdout).trim().to_string();
            RuntimeInfo {
                name,
                version: Some(version),
                available: true,
            }
        }
        _ => RuntimeInfo {
            name,
            version: None,
            available: false,
        },
    }
}

/// Check if Node.js is available
pub fn check_node() -> RuntimeInfo {
    check_tool("node", "Node.js")
}

/// Check if the selected package manager is available
pub fn check_package_manager(manager: PackageManager) -> RuntimeInfo {
    let name = match manager {
        PackageManager::Npm => "npm",
        PackageManager::Yarn => "Yarn",
    };
    check_tool(manager.binary(), name)
}

/// Node.js plus the selected package manager, in that order
pub fn check_runtimes(manager: PackageManager) -> Vec<RuntimeInfo> {
    vec![check_node(), check_package_manager(manager)]
}
