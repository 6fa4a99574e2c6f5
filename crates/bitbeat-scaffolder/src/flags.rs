//! Feature flags - the input contract of the assembly engine

use crate::error::{Result, ScaffoldError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Package manager used to install the generated project
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PackageManager {
    #[default]
    Npm,
    Yarn,
}

impl PackageManager {
    /// Parse a user-supplied name; anything unrecognized falls back to npm
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "yarn" => PackageManager::Yarn,
            _ => PackageManager::Npm,
        }
    }

    /// Whether `name` is one of the known package managers
    pub fn is_known(name: &str) -> bool {
        matches!(name.trim().to_lowercase().as_str(), "npm" | "yarn")
    }

    /// Name of the executable
    pub fn binary(&self) -> &'static str {
        match self {
            PackageManager::Npm => "npm",
            PackageManager::Yarn => "yarn",
        }
    }
}

impl From<String> for PackageManager {
    fn from(value: String) -> Self {
        Self::from_name(&value)
    }
}

impl From<PackageManager> for String {
    fn from(value: PackageManager) -> Self {
        value.binary().to_string()
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.binary())
    }
}

/// Output dialect of the generated startup module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    /// `import { .. } from '..'` + `export default`
    TypeScript,
    /// `const { .. } = require('..')` + `module.exports`
    JavaScript,
}

impl Dialect {
    pub fn display_name(&self) -> &'static str {
        match self {
            Dialect::TypeScript => "TypeScript",
            Dialect::JavaScript => "JavaScript",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Dialect::TypeScript => "ts",
            Dialect::JavaScript => "js",
        }
    }

    /// File name of the generated startup module
    pub fn boot_file_name(&self) -> String {
        format!("boot.{}", self.extension())
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Validated feature selection for one generation run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureFlags {
    pub package_manager: PackageManager,
    pub typescript: bool,
    pub web_server: bool,
    pub websocket_server: bool,
    /// Serve the websocket server on the web server's socket
    pub unify_websocket: bool,
    pub status_action: bool,
    pub documentation_action: bool,
    pub placeholder_directories: bool,
}

impl FeatureFlags {
    pub fn dialect(&self) -> Dialect {
        if self.typescript {
            Dialect::TypeScript
        } else {
            Dialect::JavaScript
        }
    }

    /// Whether the run produces a startup module
    pub fn has_server(&self) -> bool {
        self.web_server || self.websocket_server
    }

    /// Reject combinations the prompt flow can never produce
    pub fn validate(&self) -> Result<()> {
        if self.unify_websocket && !(self.web_server && self.websocket_server) {
            return Err(ScaffoldError::InvalidFeatureCombination(
                "unifying the websocket server requires both the web server and the websocket server"
                    .to_string(),
            ));
        }

        let actions: [(bool, &str); 2] = [
            (self.status_action, "status"),
            (self.documentation_action, "documentation"),
        ];
        for (enabled, action) in actions {
            if enabled && !self.web_server {
                return Err(ScaffoldError::InvalidFeatureCombination(format!(
                    "the {} action requires the web server",
                    action
                )));
            }
        }

        Ok(())
    }

    /// Names of the active optional features, for summaries
    pub fn active_features(&self) -> Vec<&'static str> {
        [
            (self.web_server, "web server"),
            (self.websocket_server, "websocket server"),
            (self.unify_websocket, "shared port"),
            (self.status_action, "status action"),
            (self.documentation_action, "documentation action"),
            (self.placeholder_directories, "placeholder directories"),
        ]
        .into_iter()
        .filter_map(|(on, name)| on.then_some(name))
        .collect()
    }
}
