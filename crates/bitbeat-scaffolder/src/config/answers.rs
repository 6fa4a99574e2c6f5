//! Pre-filled answers for non-interactive runs
//!
//! Answers can come from a YAML file and from CLI flags; whatever is still
//! missing is either prompted for or, with `--yes`, defaulted.

use crate::engine::ProjectMetadata;
use crate::error::Result;
use crate::flags::{FeatureFlags, PackageManager};
use anyhow::Context;
use semver::Version;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_VERSION: &str = "1.0.0";

/// Every prompt, as an optional pre-filled value
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Answers {
    pub package_manager: Option<String>,
    pub name: Option<String>,
    pub version: Option<String>,
    pub description: Option<String>,
    pub author: Option<String>,
    pub typescript: Option<bool>,
    pub placeholder_directories: Option<bool>,
    pub web_server: Option<bool>,
    pub websocket_server: Option<bool>,
    pub unify_websocket: Option<bool>,
    pub status_action: Option<bool>,
    pub documentation_action: Option<bool>,
}

impl Answers {
    pub fn from_yaml(content: &str) -> anyhow::Result<Self> {
        serde_yaml::from_str(content).context("Failed to parse answers file")
    }

    /// Load answers from a YAML file
    pub async fn load(path: &Path) -> anyhow::Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_yaml(&content).with_context(|| format!("Invalid answers in {}", path.display()))
    }

    /// Values from `other` win where both are set
    pub fn overlay(self, other: Answers) -> Answers {
        Answers {
            package_manager: other.package_manager.or(self.package_manager),
            name: other.name.or(self.name),
            version: other.version.or(self.version),
            description: other.description.or(self.description),
            author: other.author.or(self.author),
            typescript: other.typescript.or(self.typescript),
            placeholder_directories: other
                .placeholder_directories
                .or(self.placeholder_directories),
            web_server: other.web_server.or(self.web_server),
            websocket_server: other.websocket_server.or(self.websocket_server),
            unify_websocket: other.unify_websocket.or(self.unify_websocket),
            status_action: other.status_action.or(self.status_action),
            documentation_action: other.documentation_action.or(self.documentation_action),
        }
    }

    /// Fill every missing answer with its default and validate the result
    pub fn resolve_defaults(&self, default_name: &str) -> Result<(ProjectMetadata, FeatureFlags)> {
        let meta = ProjectMetadata {
            name: self.name.clone().unwrap_or_else(|| default_name.to_string()),
            version: self
                .version
                .clone()
                .unwrap_or_else(|| DEFAULT_VERSION.to_string()),
            description: self.description.clone().unwrap_or_default(),
            author: self.author.clone(),
        };

        let flags = FeatureFlags {
            package_manager: self
                .package_manager
                .as_deref()
                .map(PackageManager::from_name)
                .unwrap_or_default(),
            typescript: self.typescript.unwrap_or(true),
            web_server: self.web_server.unwrap_or(false),
            websocket_server: self.websocket_server.unwrap_or(false),
            unify_websocket: self.unify_websocket.unwrap_or(false),
            status_action: self.status_action.unwrap_or(false),
            documentation_action: self.documentation_action.unwrap_or(false),
            placeholder_directories: self.placeholder_directories.unwrap_or(false),
        };
        flags.validate()?;

        Ok((meta, flags))
    }
}

/// Check a project version entered by the user
pub fn validate_version(input: &str) -> std::result::Result<(), String> {
    Version::parse(input.trim())
        .map(|_| ())
        .map_err(|e| format!("'{}' is not a valid version: {}", input.trim(), e))
}

/// Project name derived from a directory, like the default prompt value
pub fn default_project_name(dir: &Path) -> String {
    dir.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| "bitbeat-app".to_string())
}
