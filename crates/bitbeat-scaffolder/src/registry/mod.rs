//! Package version lookup
//!
//! This module provides:
//! - The `VersionSource` capability the dependency builder resolves through
//! - `RegistryResolver`: live lookups against an npm-compatible registry
//! - `PinnedVersions`: fixed constraints, no network

pub mod resolver;

use crate::error::Result;
use async_trait::async_trait;

pub use resolver::{RegistryResolver, DEFAULT_DIST_TAG};

/// A package the generated project depends on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackageSpec {
    pub name: &'static str,
    /// Constraint used when no live lookup is performed
    pub pinned: &'static str,
}

impl PackageSpec {
    pub const fn new(name: &'static str, pinned: &'static str) -> Self {
        Self { name, pinned }
    }
}

/// Where version constraints come from
///
/// Implementations must be safe to call concurrently for distinct packages.
#[async_trait]
pub trait VersionSource: Send + Sync {
    /// Version constraint to write into the manifest for `package`
    async fn resolve(&self, package: &PackageSpec) -> Result<String>;
}

/// Returns the built-in constraint for every package
#[derive(Debug, Clone, Copy, Default)]
pub struct PinnedVersions;

#[async_trait]
impl VersionSource for PinnedVersions {
    async fn resolve(&self, package: &PackageSpec) -> Result<String> {
        Ok(package.pinned.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_pinned_versions_return_literal() {
        let spec = PackageSpec::new("@bitbeat/core", "^0.0.1");
        let version = PinnedVersions.resolve(&spec).await.unwrap();
        assert_eq!(version, "^0.0.1");
    }
}
