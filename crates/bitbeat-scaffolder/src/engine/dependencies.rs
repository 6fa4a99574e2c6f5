//! Dependency set builder
//!
//! Maps the active features onto a fixed contribution table and resolves
//! every package through a `VersionSource`. Lookups run concurrently, but the
//! resulting maps follow the table order so manifests are reproducible.

use crate::error::{Result, ScaffoldError};
use crate::flags::FeatureFlags;
use crate::registry::{PackageSpec, VersionSource};
use futures::future::try_join_all;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Ordered package name -> version constraint map with unique keys
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DependencySpec(IndexMap<String, String>);

impl DependencySpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a package; declaring the same package twice is an error
    pub fn insert(&mut self, package: impl Into<String>, version: impl Into<String>) -> Result<()> {
        let package = package.into();
        if self.0.contains_key(&package) {
            return Err(ScaffoldError::DependencyCollision { package });
        }
        self.0.insert(package, version.into());
        Ok(())
    }

    pub fn get(&self, package: &str) -> Option<&str> {
        self.0.get(package).map(String::as_str)
    }

    pub fn contains(&self, package: &str) -> bool {
        self.0.contains_key(package)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn names(&self) -> Vec<&str> {
        self.0.keys().map(String::as_str).collect()
    }
}

/// Manifest section a package lands in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Runtime,
    Dev,
}

/// Feature a package belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    Base,
    WebServer,
    WebSocketServer,
    TypedDialect,
}

impl Feature {
    fn enabled(self, flags: &FeatureFlags) -> bool {
        match self {
            Feature::Base => true,
            Feature::WebServer => flags.web_server,
            Feature::WebSocketServer => flags.websocket_server,
            Feature::TypedDialect => flags.typescript,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Contribution {
    feature: Feature,
    section: Section,
    package: PackageSpec,
}

const fn row(feature: Feature, section: Section, name: &'static str, pinned: &'static str) -> Contribution {
    Contribution {
        feature,
        section,
        package: PackageSpec::new(name, pinned),
    }
}

/// Every package the scaffolder can emit, in manifest order
const CONTRIBUTIONS: &[Contribution] = &[
    row(Feature::Base, Section::Runtime, "@bitbeat/core", "^0.0.1"),
    row(Feature::Base, Section::Dev, "eslint", "^6.8.0"),
    row(Feature::Base, Section::Dev, "lint-staged", "^10.0.7"),
    row(Feature::Base, Section::Dev, "prettier", "1.19.1"),
    row(Feature::WebServer, Section::Runtime, "@bitbeat/web", "^0.0.1"),
    row(Feature::WebSocketServer, Section::Runtime, "@bitbeat/websocket", "^0.0.1"),
    row(Feature::TypedDialect, Section::Dev, "@types/debug", "^4.1.5"),
    row(Feature::TypedDialect, Section::Dev, "@types/ioredis", "^4.17.3"),
    row(Feature::TypedDialect, Section::Dev, "@types/node", "^13.7.0"),
    row(Feature::TypedDialect, Section::Dev, "@types/node-cron", "^2.0.3"),
    row(Feature::TypedDialect, Section::Dev, "@types/pino", "^6.3.0"),
    row(Feature::TypedDialect, Section::Dev, "@typescript-eslint/eslint-plugin", "^2.24.0"),
    row(Feature::TypedDialect, Section::Dev, "@typescript-eslint/parser", "^2.24.0"),
    row(Feature::TypedDialect, Section::Dev, "typescript", "^3.8.3"),
];

/// Resolved `dependencies` and `devDependencies`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedDependencies {
    pub dependencies: DependencySpec,
    pub dev_dependencies: DependencySpec,
}

impl ResolvedDependencies {
    fn section_mut(&mut self, section: Section) -> &mut DependencySpec {
        match section {
            Section::Runtime => &mut self.dependencies,
            Section::Dev => &mut self.dev_dependencies,
        }
    }

    pub fn len(&self) -> usize {
        self.dependencies.len() + self.dev_dependencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Packages the given flags pull in, in manifest order
pub fn required_packages(flags: &FeatureFlags) -> Vec<(Section, PackageSpec)> {
    CONTRIBUTIONS
        .iter()
        .filter(|c| c.feature.enabled(flags))
        .map(|c| (c.section, c.package))
        .collect()
}

/// Resolve the full dependency set for `flags`
///
/// Fails as a whole with `DependencyResolutionFailed` naming the first
/// package whose lookup failed.
pub async fn build_dependencies<S>(flags: &FeatureFlags, source: &S) -> Result<ResolvedDependencies>
where
    S: VersionSource + ?Sized,
{
    flags.validate()?;

    let wanted = required_packages(flags);
    tracing::debug!(count = wanted.len(), "resolving dependency versions");

    let lookups = wanted.iter().map(|(_, package)| async move {
        source
            .resolve(package)
            .await
            .map_err(|e| ScaffoldError::DependencyResolutionFailed {
                package: package.name.to_string(),
                source: Box::new(e),
            })
    });
    // try_join_all keeps input order regardless of completion order
    let versions = try_join_all(lookups).await?;

    let mut resolved = ResolvedDependencies::default();
    for ((section, package), version) in wanted.into_iter().zip(versions) {
        tracing::debug!(package = package.name, %version, "resolved");
        resolved.section_mut(section).insert(package.name, version)?;
    }

    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::PinnedVersions;
    use async_trait::async_trait;
    use std::time::Duration;

    /// Answers later packages faster so completion order is reversed
    struct ReversedLatency {
        total: usize,
    }

    #[async_trait]
    impl VersionSource for ReversedLatency {
        async fn resolve(&self, package: &PackageSpec) -> Result<String> {
            let index = CONTRIBUTIONS
                .iter()
                .position(|c| c.package.name == package.name)
                .unwrap_or(0);
            let delay = (self.total - index) as u64 * 5;
            tokio::time::sleep(Duration::from_millis(delay)).await;
            Ok(format!("^1.0.{}", index))
        }
    }

    struct MissingPackage(&'static str);

    #[async_trait]
    impl VersionSource for MissingPackage {
        async fn resolve(&self, package: &PackageSpec) -> Result<String> {
            if package.name == self.0 {
                Err(ScaffoldError::PackageNotFound {
                    package: package.name.to_string(),
                    tag: "latest".to_string(),
                })
            } else {
                Ok(package.pinned.to_string())
            }
        }
    }

    fn all_features() -> FeatureFlags {
        FeatureFlags {
            typescript: true,
            web_server: true,
            websocket_server: true,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_base_set_only() {
        let deps = build_dependencies(&FeatureFlags::default(), &PinnedVersions)
            .await
            .unwrap();

        assert_eq!(deps.dependencies.names(), vec!["@bitbeat/core"]);
        assert_eq!(
            deps.dev_dependencies.names(),
            vec!["eslint", "lint-staged", "prettier"]
        );
        assert_eq!(deps.dev_dependencies.get("prettier"), Some("1.19.1"));
    }

    #[tokio::test]
    async fn test_features_merge_in_priority_order() {
        let deps = build_dependencies(&all_features(), &PinnedVersions)
            .await
            .unwrap();

        assert_eq!(
            deps.dependencies.names(),
            vec!["@bitbeat/core", "@bitbeat/web", "@bitbeat/websocket"]
        );
        assert_eq!(deps.dev_dependencies.len(), 11);
        assert_eq!(deps.dev_dependencies.names().last(), Some(&"typescript"));
        assert_eq!(deps.len(), 14);
    }

    #[tokio::test]
    async fn test_order_ignores_completion_order() {
        let source = ReversedLatency {
            total: CONTRIBUTIONS.len(),
        };
        let deps = build_dependencies(&all_features(), &source).await.unwrap();
        let pinned = build_dependencies(&all_features(), &PinnedVersions)
            .await
            .unwrap();

        assert_eq!(deps.dependencies.names(), pinned.dependencies.names());
        assert_eq!(deps.dev_dependencies.names(), pinned.dev_dependencies.names());
        assert_eq!(deps.dependencies.get("@bitbeat/core"), Some("^1.0.0"));
    }

    #[tokio::test]
    async fn test_failure_names_package() {
        let err = build_dependencies(&all_features(), &MissingPackage("@bitbeat/websocket"))
            .await
            .unwrap_err();

        match err {
            ScaffoldError::DependencyResolutionFailed { package, source } => {
                assert_eq!(package, "@bitbeat/websocket");
                assert!(matches!(*source, ScaffoldError::PackageNotFound { .. }));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_invalid_flags_rejected_before_lookup() {
        let flags = FeatureFlags {
            status_action: true,
            ..Default::default()
        };
        let err = build_dependencies(&flags, &PinnedVersions)
            .await
            .unwrap_err();
        assert!(matches!(err, ScaffoldError::InvalidFeatureCombination(_)));
    }

    #[test]
    fn test_collision_is_an_error() {
        let mut spec = DependencySpec::new();
        spec.insert("eslint", "^6.8.0").unwrap();
        let err = spec.insert("eslint", "^7.0.0").unwrap_err();
        assert!(matches!(err, ScaffoldError::DependencyCollision { package } if package == "eslint"));
        assert_eq!(spec.get("eslint"), Some("^6.8.0"));
    }

    #[test]
    fn test_catalog_has_unique_names() {
        let mut seen = std::collections::HashSet::new();
        for c in CONTRIBUTIONS {
            assert!(seen.insert(c.package.name), "duplicate {}", c.package.name);
        }
    }
}
