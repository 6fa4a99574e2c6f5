//! Live version lookups against an npm-compatible registry
//!
//! Only the dist-tags endpoint is used:
//! `GET {base}/-/package/{name}/dist-tags` -> `{ "latest": "1.2.3", ... }`

use super::{PackageSpec, VersionSource};
use crate::error::{Result, ScaffoldError};
use crate::product::ProductConfig;
use async_trait::async_trait;
use reqwest::StatusCode;
use semver::Version;
use std::collections::HashMap;
use std::time::Duration;
use url::Url;

/// Dist-tag used when none is configured
pub const DEFAULT_DIST_TAG: &str = "latest";

/// Per-request timeout; a slow registry is reported as unavailable
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Resolves package versions from a registry's dist-tags
#[derive(Debug, Clone)]
pub struct RegistryResolver {
    base: Url,
    client: reqwest::Client,
    dist_tag: String,
}

impl RegistryResolver {
    /// Create a resolver with a custom user agent
    pub fn new(base: Url, user_agent: &str) -> Self {
        Self {
            base,
            client: reqwest::Client::builder()
                .user_agent(user_agent)
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            dist_tag: DEFAULT_DIST_TAG.to_string(),
        }
    }

    /// Resolver for a product
    ///
    /// The registry URL comes from `override_url`, then the product's env var,
    /// then the product default. The dist-tag is the product's.
    pub fn from_config<C: ProductConfig>(config: &C, override_url: Option<&str>) -> Result<Self> {
        let url_str = match override_url {
            Some(url) => url.to_string(),
            None => std::env::var(config.registry_url_env())
                .unwrap_or_else(|_| config.default_registry_url().to_string()),
        };
        let base = Self::parse_base(&url_str)?;
        Ok(Self::new(base, config.user_agent()).with_dist_tag(config.dist_tag()))
    }

    /// Parse and check a registry base URL
    pub fn parse_base(url_str: &str) -> Result<Url> {
        let url = Url::parse(url_str).map_err(|e| ScaffoldError::InvalidRegistryUrl {
            url: url_str.to_string(),
            reason: e.to_string(),
        })?;
        if url.cannot_be_a_base() {
            return Err(ScaffoldError::InvalidRegistryUrl {
                url: url_str.to_string(),
                reason: "URL cannot have path segments".to_string(),
            });
        }
        Ok(url)
    }

    /// Use a dist-tag other than `latest`
    pub fn with_dist_tag(mut self, tag: impl Into<String>) -> Self {
        self.dist_tag = tag.into();
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    pub fn dist_tag(&self) -> &str {
        &self.dist_tag
    }

    /// Build the dist-tags URL; scoped names become one encoded segment
    fn dist_tags_url(base: &Url, package: &str) -> Result<Url> {
        let mut url = base.clone();
        url.path_segments_mut()
            .map_err(|_| ScaffoldError::InvalidRegistryUrl {
                url: base.to_string(),
                reason: "URL cannot have path segments".to_string(),
            })?
            .pop_if_empty()
            .extend(["-", "package", package, "dist-tags"]);
        Ok(url)
    }

    /// Look up the version published under `dist_tag`
    pub async fn resolve_version(&self, package: &str, dist_tag: &str) -> Result<String> {
        let url = Self::dist_tags_url(&self.base, package)?;
        tracing::debug!(%url, package, dist_tag, "querying registry");

        let response = self.client.get(url.clone()).send().await.map_err(|e| {
            ScaffoldError::RegistryUnavailable {
                package: package.to_string(),
                reason: e.to_string(),
            }
        })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ScaffoldError::PackageNotFound {
                package: package.to_string(),
                tag: dist_tag.to_string(),
            });
        }
        if !status.is_success() {
            return Err(ScaffoldError::RegistryUnavailable {
                package: package.to_string(),
                reason: format!("HTTP {} from {}", status, url),
            });
        }

        let tags: HashMap<String, String> =
            response
                .json()
                .await
                .map_err(|e| ScaffoldError::RegistryUnavailable {
                    package: package.to_string(),
                    reason: format!("unreadable dist-tags response: {}", e),
                })?;

        tags.get(dist_tag)
            .cloned()
            .ok_or_else(|| ScaffoldError::PackageNotFound {
                package: package.to_string(),
                tag: dist_tag.to_string(),
            })
    }
}

/// Turn a published version into a manifest constraint
///
/// Valid semver gets a caret range; anything else is kept verbatim.
pub fn caret_constraint(package: &str, version: &str) -> String {
    let cleaned = version.trim();
    match Version::parse(cleaned) {
        Ok(v) => format!("^{}", v),
        Err(e) => {
            tracing::warn!(package, version, error = %e, "registry returned a non-semver version");
            cleaned.to_string()
        }
    }
}

#[async_trait]
impl VersionSource for RegistryResolver {
    async fn resolve(&self, package: &PackageSpec) -> Result<String> {
        let version = self.resolve_version(package.name, &self.dist_tag).await?;
        Ok(caret_constraint(package.name, &version))
    }
}
