//! Identity of a scaffolding binary
//!
//! A binary hands an implementation of [`ProductConfig`] to the prompt flow;
//! the library reads its registry settings and post-run instructions from it.

use crate::flags::FeatureFlags;
use crate::registry::DEFAULT_DIST_TAG;
use std::path::Path;

/// What the library needs to know about the binary driving it
pub trait ProductConfig: Clone + Send + Sync + 'static {
    /// Command name; also sent as the registry user agent
    fn name(&self) -> &'static str;

    /// Name shown in the intro banner
    fn display_name(&self) -> &'static str;

    /// One-line description shown under the banner
    fn cli_description(&self) -> &'static str;

    fn docs_url(&self) -> &'static str;

    /// Registry queried when neither a flag nor the env var names one
    fn default_registry_url(&self) -> &'static str;

    /// Env var that overrides [`ProductConfig::default_registry_url`]
    fn registry_url_env(&self) -> &'static str;

    /// Dist-tag looked up for every package
    fn dist_tag(&self) -> &'static str {
        DEFAULT_DIST_TAG
    }

    fn user_agent(&self) -> &'static str {
        self.name()
    }

    /// Instructions printed once the project is on disk
    ///
    /// `installed` is false when installation was skipped or impossible.
    fn next_steps(&self, dir: &Path, flags: &FeatureFlags, installed: bool) -> Vec<String>;
}
