//! Assembly of bitbeat server projects from feature flags
//!
//! Given a [`FeatureFlags`] value and a [`VersionSource`], the crate produces a
//! `package.json` with resolved dependency versions and, when a server is
//! selected, a startup module (`boot.ts` or `boot.js`).
//!
//! Modules, from the inside out:
//!
//! - `engine`: dependency set, module graph, dialect rendering and manifest
//!   composition. No file system access.
//! - `registry`: where version constraints come from (live or pinned).
//! - `scaffold`: plans a run in memory, then writes it to a directory.
//! - `runtime` / `config`: package manager install, runtime probes, answers
//!   files.
//! - `tui` (cargo feature `tui`, on by default): the cliclack prompt flow.
//!
//! ```ignore
//! use bitbeat_scaffolder::{scaffold, FeatureFlags, PinnedVersions, ProjectMetadata};
//!
//! let flags = FeatureFlags { web_server: true, typescript: true, ..Default::default() };
//! let plan = scaffold::plan_project(&ProjectMetadata::new("my-api"), &flags, &PinnedVersions).await?;
//! scaffold::write_project(&plan, "my-api".as_ref()).await?;
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod flags;
pub mod product;
pub mod registry;
pub mod runtime;
pub mod scaffold;

#[cfg(feature = "tui")]
pub mod tui;

pub use engine::{
    build_dependencies, build_graph, compose_manifest, render, ModuleGraph, PackageManifest,
    ProjectMetadata,
};
pub use error::ScaffoldError;
pub use flags::{Dialect, FeatureFlags, PackageManager};
pub use product::ProductConfig;
pub use registry::{PinnedVersions, RegistryResolver, VersionSource};
pub use scaffold::{plan_project, write_project, ProjectPlan, WriteReport};

#[cfg(feature = "tui")]
pub use tui::run;
