//! The assembly engine
//!
//! This module provides:
//! - Dependency resolution from feature flags (`dependencies`)
//! - The structured startup module (`graph`) and its two renderings (`render`)
//! - Deterministic source formatting (`format`)
//! - `package.json` composition and merging (`manifest`)
//!
//! Nothing in here touches the file system; the only suspension point is the
//! version lookup behind `VersionSource`.

pub mod dependencies;
pub mod format;
pub mod graph;
pub mod manifest;
pub mod render;

pub use dependencies::{build_dependencies, DependencySpec, ResolvedDependencies};
pub use format::format_source;
pub use graph::{build_graph, ImportGroup, ModuleGraph, RegistrationEntry, UnifyPreamble};
pub use manifest::{compose_manifest, merge_manifest, PackageManifest, ProjectMetadata};
pub use render::render;
