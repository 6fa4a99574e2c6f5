//! Project planning and writing
//!
//! This module provides:
//! - `plan_project`: runs the engine and returns a complete `ProjectPlan`
//! - `write_project`: materializes a plan on disk and reports what it did
//!
//! Planning always completes before writing starts, so a failed lookup never
//! leaves a half-written manifest behind.

pub mod plan;
pub mod writer;

use crate::engine::ProjectMetadata;
use crate::error::Result;
use crate::flags::FeatureFlags;
use crate::registry::VersionSource;
use std::path::Path;

pub use plan::{plan_project, GeneratedModule, ProjectPlan, StaticFile, PLACEHOLDER_DIRECTORIES};
pub use writer::{write_project, WriteReport, MANIFEST_FILE};

/// Plan and write a project in one go
pub async fn generate_project<S>(
    meta: &ProjectMetadata,
    flags: &FeatureFlags,
    source: &S,
    target_dir: &Path,
) -> Result<(ProjectPlan, WriteReport)>
where
    S: VersionSource + ?Sized,
{
    let plan = plan_project(meta, flags, source).await?;
    let report = write_project(&plan, target_dir).await?;
    Ok((plan, report))
}
