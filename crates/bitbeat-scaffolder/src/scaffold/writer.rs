//! Writes a planned project into a directory

use super::plan::ProjectPlan;
use crate::engine::merge_manifest;
use crate::error::{Result, ScaffoldError};
use serde_json::Value;
use std::io::ErrorKind;
use std::path::Path;
use tokio::fs;

pub const MANIFEST_FILE: &str = "package.json";

/// What a write pass did, as paths relative to the project directory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteReport {
    pub written: Vec<String>,
    /// Placeholder directories that already existed
    pub skipped: Vec<String>,
}

/// Create `path` as a fresh directory; an existing entry is a conflict
async fn create_placeholder_dir(path: &Path) -> Result<()> {
    match fs::create_dir(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::AlreadyExists => Err(ScaffoldError::FileSystemConflict {
            path: path.to_path_buf(),
        }),
        Err(e) => Err(ScaffoldError::io(path, e)),
    }
}

/// Read an existing manifest, `None` when there is none
async fn read_manifest(path: &Path) -> Result<Option<Value>> {
    match fs::read_to_string(path).await {
        Ok(content) => serde_json::from_str(&content)
            .map(Some)
            .map_err(|source| ScaffoldError::Json {
                path: path.to_path_buf(),
                source,
            }),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(ScaffoldError::io(path, e)),
    }
}

async fn write_file(path: &Path, contents: &[u8]) -> Result<()> {
    fs::write(path, contents)
        .await
        .map_err(|e| ScaffoldError::io(path, e))
}

/// Materialize `plan` under `target_dir`
///
/// The manifest is merged into any existing `package.json`; placeholder
/// directories that already exist are skipped, not treated as errors.
pub async fn write_project(plan: &ProjectPlan, target_dir: &Path) -> Result<WriteReport> {
    fs::create_dir_all(target_dir)
        .await
        .map_err(|e| ScaffoldError::io(target_dir, e))?;

    let mut report = WriteReport::default();

    for dir in &plan.placeholder_dirs {
        match create_placeholder_dir(&target_dir.join(dir)).await {
            Ok(()) => report.written.push(format!("{}/", dir)),
            Err(ScaffoldError::FileSystemConflict { path }) => {
                tracing::info!(path = %path.display(), "skipped creation, already exists");
                report.skipped.push(dir.to_string());
            }
            Err(e) => return Err(e),
        }
    }

    for file in &plan.static_files {
        write_file(&target_dir.join(file.path), file.contents.as_bytes()).await?;
        report.written.push(file.path.to_string());
    }

    let manifest_path = target_dir.join(MANIFEST_FILE);
    let existing = read_manifest(&manifest_path).await?;
    let merged = merge_manifest(existing, &plan.manifest)?;
    let mut text = serde_json::to_string_pretty(&merged)?;
    text.push('\n');
    write_file(&manifest_path, text.as_bytes()).await?;
    report.written.push(MANIFEST_FILE.to_string());

    if let Some(boot) = &plan.boot {
        write_file(&target_dir.join(&boot.file_name), boot.contents.as_bytes()).await?;
        report.written.push(boot.file_name.clone());
    }

    tracing::debug!(
        written = report.written.len(),
        skipped = report.skipped.len(),
        dir = %target_dir.display(),
        "project written"
    );

    Ok(report)
}
