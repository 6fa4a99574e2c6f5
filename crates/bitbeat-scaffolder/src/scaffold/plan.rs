//! Project planning - everything a run produces, before any file is written

use crate::engine::{
    build_dependencies, build_graph, compose_manifest, render, PackageManifest, ProjectMetadata,
};
use crate::error::Result;
use crate::flags::FeatureFlags;
use crate::registry::VersionSource;

/// Empty directories offered by the placeholder option
pub const PLACEHOLDER_DIRECTORIES: &[&str] = &[
    "actions",
    "config",
    "connections",
    "initializers",
    "middlewares",
    "servers",
    "tasks",
    "public",
    "log",
    "utils",
];

/// A config file shipped with the scaffolder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticFile {
    pub path: &'static str,
    pub contents: &'static str,
}

/// Config files for the TypeScript dialect
pub const TYPESCRIPT_FILES: &[StaticFile] = &[
    StaticFile {
        path: ".eslintrc.js",
        contents: include_str!("../../templates/typescript/.eslintrc.js"),
    },
    StaticFile {
        path: "tsconfig.json",
        contents: include_str!("../../templates/typescript/tsconfig.json"),
    },
];

/// The rendered startup module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedModule {
    pub file_name: String,
    pub contents: String,
}

/// Complete, in-memory result of one generation run
#[derive(Debug, Clone)]
pub struct ProjectPlan {
    pub flags: FeatureFlags,
    pub manifest: PackageManifest,
    /// Absent when no server feature is selected
    pub boot: Option<GeneratedModule>,
    pub static_files: Vec<StaticFile>,
    pub placeholder_dirs: Vec<&'static str>,
}

impl ProjectPlan {
    /// Relative paths of every file the plan writes
    pub fn file_names(&self) -> Vec<String> {
        let mut names = vec!["package.json".to_string()];
        names.extend(self.static_files.iter().map(|f| f.path.to_string()));
        names.extend(self.boot.iter().map(|b| b.file_name.clone()));
        names
    }
}

/// Resolve, assemble and render a project for `flags`
///
/// Fails before producing anything if the flags are inconsistent or any
/// dependency cannot be resolved.
pub async fn plan_project<S>(
    meta: &ProjectMetadata,
    flags: &FeatureFlags,
    source: &S,
) -> Result<ProjectPlan>
where
    S: VersionSource + ?Sized,
{
    // graph first: it is cheap and rejects bad flags before any network call
    let graph = build_graph(flags)?;
    let deps = build_dependencies(flags, source).await?;

    let dialect = flags.dialect();
    let manifest = compose_manifest(meta, &deps, dialect);

    let boot = flags.has_server().then(|| GeneratedModule {
        file_name: dialect.boot_file_name(),
        contents: render(&graph, dialect),
    });

    let static_files = if flags.typescript {
        TYPESCRIPT_FILES.to_vec()
    } else {
        Vec::new()
    };

    let placeholder_dirs = if flags.placeholder_directories {
        PLACEHOLDER_DIRECTORIES.to_vec()
    } else {
        Vec::new()
    };

    tracing::debug!(
        dependencies = deps.len(),
        boot = boot.is_some(),
        static_files = static_files.len(),
        "planned project"
    );

    Ok(ProjectPlan {
        flags: *flags,
        manifest,
        boot,
        static_files,
        placeholder_dirs,
    })
}
