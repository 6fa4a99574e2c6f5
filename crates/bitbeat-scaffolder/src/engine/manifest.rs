//! Manifest composer (`package.json`)

use super::dependencies::{DependencySpec, ResolvedDependencies};
use crate::error::Result;
use crate::flags::Dialect;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

const LICENSE: &str = "MIT";
const START_SCRIPT: &str = "node ./node_modules/@bitbeat/core/bin/index.js";

/// Identity fields collected from the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectMetadata {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub author: Option<String>,
}

impl ProjectMetadata {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: "1.0.0".to_string(),
            description: String::new(),
            author: None,
        }
    }
}

/// The manifest this scaffolder contributes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageManifest {
    pub name: String,
    pub version: String,
    pub description: String,
    pub scripts: IndexMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    pub license: String,
    pub dependencies: DependencySpec,
    pub dev_dependencies: DependencySpec,
}

impl PackageManifest {
    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Build the manifest for the resolved dependencies and dialect
pub fn compose_manifest(
    meta: &ProjectMetadata,
    deps: &ResolvedDependencies,
    dialect: Dialect,
) -> PackageManifest {
    let mut scripts = IndexMap::new();
    scripts.insert("start".to_string(), START_SCRIPT.to_string());
    if dialect == Dialect::TypeScript {
        scripts.insert("build".to_string(), "npx tsc".to_string());
        scripts.insert("watch".to_string(), "npx tsc --watch".to_string());
    }

    PackageManifest {
        name: meta.name.clone(),
        version: meta.version.clone(),
        description: meta.description.clone(),
        scripts,
        author: meta.author.clone().filter(|a| !a.trim().is_empty()),
        license: LICENSE.to_string(),
        dependencies: deps.dependencies.clone(),
        dev_dependencies: deps.dev_dependencies.clone(),
    }
}

/// Recursively merge `patch` into `target`; objects union, anything else is replaced
fn deep_merge(target: &mut Value, patch: Value) {
    match (target, patch) {
        (Value::Object(target), Value::Object(patch)) => {
            for (key, value) in patch {
                match target.get_mut(&key) {
                    Some(existing) => deep_merge(existing, value),
                    None => {
                        target.insert(key, value);
                    }
                }
            }
        }
        (target, patch) => *target = patch,
    }
}

/// Merge `manifest` into an existing `package.json` document
///
/// Keys already present and not produced by the scaffolder are kept;
/// conflicting keys take the scaffolder's value. Merging the same manifest
/// again leaves the document unchanged.
pub fn merge_manifest(existing: Option<Value>, manifest: &PackageManifest) -> Result<Value> {
    let mut document = match existing {
        Some(value @ Value::Object(_)) => value,
        Some(other) => {
            tracing::warn!(kind = %json_kind(&other), "existing package.json is not an object, replacing it");
            Value::Object(Default::default())
        }
        None => Value::Object(Default::default()),
    };
    deep_merge(&mut document, manifest.to_value()?);
    Ok(document)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn deps() -> ResolvedDependencies {
        let mut deps = ResolvedDependencies::default();
        deps.dependencies.insert("@bitbeat/core", "^0.0.1").unwrap();
        deps.dev_dependencies.insert("eslint", "^6.8.0").unwrap();
        deps
    }

    fn meta() -> ProjectMetadata {
        ProjectMetadata {
            name: "demo".to_string(),
            version: "1.0.0".to_string(),
            description: "A demo".to_string(),
            author: None,
        }
    }

    #[test]
    fn test_typescript_manifest_shape() {
        let manifest = compose_manifest(&meta(), &deps(), Dialect::TypeScript);
        assert_eq!(
            manifest.to_value().unwrap(),
            json!({
                "name": "demo",
                "version": "1.0.0",
                "description": "A demo",
                "scripts": {
                    "start": "node ./node_modules/@bitbeat/core/bin/index.js",
                    "build": "npx tsc",
                    "watch": "npx tsc --watch"
                },
                "license": "MIT",
                "dependencies": { "@bitbeat/core": "^0.0.1" },
                "devDependencies": { "eslint": "^6.8.0" }
            })
        );
    }

    #[test]
    fn test_javascript_manifest_has_only_start() {
        let mut meta = meta();
        meta.author = Some("Ada".to_string());
        let manifest = compose_manifest(&meta, &deps(), Dialect::JavaScript);

        assert_eq!(manifest.scripts.keys().collect::<Vec<_>>(), vec!["start"]);
        assert_eq!(manifest.to_value().unwrap()["author"], json!("Ada"));
    }

    #[test]
    fn test_blank_author_omitted() {
        let mut meta = meta();
        meta.author = Some("  ".to_string());
        let manifest = compose_manifest(&meta, &deps(), Dialect::JavaScript);
        assert!(manifest.to_value().unwrap().get("author").is_none());
    }

    #[test]
    fn test_serialized_key_order() {
        let manifest = compose_manifest(&meta(), &deps(), Dialect::JavaScript);
        let text = serde_json::to_string(&manifest).unwrap();
        let position = |key: &str| text.find(&format!("\"{}\"", key)).unwrap();
        assert!(position("name") < position("scripts"));
        assert!(position("license") < position("dependencies"));
        assert!(position("dependencies") < position("devDependencies"));
    }

    #[test]
    fn test_merge_keeps_unrelated_keys() {
        let existing = json!({
            "private": true,
            "name": "old-name",
            "scripts": { "test": "jest" },
            "dependencies": { "lodash": "^4.17.0" }
        });
        let manifest = compose_manifest(&meta(), &deps(), Dialect::JavaScript);
        let merged = merge_manifest(Some(existing), &manifest).unwrap();

        assert_eq!(merged["private"], json!(true));
        assert_eq!(merged["name"], json!("demo"));
        assert_eq!(merged["scripts"]["test"], json!("jest"));
        assert_eq!(
            merged["scripts"]["start"],
            json!("node ./node_modules/@bitbeat/core/bin/index.js")
        );
        assert_eq!(merged["dependencies"]["lodash"], json!("^4.17.0"));
        assert_eq!(merged["dependencies"]["@bitbeat/core"], json!("^0.0.1"));
    }

    #[test]
    fn test_merge_twice_is_stable() {
        let existing = json!({ "keywords": ["bitbeat"], "scripts": { "lint": "eslint ." } });
        let manifest = compose_manifest(&meta(), &deps(), Dialect::TypeScript);

        let once = merge_manifest(Some(existing), &manifest).unwrap();
        let twice = merge_manifest(Some(once.clone()), &manifest).unwrap();

        assert_eq!(once, twice);
        assert_eq!(
            serde_json::to_string(&once).unwrap(),
            serde_json::to_string(&twice).unwrap()
        );
        assert_eq!(twice["keywords"], json!(["bitbeat"]));
    }

    #[test]
    fn test_merge_replaces_non_object_document() {
        let manifest = compose_manifest(&meta(), &deps(), Dialect::JavaScript);
        let merged = merge_manifest(Some(json!([1, 2])), &manifest).unwrap();
        assert_eq!(merged["name"], json!("demo"));
    }
}
