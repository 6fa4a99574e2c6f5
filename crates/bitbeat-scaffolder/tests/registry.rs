use bitbeat_scaffolder::engine::dependencies::required_packages;
use bitbeat_scaffolder::registry::{PackageSpec, RegistryResolver, VersionSource};
use bitbeat_scaffolder::scaffold::generate_project;
use bitbeat_scaffolder::{FeatureFlags, ProjectMetadata, ScaffoldError};
use httpmock::prelude::*;
use serde_json::json;
use tempfile::tempdir;

fn resolver(server: &MockServer) -> RegistryResolver {
    let base = RegistryResolver::parse_base(&server.base_url()).unwrap();
    RegistryResolver::new(base, "bitbeat-test")
}

#[tokio::test]
async fn resolves_latest_from_dist_tags() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/-/package/left-pad/dist-tags");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({ "latest": "1.3.0", "next": "2.0.0-rc.1" }));
        })
        .await;

    let version = resolver(&server)
        .resolve_version("left-pad", "latest")
        .await
        .unwrap();

    assert_eq!(version, "1.3.0");
    mock.assert_async().await;
}

#[tokio::test]
async fn configured_dist_tag_becomes_caret_constraint() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/-/package/left-pad/dist-tags");
            then.status(200)
                .json_body(json!({ "latest": "1.3.0", "next": "2.0.0-rc.1" }));
        })
        .await;

    let source = resolver(&server).with_dist_tag("next");
    let constraint = source
        .resolve(&PackageSpec::new("left-pad", "^1.0.0"))
        .await
        .unwrap();

    assert_eq!(constraint, "^2.0.0-rc.1");
}

#[tokio::test]
async fn missing_package_is_not_found() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/-/package/nope/dist-tags");
            then.status(404).body("Not Found");
        })
        .await;

    let err = resolver(&server)
        .resolve_version("nope", "latest")
        .await
        .unwrap_err();

    assert!(matches!(err, ScaffoldError::PackageNotFound { ref package, .. } if package == "nope"));
}

#[tokio::test]
async fn missing_tag_is_not_found() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/-/package/left-pad/dist-tags");
            then.status(200).json_body(json!({ "latest": "1.3.0" }));
        })
        .await;

    let err = resolver(&server)
        .resolve_version("left-pad", "beta")
        .await
        .unwrap_err();

    assert!(matches!(err, ScaffoldError::PackageNotFound { ref tag, .. } if tag == "beta"));
}

#[tokio::test]
async fn server_error_is_unavailable() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET);
            then.status(503);
        })
        .await;

    let err = resolver(&server)
        .resolve_version("left-pad", "latest")
        .await
        .unwrap_err();

    assert!(matches!(err, ScaffoldError::RegistryUnavailable { .. }));
}

#[tokio::test]
async fn unreachable_registry_is_unavailable() {
    // grab a free port, then close it again
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let base = RegistryResolver::parse_base(&format!("http://127.0.0.1:{}", port)).unwrap();

    let err = RegistryResolver::new(base, "bitbeat-test")
        .resolve_version("left-pad", "latest")
        .await
        .unwrap_err();

    assert!(matches!(err, ScaffoldError::RegistryUnavailable { .. }));
}

#[tokio::test]
async fn not_found_aborts_run_without_manifest() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET);
            then.status(404);
        })
        .await;
    let dir = tempdir().unwrap();
    let flags = FeatureFlags {
        web_server: true,
        ..Default::default()
    };

    let err = generate_project(
        &ProjectMetadata::new("demo"),
        &flags,
        &resolver(&server),
        dir.path(),
    )
    .await
    .unwrap_err();

    match err {
        ScaffoldError::DependencyResolutionFailed { package, source } => {
            let required: Vec<&str> = required_packages(&flags)
                .iter()
                .map(|(_, spec)| spec.name)
                .collect();
            assert!(required.contains(&package.as_str()));
            assert!(matches!(*source, ScaffoldError::PackageNotFound { .. }));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!dir.path().join("package.json").exists());
    assert!(!dir.path().join("boot.js").exists());
}

#[tokio::test]
async fn live_versions_flow_into_manifest() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET);
            then.status(200).json_body(json!({ "latest": "2.1.0" }));
        })
        .await;
    let dir = tempdir().unwrap();
    let flags = FeatureFlags {
        web_server: true,
        websocket_server: true,
        ..Default::default()
    };

    let (plan, report) = generate_project(
        &ProjectMetadata::new("demo"),
        &flags,
        &resolver(&server),
        dir.path(),
    )
    .await
    .unwrap();

    // core, eslint, lint-staged, prettier, web, websocket
    mock.assert_hits_async(6).await;
    assert_eq!(plan.manifest.dependencies.get("@bitbeat/web"), Some("^2.1.0"));
    assert!(report.written.contains(&"boot.js".to_string()));

    let manifest: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join("package.json")).unwrap())
            .unwrap();
    assert_eq!(manifest["dependencies"]["@bitbeat/websocket"], json!("^2.1.0"));
    assert_eq!(manifest["devDependencies"]["prettier"], json!("^2.1.0"));
}
