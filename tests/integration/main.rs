//! Integration tests for Trellis
//!
//! These tests drive the config, catalog, finder and report together, and run
//! the CLI binary against files on disk.

use std::path::Path;
use std::process::Command;
use std::sync::Arc;
use tempfile::TempDir;
use trellis_core::DiscoveryReport;
use trellis_discovery::{DiagnosticKind, DiscoveryConfig, TypeCatalog};

const CATALOG: &str = r#"{
  "types": [
    {
      "name": "Shop.Web.OrderController",
      "visibility": "public",
      "size": 80,
      "markers": [
        {
          "name": "Trellis.Annotations.UsedByPersonAttribute",
          "origin": "Trellis.Annotations",
          "arguments": { "name": "Customer", "description": "Places orders" }
        }
      ],
      "fields": [
        { "name": "repository", "type": "Shop.Web.Data.OrderRepository" },
        { "name": "mapper", "type": "Shop.Web.OrderMapper" }
      ]
    },
    {
      "name": "Shop.Web.Data.OrderRepository",
      "visibility": "public",
      "size": 40,
      "methods": [
        { "name": "Load", "return_type": "System.Collections.Generic.List<Shop.Web.Order>" }
      ]
    },
    {
      "name": "Shop.Web.OrderMapper",
      "visibility": "internal",
      "category": "static-class",
      "size": 12
    },
    { "name": "Shop.Web.Order", "visibility": "public" },
    {
      "name": "Shop.Web.AuditService",
      "visibility": "public",
      "markers": [
        {
          "name": "Trellis.Annotations.ComponentAttribute",
          "origin": "Trellis.Annotations",
          "arguments": { "description": "Records changes" }
        },
        {
          "name": "Trellis.Annotations.UsesContainerAttribute",
          "origin": "Trellis.Annotations",
          "arguments": { "name": "Ledger" }
        }
      ]
    },
    { "name": "Shop.Web.Tests.OrderControllerTests", "visibility": "public" }
  ]
}"#;

const CONFIG: &str = r#"
namespace = "Shop.Web"
system = "Shop"
container = "Web"
container_technology = "ASP.NET Core"
exclude_globs = ["Shop.Web.Tests.*"]

[[people]]
name = "Customer"

[[containers]]
system = "Shop"
name = "Database"

[[strategies]]
kind = "type-matcher"
[[strategies.matchers]]
kind = "name-suffix"
target = "Controller"
technology = "MVC"

[[strategies.matchers]]
kind = "name-suffix"
target = "Repository"
description = "Data access"

[[strategies]]
kind = "markers"
"#;

fn write_inputs(dir: &Path) {
    std::fs::write(dir.join("types.json"), CATALOG).unwrap();
    std::fs::write(dir.join("trellis.toml"), CONFIG).unwrap();
}

/// Test the full pipeline from files on disk to a report
#[test]
fn test_discovery_pipeline() {
    let temp_dir = TempDir::new().unwrap();
    write_inputs(temp_dir.path());

    let config = DiscoveryConfig::load(&temp_dir.path().join("trellis.toml")).unwrap();
    let catalog = TypeCatalog::load(&temp_dir.path().join("types.json")).unwrap();
    assert_eq!(catalog.len(), 6);

    let (mut model, container) = config.build_model().unwrap();
    let mut finder = config.build_finder(Arc::new(catalog), container).unwrap();
    let outcome = finder.find_components(&mut model).unwrap();

    assert_eq!(outcome.components.len(), 3);
    assert_eq!(outcome.diagnostics.len(), 1);
    assert_eq!(outcome.diagnostics[0].kind, DiagnosticKind::MissingContainer);
    assert_eq!(outcome.diagnostics[0].missing, "Ledger");

    let diagnostics = outcome.diagnostics.iter().map(ToString::to_string).collect();
    let report = DiscoveryReport::from_model(&model, container, &config.namespace, diagnostics);

    let names: Vec<&str> = report.components.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["AuditService", "OrderRepository", "OrderController"]);

    let controller = &report.components[2];
    assert_eq!(controller.technology, "MVC");
    assert_eq!(controller.size, Some(92));
    assert!(
        controller
            .code_elements
            .iter()
            .any(|c| c.type_name == "Shop.Web.OrderMapper")
    );

    // Customer -> controller, controller -> repository.
    assert_eq!(report.relationship_count, 2);
    assert!(report.relationships.iter().any(|r| {
        r.source == "Person://Customer"
            && r.destination == "Component://Shop.Web.OrderController"
            && r.description == "Places orders"
    }));
}

/// Test that a second run over the same model changes nothing
#[test]
fn test_rerun_is_stable() {
    let temp_dir = TempDir::new().unwrap();
    write_inputs(temp_dir.path());

    let config = DiscoveryConfig::load(&temp_dir.path().join("trellis.toml")).unwrap();
    let catalog = TypeCatalog::load(&temp_dir.path().join("types.json")).unwrap();
    let (mut model, container) = config.build_model().unwrap();
    let mut finder = config.build_finder(Arc::new(catalog), container).unwrap();

    let first = finder.find_components(&mut model).unwrap();
    let elements = model.element_count();
    let relationships = model.relationship_count();
    let second = finder.find_components(&mut model).unwrap();

    assert_eq!(first.components, second.components);
    assert_eq!(model.element_count(), elements);
    assert_eq!(model.relationship_count(), relationships);
}

/// Test that the CLI writes a JSON report
#[test]
fn test_cli_discover_json() {
    let temp_dir = TempDir::new().unwrap();
    write_inputs(temp_dir.path());
    let report_path = temp_dir.path().join("report.json");

    let status = Command::new(env!("CARGO_BIN_EXE_trellis"))
        .arg("discover")
        .arg("--catalog")
        .arg(temp_dir.path().join("types.json"))
        .arg("--config")
        .arg(temp_dir.path().join("trellis.toml"))
        .args(["--format", "json", "--output"])
        .arg(&report_path)
        .status()
        .expect("Failed to execute trellis");
    assert!(status.success());

    let json = std::fs::read_to_string(&report_path).unwrap();
    let report: DiscoveryReport = serde_json::from_str(&json).unwrap();
    assert_eq!(report.container, "Container://Shop.Web");
    assert_eq!(report.component_count, 3);
}

/// Test that a missing catalog is reported as a failure
#[test]
fn test_cli_missing_catalog() {
    let temp_dir = TempDir::new().unwrap();
    write_inputs(temp_dir.path());

    let output = Command::new(env!("CARGO_BIN_EXE_trellis"))
        .arg("discover")
        .arg("--catalog")
        .arg(temp_dir.path().join("nope.json"))
        .arg("--config")
        .arg(temp_dir.path().join("trellis.toml"))
        .output()
        .expect("Failed to execute trellis");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to load catalog"));
}

#[test]
fn test_cli_types_listing() {
    let temp_dir = TempDir::new().unwrap();
    write_inputs(temp_dir.path());

    let output = Command::new(env!("CARGO_BIN_EXE_trellis"))
        .args(["types", "--namespace", "Shop.Web.Data", "--catalog"])
        .arg(temp_dir.path().join("types.json"))
        .output()
        .expect("Failed to execute trellis");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim(), "Shop.Web.Data.OrderRepository (public class)");
}
