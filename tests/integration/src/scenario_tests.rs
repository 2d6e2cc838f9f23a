//! End-to-end generation scenarios
//!
//! Each test builds a packages directory and manifests on disk, runs the
//! full manifest -> registry -> fragments flow, and inspects the files
//! written.

use cbt_core::{Error, GeneratorConfig, ModulePropertyGenerator};
use cbt_fs::NormalizedPath;
use cbt_test_utils::TestPackages;
use pretty_assertions::assert_eq;

/// `Project` attribute of every import in a rendered fragment, in order.
fn import_projects(fragment: &str) -> Vec<String> {
    fragment
        .split("<Import Project=\"")
        .skip(1)
        .filter_map(|rest| rest.split('"').next())
        .map(str::to_string)
        .collect()
}

#[test]
fn single_module_gets_property_and_guarded_import() {
    let fixture = TestPackages::new();
    let manifest = fixture.packages_config("packages.config", &[("PackageA", "1.0.0")]);
    let prefix = fixture.packages_root().to_dir_prefix();

    let generator =
        ModulePropertyGenerator::new(&fixture.packages_root(), &[manifest], GeneratorConfig::default())
            .unwrap();
    generator
        .generate(&fixture.path("obj/modules.props"), &fixture.path("obj/Extensions"))
        .unwrap();

    let primary = fixture.read("obj/modules.props");
    assert!(primary.contains(&format!(
        "<CBTModule_PackageA>{prefix}PackageA.1.0.0</CBTModule_PackageA>"
    )));

    let expected_import = format!("{prefix}PackageA.1.0.0/CBT/Module/$(MSBuildThisFile)");
    assert_eq!(import_projects(&primary), vec![expected_import.clone()]);
    assert!(primary.contains(&format!("Condition=\" Exists('{expected_import}') \"")));
}

#[test]
fn later_manifest_version_replaces_earlier() {
    let fixture = TestPackages::new();
    let first = fixture.packages_config("a/packages.config", &[("PackageA", "1.0.0")]);
    let second = fixture.packages_config("b/packages.config", &[("PackageA", "2.0.0")]);

    let generator = ModulePropertyGenerator::new(
        &fixture.packages_root(),
        &[first, second],
        GeneratorConfig::default(),
    )
    .unwrap();

    let registry = generator.registry();
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.get("PackageA").unwrap().version(), "2.0.0");

    let primary = generator.primary_fragment().render().unwrap();
    assert!(primary.contains("PackageA.2.0.0"));
    assert!(!primary.contains("PackageA.1.0.0"));
}

#[test]
fn declared_extension_gets_module_import_list() {
    let fixture = TestPackages::new();
    let manifest = fixture.packages_config(
        "packages.config",
        &[("PackageA", "1.0.0"), ("PackageB", "1.0.0")],
    );
    fixture.install_module("PackageA", "1.0.0");
    fixture.module_config("PackageB", "1.0.0", &["Custom.targets"]);

    let config = GeneratorConfig {
        before_imports: vec!["$(MSBuildThisFileDirectory)before.props".to_string()],
        after_imports: vec!["$(MSBuildThisFileDirectory)after.props".to_string()],
        ..GeneratorConfig::default()
    };
    let generator =
        ModulePropertyGenerator::new(&fixture.packages_root(), &[manifest], config).unwrap();
    let report = generator
        .generate(&fixture.path("obj/modules.props"), &fixture.path("obj/Extensions"))
        .unwrap();

    assert_eq!(report.extensions.len(), 1);
    assert_eq!(report.extensions[0].name, "Custom.targets");
    assert_eq!(report.extensions[0].owner, "PackageB");
    fixture.assert_file_exists("obj/Extensions/Custom.targets");

    let primary = fixture.read("obj/modules.props");
    let extension = fixture.read("obj/Extensions/Custom.targets");
    assert_eq!(import_projects(&extension), import_projects(&primary));
    assert!(!extension.contains("<PropertyGroup>"));
}

#[test]
fn entry_without_version_is_dropped() {
    let fixture = TestPackages::new();
    let manifest = fixture.write(
        "packages.config",
        r#"<?xml version="1.0" encoding="utf-8"?>
<packages>
  <package id="PackageA" version="1.0.0" />
  <package id="PackageB" />
  <package id="PackageC" version="3.0.0" />
</packages>
"#,
    );

    let generator =
        ModulePropertyGenerator::new(&fixture.packages_root(), &[manifest], GeneratorConfig::default())
            .unwrap();

    let ids: Vec<_> = generator.registry().iter().map(|p| p.id()).collect();
    assert_eq!(ids, vec!["PackageA", "PackageC"]);
}

#[test]
fn missing_packages_root_fails_before_writing() {
    let fixture = TestPackages::new();
    let manifest = fixture.packages_config("packages.config", &[("PackageA", "1.0.0")]);
    let missing = fixture.path("no-such-packages");

    let result = ModulePropertyGenerator::new(&missing, &[manifest], GeneratorConfig::default());

    match result {
        Err(Error::DirectoryNotFound { path }) => {
            assert_eq!(NormalizedPath::new(path), missing);
        }
        other => panic!("expected DirectoryNotFound, got {other:?}"),
    }
    fixture.assert_file_not_exists("obj");
}

#[test]
fn malformed_manifest_aborts_run() {
    let fixture = TestPackages::new();
    let good = fixture.packages_config("a/packages.config", &[("PackageA", "1.0.0")]);
    let bad = fixture.write("b/packages.config", "<packages><package id=\"B\" version=");

    let result =
        ModulePropertyGenerator::new(&fixture.packages_root(), &[good, bad], GeneratorConfig::default());

    assert!(matches!(
        result,
        Err(Error::Manifest(cbt_manifest::Error::ManifestParse { .. }))
    ));
}

#[test]
fn mixed_manifest_formats_fold_in_order() {
    let fixture = TestPackages::new();
    let config = fixture.packages_config("packages.config", &[("PackageA", "1.0.0")]);
    let json = fixture.project_json("project.json", &[("PackageB", "1.0.0"), ("PackageA", "1.5.0")]);

    let generator = ModulePropertyGenerator::new(
        &fixture.packages_root(),
        &[config, json],
        GeneratorConfig::default(),
    )
    .unwrap();

    let modules: Vec<_> = generator
        .registry()
        .iter()
        .map(|p| (p.id(), p.version()))
        .collect();
    assert_eq!(modules, vec![("PackageA", "1.5.0"), ("PackageB", "1.0.0")]);
}
