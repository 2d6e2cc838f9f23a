//! Properties every generation run must hold, whatever the inputs

use cbt_core::{GeneratorConfig, ModulePropertyGenerator, RegistryKeyMode};
use cbt_fs::NormalizedPath;
use cbt_test_utils::TestPackages;
use pretty_assertions::assert_eq;
use rstest::rstest;

/// `(Project, Condition)` of every import in a rendered fragment, in order.
fn imports(fragment: &str) -> Vec<(String, String)> {
    fragment
        .split("<Import ")
        .skip(1)
        .map(|element| (attribute(element, "Project"), attribute(element, "Condition")))
        .collect()
}

fn attribute(element: &str, name: &str) -> String {
    let start = element
        .find(&format!("{name}=\""))
        .unwrap_or_else(|| panic!("missing {name} in {element}"))
        + name.len()
        + 2;
    let end = start + element[start..].find('"').unwrap();
    element[start..end].to_string()
}

fn three_module_fixture() -> (TestPackages, Vec<NormalizedPath>) {
    let fixture = TestPackages::new();
    let first = fixture.packages_config(
        "src/packages.config",
        &[("Zeta.Build", "1.0.0"), ("alpha.tools", "0.9.1")],
    );
    let second = fixture.project_json("test/project.json", &[("Mid", "2.0.0-beta")]);
    fixture.module_config("Zeta.Build", "1.0.0", &["Zeta.targets", "Shared.props"]);
    fixture.module_config("Mid", "2.0.0-beta", &["Shared.props"]);
    (fixture, vec![first, second])
}

fn ordering_config() -> GeneratorConfig {
    GeneratorConfig {
        import_relative_paths: vec![
            "build/$(MSBuildThisFile)".to_string(),
            "CBT/Module/$(MSBuildThisFile)".to_string(),
        ],
        before_imports: vec!["before.props".to_string()],
        after_imports: vec!["after.props".to_string(), "last.props".to_string()],
        ..GeneratorConfig::default()
    }
}

#[test]
fn module_paths_are_root_joined_with_id_and_version() {
    let (fixture, manifests) = three_module_fixture();
    let root = fixture.packages_root();

    let generator =
        ModulePropertyGenerator::new(&root, &manifests, GeneratorConfig::default()).unwrap();

    for package in generator.registry().iter() {
        let expected = root.join(&format!("{}.{}", package.id(), package.version()));
        assert_eq!(package.absolute_path(), &expected);
    }
    assert_eq!(generator.registry().len(), 3);
}

#[rstest]
#[case::by_id(RegistryKeyMode::Id, vec!["2.0.0"])]
#[case::by_id_and_version(RegistryKeyMode::IdAndVersion, vec!["1.0.0", "2.0.0"])]
fn duplicate_keys_keep_last_entry(#[case] key_mode: RegistryKeyMode, #[case] expected: Vec<&str>) {
    let fixture = TestPackages::new();
    let first = fixture.packages_config("a/packages.config", &[("PackageA", "1.0.0")]);
    let second = fixture.packages_config("b/packages.config", &[("packagea", "2.0.0")]);
    let config = GeneratorConfig {
        key_mode,
        ..GeneratorConfig::default()
    };

    let generator =
        ModulePropertyGenerator::new(&fixture.packages_root(), &[first, second], config).unwrap();

    let versions: Vec<_> = generator.registry().iter().map(|p| p.version()).collect();
    assert_eq!(versions, expected);
}

#[rstest]
#[case::single_thread(Some(1))]
#[case::many_threads(Some(8))]
#[case::pool_default(None)]
fn repeated_runs_are_byte_identical(#[case] scan_threads: Option<usize>) {
    let (fixture, manifests) = three_module_fixture();
    let config = GeneratorConfig {
        scan_threads,
        ..ordering_config()
    };
    let generator =
        ModulePropertyGenerator::new(&fixture.packages_root(), &manifests, config).unwrap();

    let run = |dir: &str| {
        let report = generator
            .generate(
                &fixture.path(&format!("{dir}/modules.props")),
                &fixture.path(&format!("{dir}/Extensions")),
            )
            .unwrap();
        let extensions: Vec<_> = report
            .extensions
            .iter()
            .map(|e| {
                let content = fixture.read(&format!("{dir}/Extensions/{}", e.name));
                (e.name.clone(), e.owner.clone(), content)
            })
            .collect();
        (fixture.read(&format!("{dir}/modules.props")), extensions)
    };

    let first = run("first");
    let second = run("second");

    assert_eq!(first, second);
    let owners: Vec<_> = first
        .1
        .iter()
        .map(|(name, owner, _)| (name.as_str(), owner.as_str()))
        .collect();
    assert_eq!(
        owners,
        vec![("Shared.props", "Mid"), ("Zeta.targets", "Zeta.Build")]
    );
}

#[test]
fn every_import_guards_its_own_project() {
    let (fixture, manifests) = three_module_fixture();
    let generator =
        ModulePropertyGenerator::new(&fixture.packages_root(), &manifests, ordering_config())
            .unwrap();

    let primary = generator.primary_fragment().render().unwrap();
    let extension = generator.extension_fragment().render().unwrap();

    for (project, condition) in imports(&primary).into_iter().chain(imports(&extension)) {
        assert_eq!(condition, format!(" Exists('{project}') "));
    }
}

#[test]
fn properties_and_imports_follow_registry_order() {
    let (fixture, manifests) = three_module_fixture();
    let prefix = fixture.packages_root().to_dir_prefix();
    let generator =
        ModulePropertyGenerator::new(&fixture.packages_root(), &manifests, ordering_config())
            .unwrap();

    let fragment = generator.primary_fragment();

    let names: Vec<_> = fragment.properties().iter().map(|p| p.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "MSBuildAllProjects",
            "CBTModule_Zeta_Build",
            "CBTModule_alpha_tools",
            "CBTModule_Mid",
            "CBTAllModulePaths",
        ]
    );

    let projects: Vec<_> = fragment.imports().iter().map(|i| i.project().to_string()).collect();
    let mut expected = vec!["before.props".to_string()];
    for module in ["Zeta.Build.1.0.0", "alpha.tools.0.9.1", "Mid.2.0.0-beta"] {
        expected.push(format!("{prefix}{module}/build/$(MSBuildThisFile)"));
        expected.push(format!("{prefix}{module}/CBT/Module/$(MSBuildThisFile)"));
    }
    expected.push("after.props".to_string());
    expected.push("last.props".to_string());
    assert_eq!(projects, expected);
}
