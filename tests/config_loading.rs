//! Behaviour-driven tests for loading `cartridge.toml` into a package set.

use camino::Utf8PathBuf;
use cartridge::config::{CartridgeManifest, MANIFEST_FILE};
use cartridge_packager::layout::CartridgeLayout;
use cartridge_packager::metadata::ProjectMetadata;
use cartridge_packager::package_set::FrozenPackageSet;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::fs;
use tempfile::TempDir;

struct Loaded {
    project_name: String,
    metadata: ProjectMetadata,
    packages: FrozenPackageSet,
}

#[derive(Default)]
struct ConfigWorld {
    dir: Option<TempDir>,
    project_dir: Option<Utf8PathBuf>,
    result: Option<Result<Loaded, String>>,
}

#[fixture]
fn world() -> ConfigWorld {
    ConfigWorld::default()
}

fn project_dir(world: &ConfigWorld) -> Utf8PathBuf {
    world.project_dir.clone().expect("project created")
}

fn loaded(world: &ConfigWorld) -> &Loaded {
    match world.result.as_ref().expect("manifest loaded") {
        Ok(loaded) => loaded,
        Err(err) => panic!("expected manifest to load: {err}"),
    }
}

#[given("a cartridge project named \"{name}\"")]
fn given_project(world: &mut ConfigWorld, name: String) {
    let dir = TempDir::new().expect("temp dir");
    let root = Utf8PathBuf::try_from(dir.path().join(&name)).expect("utf8 temp dir");
    fs::create_dir_all(&root).expect("create project");
    world.dir = Some(dir);
    world.project_dir = Some(root);
}

#[given("no manifest")]
fn given_no_manifest(world: &mut ConfigWorld) {
    let _ = fs::remove_file(project_dir(world).join(MANIFEST_FILE));
}

#[given("the manifest declares packages \"{names}\"")]
fn given_packages(world: &mut ConfigWorld, names: String) {
    let tables: String = names
        .split(',')
        .map(|name| format!("[[package]]\nname = \"{}\"\n", name.trim()))
        .collect();
    fs::write(project_dir(world).join(MANIFEST_FILE), tables).expect("write manifest");
}

#[given("the manifest text \"{text}\"")]
fn given_manifest_text(world: &mut ConfigWorld, text: String) {
    fs::write(
        project_dir(world).join(MANIFEST_FILE),
        text.replace("\\n", "\n"),
    )
    .expect("write manifest");
}

#[given("the static library \"{relative}\"")]
fn given_static_lib(world: &mut ConfigWorld, relative: String) {
    let path = project_dir(world).join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("mkdir");
    }
    fs::write(path, "jar").expect("write lib");
}

#[when("the manifest is loaded")]
fn when_loaded(world: &mut ConfigWorld) {
    let root = project_dir(world);
    let outcome = CartridgeManifest::load_or_default(&root.join(MANIFEST_FILE)).and_then(|manifest| {
        let project_name = manifest.project_name(&root);
        let layout = CartridgeLayout::new(root.clone(), project_name.clone());
        let metadata = manifest.metadata(&layout);
        let packages = manifest.package_set(layout)?;
        Ok(Loaded {
            project_name,
            metadata,
            packages,
        })
    });
    world.result = Some(outcome.map_err(|e| e.to_string()));
}

#[then("the project name is \"{expected}\"")]
fn then_project_name(world: &mut ConfigWorld, expected: String) {
    assert_eq!(loaded(world).project_name, expected);
}

#[then("the display name is \"{expected}\"")]
fn then_display_name(world: &mut ConfigWorld, expected: String) {
    assert_eq!(loaded(world).metadata.display_name(), expected);
}

#[then("{count} packages are declared")]
fn then_package_count(world: &mut ConfigWorld, count: usize) {
    assert_eq!(loaded(world).packages.len(), count);
}

#[then("{count} static libraries are registered")]
fn then_static_lib_count(world: &mut ConfigWorld, count: usize) {
    assert_eq!(loaded(world).packages.static_libs().len(), count);
}

#[then("package \"{name}\" releases into \"{release_dir}\"")]
fn then_release_dir(world: &mut ConfigWorld, name: String, release_dir: String) {
    let pkg = loaded(world).packages.get(&name).expect("package declared");
    assert_eq!(pkg.release_dir_name(), release_dir);
}

// Placeholders do not match an empty quoted value, so bind that form explicitly.
#[then("package \"{name}\" releases into \"\"")]
fn then_release_dir_empty(world: &mut ConfigWorld, name: String) {
    then_release_dir(world, name, String::new());
}

#[then("a configuration error mentioning \"{snippet}\" is reported")]
fn then_error(world: &mut ConfigWorld, snippet: String) {
    match world.result.as_ref().expect("manifest loaded") {
        Ok(_) => panic!("expected a configuration error"),
        Err(message) => assert!(
            message.contains(&snippet),
            "error {message:?} does not mention {snippet:?}"
        ),
    }
}

#[scenario(
    path = "tests/features/config_loading.feature",
    name = "A project without a manifest uses the conventions"
)]
fn scenario_defaults(world: ConfigWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/config_loading.feature",
    name = "Convention package names pick up conventional sources"
)]
fn scenario_convention_packages(world: ConfigWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/config_loading.feature",
    name = "Static libraries are discovered from the cartridge lib directory"
)]
fn scenario_static_lib_discovery(world: ConfigWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/config_loading.feature",
    name = "Unknown manifest keys are rejected"
)]
fn scenario_unknown_keys(world: ConfigWorld) {
    let _ = world;
}
