//! Behaviour-driven tests for validating declared packages against disk.
//!
//! Source trees are simulated with the in-memory probe, so each scenario
//! states exactly which files exist under the conventional directories.

use cartridge_packager::PackagerError;
use cartridge_packager::layout::CartridgeLayout;
use cartridge_packager::package::PackageCategory;
use cartridge_packager::package_set::PackageSet;
use cartridge_packager::pipeline::check;
use cartridge_packager::probe::MemoryProbe;
use cartridge_packager::validate::{Finding, ValidationReport, validate};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

const PROJECT_DIR: &str = "/work/shop";

// ---------------------------------------------------------------------------
// World types
// ---------------------------------------------------------------------------

struct ValidationWorld {
    packages: PackageSet,
    probe: MemoryProbe,
    report: Option<ValidationReport>,
    aborted: Option<bool>,
}

#[fixture]
fn world() -> ValidationWorld {
    ValidationWorld {
        packages: PackageSet::new(CartridgeLayout::new(PROJECT_DIR, "shop")),
        probe: MemoryProbe::default(),
        report: None,
        aborted: None,
    }
}

fn category_dir(category: &str) -> String {
    let dir = match category {
        "local" => "general/root",
        "share" => "share",
        "cartridge" => "cartridge",
        other => panic!("unknown category: {other}"),
    };
    format!("{PROJECT_DIR}/staticfiles/{dir}")
}

fn report(world: &ValidationWorld) -> &ValidationReport {
    world.report.as_ref().expect("validation ran")
}

// ---------------------------------------------------------------------------
// Step definitions
// ---------------------------------------------------------------------------

#[given("{count} files under the {category} directory")]
fn given_files(world: &mut ValidationWorld, count: String, category: String) {
    let count: usize = count.parse().expect("numeric count");
    let probe = std::mem::take(&mut world.probe);
    world.probe = probe.with_files(&category_dir(&category), count);
}

#[given("a static library under the cartridge directory")]
fn given_static_lib(world: &mut ValidationWorld) {
    let root = category_dir("cartridge");
    let probe = std::mem::take(&mut world.probe);
    world.probe = probe.with_file(&root, "lib/vendor.jar");
    world
        .packages
        .static_libs_mut()
        .insert(format!("{root}/lib/vendor.jar"));
}

#[given("a declared cartridge package without files")]
fn given_empty_cartridge(world: &mut ValidationWorld) {
    world.packages.cartridge();
}

#[given("a declared local package")]
fn given_local(world: &mut ValidationWorld) {
    world.packages.local();
}

#[when("the packages are validated")]
fn when_validated(world: &mut ValidationWorld) {
    let packages = std::mem::replace(
        &mut world.packages,
        PackageSet::new(CartridgeLayout::new(PROJECT_DIR, "shop")),
    )
    .freeze();
    world.report = Some(validate(&packages, &world.probe).expect("probe succeeds"));
    world.aborted = Some(match check(&packages, &world.probe) {
        Ok(_) => false,
        Err(PackagerError::Configuration { .. }) => true,
        Err(other) => panic!("unexpected error: {other}"),
    });
}

#[then("exactly one warning mentions {count} share files")]
fn then_share_warning(world: &mut ValidationWorld, count: String) {
    let count: usize = count.parse().expect("numeric count");
    let report = report(world);
    assert_eq!(
        report.warnings(),
        &[Finding::UndeclaredFiles {
            category: PackageCategory::Share,
            file_count: count,
        }]
    );
    let message = report.warning_message().expect("warning text");
    assert!(message.contains(&format!("There are {count} share file(s) and no share package.")));
}

#[then("exactly one error names the cartridge package")]
fn then_cartridge_error(world: &mut ValidationWorld) {
    let report = report(world);
    assert_eq!(
        report.errors(),
        &[Finding::EmptyPackage {
            category: PackageCategory::Cartridge,
        }]
    );
    let message = report.error_message().expect("error text");
    assert!(message.contains("Cartridge package is empty!"));
}

#[then("no finding is reported")]
fn then_clean(world: &mut ValidationWorld) {
    let report = report(world);
    assert!(report.warnings().is_empty());
    assert!(report.errors().is_empty());
}

#[then("the build continues")]
fn then_continues(world: &mut ValidationWorld) {
    assert_eq!(world.aborted, Some(false));
}

#[then("the build aborts")]
fn then_aborts(world: &mut ValidationWorld) {
    assert_eq!(world.aborted, Some(true));
}

// ---------------------------------------------------------------------------
// Scenario bindings
// ---------------------------------------------------------------------------

#[scenario(
    path = "tests/features/validation.feature",
    name = "Undeclared share files only warn"
)]
fn scenario_undeclared_share_files(world: ValidationWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/validation.feature",
    name = "An empty cartridge package aborts the build"
)]
fn scenario_empty_cartridge_package(world: ValidationWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/validation.feature",
    name = "Static libraries do not satisfy a cartridge package"
)]
fn scenario_static_libs_excluded(world: ValidationWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/validation.feature",
    name = "Declared packages with files pass silently"
)]
fn scenario_declared_packages_pass(world: ValidationWorld) {
    let _ = world;
}
