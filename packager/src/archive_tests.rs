//! Unit tests for archive planning and writing.

use super::*;
use crate::naming::resolve;
use crate::package::Source;
use crate::probe::{FsProbe, MemoryProbe};
use rstest::{fixture, rstest};
use std::fs;
use tempfile::TempDir;

#[fixture]
fn workdir() -> (TempDir, Utf8PathBuf) {
    let dir = TempDir::new().expect("temp dir creation succeeds");
    let root = Utf8PathBuf::try_from(dir.path().to_path_buf()).expect("utf8 temp dir");
    (dir, root)
}

fn write_file(path: &Utf8Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("mkdir");
    }
    fs::write(path, contents).expect("write");
}

/// Return `(name, mode)` pairs for every entry of a zip archive.
fn list_zip(path: &Utf8Path) -> Vec<(String, u32)> {
    let file = fs::File::open(path).expect("open archive");
    let mut archive = zip::ZipArchive::new(file).expect("read archive");
    (0..archive.len())
        .map(|i| {
            let entry = archive.by_index(i).expect("entry");
            (entry.name().to_owned(), entry.unix_mode().unwrap_or(0) & 0o777)
        })
        .collect()
}

#[rstest]
fn files_land_at_archive_root_without_release_dir(workdir: (TempDir, Utf8PathBuf)) {
    let (_dir, root) = workdir;
    write_file(&root.join("a.txt"), "alpha");
    write_file(&root.join("b.txt"), "bravo");

    let mut pkg = ComponentPackage::new("local");
    pkg.source(root.join("a.txt")).source(root.join("b.txt"));
    let identity = resolve(&pkg, "shop");

    let built = build_archive(&pkg, &identity, &StaticLibs::default(), &FsProbe, &root.join("build"))
        .expect("archive builds");

    assert_eq!(built.files, vec!["a.txt", "b.txt"]);
    assert_eq!(identity.appendix(), "local");
    assert_eq!(identity.classifier(), "");
    let entries = list_zip(&built.path);
    assert_eq!(
        entries,
        vec![("a.txt".to_owned(), FILE_MODE), ("b.txt".to_owned(), FILE_MODE)]
    );
}

#[rstest]
fn static_libs_are_excluded_even_when_listed_as_sources(workdir: (TempDir, Utf8PathBuf)) {
    let (_dir, root) = workdir;
    let lib = root.join("staticfiles/cartridge/lib/mylib.jar");
    write_file(&lib, "jar");
    write_file(&root.join("staticfiles/cartridge/config.properties"), "k=v");

    let mut pkg = ComponentPackage::new("cartridge_win");
    pkg.source(root.join("staticfiles/cartridge")).source(lib.clone());
    let libs: StaticLibs = [lib.clone()].into_iter().collect();

    let plan = plan_archive(&pkg, &libs, &FsProbe).expect("plan");
    assert_eq!(plan.file_names(), vec!["config.properties"]);
    assert_eq!(plan.excluded(), &[lib.clone(), lib]);

    let identity = resolve(&pkg, "shop");
    assert_eq!(identity.maven_classifier().as_deref(), Some("cartridge_win"));
    assert_eq!(identity.ivy_type(), "cartridge");
    assert_eq!(identity.ivy_classifier(), Some("win"));
}

#[rstest]
fn colliding_entries_fail_without_writing(workdir: (TempDir, Utf8PathBuf)) {
    let (_dir, root) = workdir;
    write_file(&root.join("one/readme.txt"), "1");
    write_file(&root.join("two/readme.txt"), "2");

    let mut pkg = ComponentPackage::new("share");
    pkg.source(root.join("one")).source(root.join("two"));
    let identity = resolve(&pkg, "shop");
    let build_dir = root.join("build");

    let err = build_archive(&pkg, &identity, &StaticLibs::default(), &FsProbe, &build_dir)
        .expect_err("duplicate entry must fail");

    assert!(matches!(
        err,
        ArchiveError::DuplicateEntry { ref entry, .. } if entry == "readme.txt"
    ));
    assert!(!identity.archive_path(&build_dir).exists());
}

#[rstest]
fn release_dir_nests_entries_and_keeps_empty_directories(workdir: (TempDir, Utf8PathBuf)) {
    let (_dir, root) = workdir;
    write_file(&root.join("src/pipelines/main.xml"), "<p/>");
    fs::create_dir_all(root.join("src/empty")).expect("mkdir");

    let mut pkg = ComponentPackage::new("cartridge");
    pkg.source(root.join("src")).set_release_dir_name("shop/release");
    let identity = resolve(&pkg, "shop");

    let built = build_archive(&pkg, &identity, &StaticLibs::default(), &FsProbe, &root.join("build"))
        .expect("archive builds");

    let entries = list_zip(&built.path);
    let names: Vec<&str> = entries.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "shop/",
            "shop/release/",
            "shop/release/empty/",
            "shop/release/pipelines/",
            "shop/release/pipelines/main.xml",
        ]
    );
    assert!(
        entries
            .iter()
            .filter(|(n, _)| n.ends_with('/'))
            .all(|(_, mode)| *mode == DIR_MODE)
    );
}

#[test]
fn prefix_sources_are_nested_under_their_prefix() {
    let probe = MemoryProbe::default().with_file("/p/edl", "model.edl");
    let mut pkg = ComponentPackage::new("cartridge");
    pkg.source(Source::nested("/p/edl", "edl"));

    let plan = plan_archive(&pkg, &StaticLibs::default(), &probe).expect("plan");

    assert_eq!(plan.file_names(), vec!["edl/model.edl"]);
}

#[test]
fn file_colliding_with_directory_is_a_duplicate() {
    let probe = MemoryProbe::default()
        .with_file("/a", "docs")
        .with_file("/b", "docs/index.html");
    let mut pkg = ComponentPackage::new("share");
    pkg.source("/a").source("/b");

    let err = plan_archive(&pkg, &StaticLibs::default(), &probe).expect_err("must collide");

    assert!(matches!(err, ArchiveError::DuplicateEntry { ref entry, .. } if entry == "docs"));
}

#[rstest]
#[case::plain("a/b.txt", "a/b.txt")]
#[case::leading_slash("/a/b.txt", "a/b.txt")]
#[case::parent_segments("../a/./b.txt", "a/b.txt")]
fn archive_name_normalises_separators(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(archive_name(Utf8Path::new(input)), expected);
}
