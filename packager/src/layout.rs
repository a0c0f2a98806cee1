//! Conventional cartridge directory layout.
//!
//! Sources live under `staticfiles/` in the project directory; the
//! `cartridge` category also picks up the `edl/` tree. Static libraries are
//! the `*.jar` files directly inside `staticfiles/cartridge/lib`.

use crate::package::{PackageCategory, Source};
use camino::{Utf8Path, Utf8PathBuf};
use std::io;
use walkdir::WalkDir;

/// Top-level directory holding static cartridge files.
pub const STATICFILES: &str = "staticfiles";

/// Directory of the `local` category below [`STATICFILES`].
pub const LOCAL_DIR: &str = "general/root";

/// Directory of the `share` category below [`STATICFILES`].
pub const SHARE_DIR: &str = "share";

/// Directory of the `cartridge` category below [`STATICFILES`].
pub const CARTRIDGE_DIR: &str = "cartridge";

/// Directory of static libraries below the cartridge directory.
pub const STATICLIBS_DIR: &str = "lib";

/// Extension of discovered static libraries.
pub const STATICLIB_EXTENSION: &str = "jar";

/// EDL model tree contributed to the cartridge package.
pub const EDL_DIR: &str = "edl";

/// Deployment descriptor relative to the project directory.
pub const DEPLOYMENT_FILE: &str = "deployment/deploy.gradle";

/// Directory below the build directory that receives component archives.
pub const MAIN_OUTPUT_DIR: &str = "cartridge-components";

/// Resolves conventional paths for one cartridge project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartridgeLayout {
    project_dir: Utf8PathBuf,
    project_name: String,
}

impl CartridgeLayout {
    /// Create a layout rooted at `project_dir`.
    pub fn new(project_dir: impl Into<Utf8PathBuf>, project_name: impl Into<String>) -> Self {
        Self {
            project_dir: project_dir.into(),
            project_name: project_name.into(),
        }
    }

    /// Return the project directory.
    #[must_use]
    pub fn project_dir(&self) -> &Utf8Path {
        &self.project_dir
    }

    /// Return the project name.
    #[must_use]
    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    fn staticfiles(&self, dir: &str) -> Utf8PathBuf {
        self.project_dir.join(STATICFILES).join(dir)
    }

    /// Return the conventional sources of `category`.
    #[must_use]
    pub fn category_sources(&self, category: PackageCategory) -> Vec<Source> {
        match category {
            PackageCategory::Local => vec![Source::new(self.staticfiles(LOCAL_DIR))],
            PackageCategory::Share => vec![Source::new(self.staticfiles(SHARE_DIR))],
            PackageCategory::Cartridge => vec![
                Source::new(self.staticfiles(CARTRIDGE_DIR)),
                Source::nested(self.project_dir.join(EDL_DIR), EDL_DIR),
            ],
        }
    }

    /// Return the conventional release directory of `category`.
    ///
    /// Cartridge content is released below `<project>/release`; the other
    /// categories land at the archive root.
    #[must_use]
    pub fn category_release_dir(&self, category: PackageCategory) -> String {
        match category {
            PackageCategory::Local | PackageCategory::Share => String::new(),
            PackageCategory::Cartridge => format!("{}/release", self.project_name),
        }
    }

    /// Return the directory scanned for static libraries.
    #[must_use]
    pub fn static_libs_dir(&self) -> Utf8PathBuf {
        self.staticfiles(CARTRIDGE_DIR).join(STATICLIBS_DIR)
    }

    /// Return the default deployment descriptor path.
    #[must_use]
    pub fn deployment_file(&self) -> Utf8PathBuf {
        self.project_dir.join(DEPLOYMENT_FILE)
    }

    /// Discover the `*.jar` files directly inside [`Self::static_libs_dir`].
    ///
    /// A missing directory yields an empty list. Results are sorted.
    ///
    /// # Errors
    ///
    /// Returns an I/O error when the directory exists but cannot be read or
    /// holds a non-UTF-8 file name.
    pub fn discover_static_libs(&self) -> io::Result<Vec<Utf8PathBuf>> {
        let dir = self.static_libs_dir();
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut libs = Vec::new();
        for entry in WalkDir::new(&dir).min_depth(1).max_depth(1) {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = Utf8PathBuf::try_from(entry.into_path())
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
            if path.extension() == Some(STATICLIB_EXTENSION) {
                libs.push(path);
            }
        }
        libs.sort();
        Ok(libs)
    }
}
