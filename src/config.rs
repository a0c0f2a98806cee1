//! Project configuration loaded from `cartridge.toml`.
//!
//! The manifest declares project metadata, publication targets, static
//! libraries, and the component packages. Relative paths are resolved
//! against the project directory. Packages named after a category
//! (`local`, `share`, `cartridge`, optionally suffixed `_<os>`) start from the
//! conventional layout; every field given in the manifest overrides the
//! convention.

use camino::{Utf8Path, Utf8PathBuf};
use cartridge_packager::layout::CartridgeLayout;
use cartridge_packager::metadata::ProjectMetadata;
use cartridge_packager::package::{ComponentPackage, PackageCategory, Source, split_package_name};
use cartridge_packager::package_set::{FrozenPackageSet, PackageSet};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::io;
use thiserror::Error;

/// Default manifest file name inside the project directory.
pub const MANIFEST_FILE: &str = "cartridge.toml";

/// Errors raised while loading or applying the manifest.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The manifest could not be read.
    #[error("cannot read {path}: {source}")]
    Read {
        /// The manifest path.
        path: Utf8PathBuf,
        /// The underlying error.
        #[source]
        source: io::Error,
    },

    /// The manifest is not valid TOML or has unknown keys.
    #[error("invalid manifest {path}: {reason}")]
    Parse {
        /// The manifest path.
        path: Utf8PathBuf,
        /// Parser diagnostics.
        reason: String,
    },

    /// A package declaration is unusable.
    #[error("invalid package declaration {name:?}: {reason}")]
    InvalidPackage {
        /// The declared name.
        name: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The project directory cannot be resolved.
    #[error("invalid project directory {path}: {reason}")]
    ProjectDir {
        /// The requested directory.
        path: Utf8PathBuf,
        /// Why it was rejected.
        reason: String,
    },

    /// Static libraries could not be discovered.
    #[error("cannot scan static libraries in {path}: {source}")]
    StaticLibs {
        /// The scanned directory.
        path: Utf8PathBuf,
        /// The underlying error.
        #[source]
        source: io::Error,
    },
}

/// Project-level metadata.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectSection {
    /// Project name; defaults to the project directory name.
    pub name: Option<String>,
    /// Human-readable description.
    pub description: Option<String>,
    /// Display name; defaults to the project name.
    pub display_name: Option<String>,
}

/// Publication targets.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct PublishingSection {
    /// Name of the Maven publication to update.
    pub maven: Option<String>,
    /// Name of the Ivy publication to update.
    pub ivy: Option<String>,
    /// Deployment file attached when it exists.
    pub deployment_file: Option<Utf8PathBuf>,
}

/// One `[[package]]` table.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PackageDeclaration {
    /// Unique package name.
    pub name: String,
    /// Source files or directories; replaces conventional sources when set.
    #[serde(default)]
    pub sources: Vec<Utf8PathBuf>,
    /// In-archive release directory.
    pub release_dir: Option<String>,
    /// Artifact base name.
    pub base_name: Option<String>,
    /// Category override.
    pub name_extension: Option<String>,
    /// Platform classifier override.
    pub os_extension: Option<String>,
}

/// The parsed `cartridge.toml`.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct CartridgeManifest {
    /// Project metadata.
    pub project: ProjectSection,
    /// Publication targets.
    pub publishing: PublishingSection,
    /// Explicit static libraries; discovered from the layout when absent.
    pub static_libs: Option<Vec<Utf8PathBuf>>,
    /// Declared packages in order.
    #[serde(rename = "package")]
    pub packages: Vec<PackageDeclaration>,
}

impl CartridgeManifest {
    /// Parse a manifest from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] naming `path` when the text is invalid.
    pub fn parse(path: &Utf8Path, text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Load the manifest at `path` from disk.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] or [`ConfigError::Parse`].
    pub fn load(path: &Utf8Path) -> Result<Self, ConfigError> {
        Self::load_with(path, |p| std::fs::read_to_string(p))
    }

    /// Load the manifest at `path`, or an empty one when the file is absent.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] for read failures other than absence,
    /// and [`ConfigError::Parse`] for invalid content.
    pub fn load_or_default(path: &Utf8Path) -> Result<Self, ConfigError> {
        Self::load_with(path, |p| match std::fs::read_to_string(p) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(String::new()),
            other => other,
        })
    }

    /// Load the manifest through `reader`.
    ///
    /// Tests inject a reader to avoid touching the filesystem.
    ///
    /// # Examples
    ///
    /// ```
    /// use camino::Utf8Path;
    /// use cartridge::config::CartridgeManifest;
    ///
    /// let manifest = CartridgeManifest::load_with(Utf8Path::new("cartridge.toml"), |_| {
    ///     Ok("[project]\nname = \"shop\"\n".to_owned())
    /// })
    /// .expect("valid manifest");
    /// assert_eq!(manifest.project.name.as_deref(), Some("shop"));
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] when `reader` fails and
    /// [`ConfigError::Parse`] for invalid content.
    pub fn load_with<F>(path: &Utf8Path, reader: F) -> Result<Self, ConfigError>
    where
        F: FnOnce(&Utf8Path) -> io::Result<String>,
    {
        let text = reader(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(path, &text)
    }

    /// Return the project name, falling back to the directory name.
    #[must_use]
    pub fn project_name(&self, project_dir: &Utf8Path) -> String {
        self.project
            .name
            .clone()
            .or_else(|| project_dir.file_name().map(str::to_owned))
            .unwrap_or_else(|| "cartridge".to_owned())
    }

    /// Build the project metadata.
    #[must_use]
    pub fn metadata(&self, layout: &CartridgeLayout) -> ProjectMetadata {
        let mut metadata = ProjectMetadata::new(layout.project_name());
        if let Some(display_name) = &self.project.display_name {
            metadata.set_display_name(display_name.clone());
        }
        if let Some(description) = &self.project.description {
            metadata.set_description(description.clone());
        }
        if let Some(name) = &self.publishing.maven {
            metadata.set_maven_publication_name(name.clone());
        }
        if let Some(name) = &self.publishing.ivy {
            metadata.set_ivy_publication_name(name.clone());
        }
        let deployment_file = self
            .publishing
            .deployment_file
            .as_deref()
            .map_or_else(|| layout.deployment_file(), |p| resolve(layout.project_dir(), p));
        metadata.set_deployment_file(deployment_file);
        metadata
    }

    /// Populate and freeze the package set described by the manifest.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPackage`] for empty or repeated names
    /// and [`ConfigError::StaticLibs`] when discovery fails.
    pub fn package_set(&self, layout: CartridgeLayout) -> Result<FrozenPackageSet, ConfigError> {
        let project_dir = layout.project_dir().to_path_buf();
        let static_libs: Vec<Utf8PathBuf> = match &self.static_libs {
            Some(libs) => libs.iter().map(|p| resolve(&project_dir, p)).collect(),
            None => layout
                .discover_static_libs()
                .map_err(|source| ConfigError::StaticLibs {
                    path: layout.static_libs_dir(),
                    source,
                })?,
        };

        let mut set = PackageSet::new(layout);
        set.static_libs_mut().extend(static_libs);

        let mut seen = BTreeSet::new();
        for declaration in &self.packages {
            if declaration.name.trim().is_empty() {
                return Err(invalid(&declaration.name, "package names must not be empty"));
            }
            if !seen.insert(declaration.name.as_str()) {
                return Err(invalid(&declaration.name, "declared more than once"));
            }
            let pkg = declare(&mut set, &declaration.name)?;
            apply(pkg, declaration, &project_dir);
        }
        Ok(set.freeze())
    }
}

fn invalid(name: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidPackage {
        name: name.to_owned(),
        reason: reason.to_owned(),
    }
}

fn resolve(project_dir: &Utf8Path, path: &Utf8Path) -> Utf8PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        project_dir.join(path)
    }
}

/// Create `name` through the convention helpers when it names a category.
fn declare<'a>(set: &'a mut PackageSet, name: &str) -> Result<&'a mut ComponentPackage, ConfigError> {
    let (category, os) = split_package_name(name);
    let pkg = match (PackageCategory::from_token(category), os) {
        (Some(PackageCategory::Local), "") => set.local(),
        (Some(PackageCategory::Local), os) => set.create_local(os),
        (Some(PackageCategory::Share), "") => set.share(),
        (Some(PackageCategory::Share), os) => set.create_share(os),
        (Some(PackageCategory::Cartridge), "") => set.cartridge(),
        (Some(PackageCategory::Cartridge), os) => set.create_cartridge(os),
        (None, _) => set
            .create(name)
            .map_err(|e| invalid(name, &e.to_string()))?,
    };
    Ok(pkg)
}

fn apply(pkg: &mut ComponentPackage, declaration: &PackageDeclaration, project_dir: &Utf8Path) {
    if !declaration.sources.is_empty() {
        pkg.set_sources(
            declaration
                .sources
                .iter()
                .map(|p| Source::new(resolve(project_dir, p))),
        );
    }
    if let Some(release_dir) = &declaration.release_dir {
        pkg.set_release_dir_name(release_dir.clone());
    }
    if let Some(base_name) = &declaration.base_name {
        pkg.set_base_name(base_name.clone());
    }
    if let Some(name_extension) = &declaration.name_extension {
        pkg.set_name_extension(name_extension.clone());
    }
    if let Some(os_extension) = &declaration.os_extension {
        pkg.set_os_extension(os_extension.clone());
    }
}
