//! Package registry and static-library set.
//!
//! [`PackageSet`] is populated during configuration and then frozen into a
//! [`FrozenPackageSet`]. Only the frozen view is accepted by validation,
//! archiving, and publication, so late mutation cannot compile.

use crate::error::{PackagerError, Result};
use crate::layout::CartridgeLayout;
use crate::package::{ComponentPackage, PackageCategory};
use camino::{Utf8Path, Utf8PathBuf};
use std::collections::{BTreeMap, BTreeSet};

/// Files published individually and never embedded in a package archive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticLibs {
    files: BTreeSet<Utf8PathBuf>,
}

impl StaticLibs {
    /// Add a static-library file.
    pub fn insert(&mut self, path: impl Into<Utf8PathBuf>) -> bool {
        self.files.insert(path.into())
    }

    /// Return `true` when `path` is a static library.
    #[must_use]
    pub fn contains(&self, path: &Utf8Path) -> bool {
        self.files.contains(path)
    }

    /// Iterate over the static libraries in path order.
    pub fn iter(&self) -> impl Iterator<Item = &Utf8Path> {
        self.files.iter().map(Utf8PathBuf::as_path)
    }

    /// Return the number of static libraries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Return `true` when there are no static libraries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl<P: Into<Utf8PathBuf>> Extend<P> for StaticLibs {
    fn extend<I: IntoIterator<Item = P>>(&mut self, iter: I) {
        self.files.extend(iter.into_iter().map(Into::into));
    }
}

impl<P: Into<Utf8PathBuf>> FromIterator<P> for StaticLibs {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        let mut libs = Self::default();
        libs.extend(iter);
        libs
    }
}

/// Ordered, mutable registry of component packages.
#[derive(Debug, Clone)]
pub struct PackageSet {
    layout: CartridgeLayout,
    order: Vec<String>,
    packages: BTreeMap<String, ComponentPackage>,
    static_libs: StaticLibs,
}

impl PackageSet {
    /// Create an empty registry for the project described by `layout`.
    #[must_use]
    pub fn new(layout: CartridgeLayout) -> Self {
        Self {
            layout,
            order: Vec::new(),
            packages: BTreeMap::new(),
            static_libs: StaticLibs::default(),
        }
    }

    /// Return the project layout.
    #[must_use]
    pub const fn layout(&self) -> &CartridgeLayout {
        &self.layout
    }

    /// Register a new package with name-derived defaults.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::DuplicatePackage`] when `name` is taken.
    pub fn create(&mut self, name: &str) -> Result<&mut ComponentPackage> {
        if self.packages.contains_key(name) {
            return Err(PackagerError::DuplicatePackage {
                name: name.to_owned(),
            });
        }
        Ok(self.get_or_create(name))
    }

    /// Return the package called `name`, creating it if needed.
    pub fn get_or_create(&mut self, name: &str) -> &mut ComponentPackage {
        if !self.packages.contains_key(name) {
            self.order.push(name.to_owned());
        }
        self.packages
            .entry(name.to_owned())
            .or_insert_with(|| ComponentPackage::new(name))
    }

    /// Return the package called `name`, if registered.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ComponentPackage> {
        self.packages.get(name)
    }

    /// Return the package called `name` for modification, if registered.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut ComponentPackage> {
        self.packages.get_mut(name)
    }

    /// Return the default `local` package, creating it with conventions.
    pub fn local(&mut self) -> &mut ComponentPackage {
        self.convention(PackageCategory::Local, None)
    }

    /// Return the `local_<os>` package, creating it with conventions.
    pub fn create_local(&mut self, os: &str) -> &mut ComponentPackage {
        self.convention(PackageCategory::Local, Some(os))
    }

    /// Return the default `share` package, creating it with conventions.
    pub fn share(&mut self) -> &mut ComponentPackage {
        self.convention(PackageCategory::Share, None)
    }

    /// Return the `share_<os>` package, creating it with conventions.
    pub fn create_share(&mut self, os: &str) -> &mut ComponentPackage {
        self.convention(PackageCategory::Share, Some(os))
    }

    /// Return the default `cartridge` package, creating it with conventions.
    pub fn cartridge(&mut self) -> &mut ComponentPackage {
        self.convention(PackageCategory::Cartridge, None)
    }

    /// Return the `cartridge_<os>` package, creating it with conventions.
    pub fn create_cartridge(&mut self, os: &str) -> &mut ComponentPackage {
        self.convention(PackageCategory::Cartridge, Some(os))
    }

    /// Return the static-library set for modification.
    pub fn static_libs_mut(&mut self) -> &mut StaticLibs {
        &mut self.static_libs
    }

    /// Return the static-library set.
    #[must_use]
    pub const fn static_libs(&self) -> &StaticLibs {
        &self.static_libs
    }

    /// End the configuration phase.
    #[must_use]
    pub fn freeze(mut self) -> FrozenPackageSet {
        let packages = self
            .order
            .iter()
            .filter_map(|name| self.packages.remove(name))
            .collect();
        FrozenPackageSet {
            layout: self.layout,
            packages,
            static_libs: self.static_libs,
        }
    }

    fn convention(&mut self, category: PackageCategory, os: Option<&str>) -> &mut ComponentPackage {
        let name = match os {
            Some(os) => format!("{}_{os}", category.as_str()),
            None => category.as_str().to_owned(),
        };
        let fresh = !self.packages.contains_key(&name);
        let sources = self.layout.category_sources(category);
        let release_dir = self.layout.category_release_dir(category);

        let pkg = self.get_or_create(&name);
        if fresh {
            pkg.set_sources(sources)
                .set_release_dir_name(release_dir)
                .set_name_extension(category.as_str());
            if let Some(os) = os {
                pkg.set_os_extension(os);
            }
        }
        pkg
    }
}

/// Read-only view of the registry after configuration.
#[derive(Debug, Clone)]
pub struct FrozenPackageSet {
    layout: CartridgeLayout,
    packages: Vec<ComponentPackage>,
    static_libs: StaticLibs,
}

impl FrozenPackageSet {
    /// Return the project layout.
    #[must_use]
    pub const fn layout(&self) -> &CartridgeLayout {
        &self.layout
    }

    /// Iterate over packages in declaration order.
    pub fn iter(&self) -> std::slice::Iter<'_, ComponentPackage> {
        self.packages.iter()
    }

    /// Return the package called `name`, if registered.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ComponentPackage> {
        self.packages.iter().find(|p| p.name() == name)
    }

    /// Iterate over packages whose `name_extension` is `category`.
    pub fn with_category(
        &self,
        category: PackageCategory,
    ) -> impl Iterator<Item = &ComponentPackage> {
        self.packages
            .iter()
            .filter(move |p| p.name_extension() == category.as_str())
    }

    /// Return the static-library set.
    #[must_use]
    pub const fn static_libs(&self) -> &StaticLibs {
        &self.static_libs
    }

    /// Return the number of packages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.packages.len()
    }

    /// Return `true` when no package was declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}

impl<'a> IntoIterator for &'a FrozenPackageSet {
    type Item = &'a ComponentPackage;
    type IntoIter = std::slice::Iter<'a, ComponentPackage>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
