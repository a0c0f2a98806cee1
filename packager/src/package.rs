//! Component package model.
//!
//! A component package is a named bundle of sources. Its category
//! (`name_extension`) and platform classifier (`os_extension`) default from
//! the package name: `cartridge_win` yields category `cartridge` and
//! classifier `win`. Both stay overridable after creation.

use camino::{Utf8Path, Utf8PathBuf};
use std::fmt;

/// Category token of the per-node local package.
pub const LOCAL_NAME: &str = "local";

/// Category token of the shared-filesystem package.
pub const SHARE_NAME: &str = "share";

/// Category token of the cartridge package.
pub const CARTRIDGE_NAME: &str = "cartridge";

/// The three package categories the validator checks against disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PackageCategory {
    /// Files installed on every node (`staticfiles/general/root`).
    Local,
    /// Files placed on the shared filesystem (`staticfiles/share`).
    Share,
    /// Cartridge files (`staticfiles/cartridge` and `edl/`).
    Cartridge,
}

impl PackageCategory {
    /// All categories in validation order.
    pub const ALL: [Self; 3] = [Self::Local, Self::Share, Self::Cartridge];

    /// Return the category token used as `name_extension`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Local => LOCAL_NAME,
            Self::Share => SHARE_NAME,
            Self::Cartridge => CARTRIDGE_NAME,
        }
    }

    /// Return the capitalised label used in report text.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Local => "Local",
            Self::Share => "Share",
            Self::Cartridge => "Cartridge",
        }
    }

    /// Map a `name_extension` back to a known category.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == token)
    }
}

impl fmt::Display for PackageCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Split a package name into its default category and OS extension.
///
/// The category is the text before the first `_`; the OS extension is the
/// text after it, or empty when the name has no `_`.
///
/// # Examples
///
/// ```
/// use cartridge_packager::package::split_package_name;
///
/// assert_eq!(split_package_name("share_linux"), ("share", "linux"));
/// assert_eq!(split_package_name("local"), ("local", ""));
/// ```
#[must_use]
pub fn split_package_name(name: &str) -> (&str, &str) {
    name.split_once('_').unwrap_or((name, ""))
}

/// A single source contribution to a package.
///
/// `path` is either a file, archived under its file name, or a directory
/// whose contents are archived relative to it. A `prefix` nests the
/// contribution under a sub-directory of the package's release directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Source {
    path: Utf8PathBuf,
    prefix: Option<Utf8PathBuf>,
}

impl Source {
    /// Create a source archived at the package's release directory.
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self {
            path: path.into(),
            prefix: None,
        }
    }

    /// Create a source archived under `prefix`.
    pub fn nested(path: impl Into<Utf8PathBuf>, prefix: impl Into<Utf8PathBuf>) -> Self {
        Self {
            path: path.into(),
            prefix: Some(prefix.into()),
        }
    }

    /// Return the on-disk path.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Return the in-archive prefix, if any.
    #[must_use]
    pub fn prefix(&self) -> Option<&Utf8Path> {
        self.prefix.as_deref()
    }
}

impl From<&str> for Source {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl From<Utf8PathBuf> for Source {
    fn from(path: Utf8PathBuf) -> Self {
        Self::new(path)
    }
}

/// Ordered, de-duplicated collection of sources.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceSet {
    sources: Vec<Source>,
}

impl SourceSet {
    /// Append a source unless an identical one is already present.
    ///
    /// Returns `true` when the source was added.
    pub fn insert(&mut self, source: Source) -> bool {
        if self.sources.contains(&source) {
            return false;
        }
        self.sources.push(source);
        true
    }

    /// Remove every source.
    pub fn clear(&mut self) {
        self.sources.clear();
    }

    /// Iterate over the sources in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Source> {
        self.sources.iter()
    }

    /// Return the number of sources.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Return `true` when no source has been declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl<'a> IntoIterator for &'a SourceSet {
    type Item = &'a Source;
    type IntoIter = std::slice::Iter<'a, Source>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<Source> for SourceSet {
    fn from_iter<I: IntoIterator<Item = Source>>(iter: I) -> Self {
        let mut set = Self::default();
        for source in iter {
            set.insert(source);
        }
        set
    }
}

/// A named, user-declared bundle of sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentPackage {
    name: String,
    base_name: Option<String>,
    name_extension: String,
    os_extension: String,
    release_dir_name: String,
    sources: SourceSet,
}

impl ComponentPackage {
    /// Create a package, deriving category and OS extension from `name`.
    ///
    /// # Examples
    ///
    /// ```
    /// use cartridge_packager::package::ComponentPackage;
    ///
    /// let pkg = ComponentPackage::new("cartridge_win");
    /// assert_eq!(pkg.name_extension(), "cartridge");
    /// assert_eq!(pkg.os_extension(), "win");
    /// assert_eq!(pkg.release_dir_name(), "");
    /// ```
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let (category, os) = split_package_name(&name);
        let name_extension = category.to_owned();
        let os_extension = os.to_owned();
        Self {
            name,
            base_name: None,
            name_extension,
            os_extension,
            release_dir_name: String::new(),
            sources: SourceSet::default(),
        }
    }

    /// Return the unique package name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Return the explicit base name, if one was set.
    #[must_use]
    pub fn base_name(&self) -> Option<&str> {
        self.base_name.as_deref()
    }

    /// Override the artifact base name.
    pub fn set_base_name(&mut self, base_name: impl Into<String>) -> &mut Self {
        self.base_name = Some(base_name.into());
        self
    }

    /// Return the category token (artifact appendix).
    #[must_use]
    pub fn name_extension(&self) -> &str {
        &self.name_extension
    }

    /// Override the category token.
    pub fn set_name_extension(&mut self, name_extension: impl Into<String>) -> &mut Self {
        self.name_extension = name_extension.into();
        self
    }

    /// Return the platform classifier; empty when the package is portable.
    #[must_use]
    pub fn os_extension(&self) -> &str {
        &self.os_extension
    }

    /// Override the platform classifier.
    pub fn set_os_extension(&mut self, os_extension: impl Into<String>) -> &mut Self {
        self.os_extension = os_extension.into();
        self
    }

    /// Return the in-archive release directory; empty means the archive root.
    #[must_use]
    pub fn release_dir_name(&self) -> &str {
        &self.release_dir_name
    }

    /// Override the in-archive release directory.
    pub fn set_release_dir_name(&mut self, release_dir_name: impl Into<String>) -> &mut Self {
        self.release_dir_name = release_dir_name.into();
        self
    }

    /// Return the declared sources.
    #[must_use]
    pub const fn sources(&self) -> &SourceSet {
        &self.sources
    }

    /// Add a source contribution.
    pub fn source(&mut self, source: impl Into<Source>) -> &mut Self {
        self.sources.insert(source.into());
        self
    }

    /// Replace every source contribution.
    pub fn set_sources<I>(&mut self, sources: I) -> &mut Self
    where
        I: IntoIterator<Item = Source>,
    {
        self.sources = sources.into_iter().collect();
        self
    }

    /// Return the category when `name_extension` names a known one.
    #[must_use]
    pub fn category(&self) -> Option<PackageCategory> {
        PackageCategory::from_token(&self.name_extension)
    }

    /// Return the name of the archive task for this package.
    ///
    /// ```
    /// use cartridge_packager::package::ComponentPackage;
    ///
    /// assert_eq!(ComponentPackage::new("share_linux").task_name(), "zipShare_linux");
    /// ```
    #[must_use]
    pub fn task_name(&self) -> String {
        let mut chars = self.name.chars();
        let capitalised: String = match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        };
        format!("zip{capitalised}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::plain("local", "local", "")]
    #[case::with_os("share_linux", "share", "linux")]
    #[case::only_first_underscore("cartridge_win_x64", "cartridge", "win_x64")]
    #[case::trailing_underscore("local_", "local", "")]
    fn name_defaults_split_on_first_underscore(
        #[case] name: &str,
        #[case] category: &str,
        #[case] os: &str,
    ) {
        let pkg = ComponentPackage::new(name);
        assert_eq!(pkg.name_extension(), category);
        assert_eq!(pkg.os_extension(), os);
    }

    #[test]
    fn defaults_are_overridable() {
        let mut pkg = ComponentPackage::new("local_win");
        pkg.set_name_extension("share").set_os_extension("");
        assert_eq!(pkg.name_extension(), "share");
        assert_eq!(pkg.os_extension(), "");
        assert_eq!(pkg.category(), Some(PackageCategory::Share));
    }

    #[test]
    fn sources_are_deduplicated_in_order() {
        let mut pkg = ComponentPackage::new("local");
        pkg.source("b.txt").source("a.txt").source("b.txt");
        let paths: Vec<&str> = pkg.sources().iter().map(|s| s.path().as_str()).collect();
        assert_eq!(paths, vec!["b.txt", "a.txt"]);
    }

    #[test]
    fn nested_and_plain_sources_are_distinct() {
        let mut set = SourceSet::default();
        assert!(set.insert(Source::new("edl")));
        assert!(set.insert(Source::nested("edl", "edl")));
        assert!(!set.insert(Source::new("edl")));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn unknown_category_is_none() {
        assert_eq!(ComponentPackage::new("docs").category(), None);
    }
}
