//! Artifact identity resolution.
//!
//! Maps a package's declared attributes to the names used on disk and in
//! both publication flavours:
//!
//! - archive directory: `<MAIN_OUTPUT_DIR>/[appendix][_classifier]`
//! - archive file: `<baseName>[-<appendix>][_<classifier>].<extension>`
//! - Maven classifier: `appendix_classifier`, or `appendix` alone
//! - Ivy type and classifier: `appendix` and `classifier` (omitted if empty)

use crate::layout::MAIN_OUTPUT_DIR;
use crate::package::ComponentPackage;
use camino::{Utf8Path, Utf8PathBuf};
use std::fmt;

/// Extension of every component archive.
pub const ARCHIVE_EXTENSION: &str = "zip";

/// Derived identity of one package artifact.
///
/// # Examples
///
/// ```
/// use cartridge_packager::naming::resolve;
/// use cartridge_packager::package::ComponentPackage;
///
/// let identity = resolve(&ComponentPackage::new("cartridge_win"), "shop");
/// assert_eq!(identity.maven_classifier().as_deref(), Some("cartridge_win"));
/// assert_eq!(identity.ivy_type(), "cartridge");
/// assert_eq!(identity.ivy_classifier(), Some("win"));
/// assert_eq!(identity.to_string(), "shop-cartridge_win.zip");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArtifactIdentity {
    base_name: String,
    appendix: String,
    classifier: String,
    extension: String,
}

/// Resolve the identity of `pkg`, defaulting the base name to `project_name`.
#[must_use]
pub fn resolve(pkg: &ComponentPackage, project_name: &str) -> ArtifactIdentity {
    ArtifactIdentity {
        base_name: pkg.base_name().unwrap_or(project_name).to_owned(),
        appendix: pkg.name_extension().to_owned(),
        classifier: pkg.os_extension().to_owned(),
        extension: ARCHIVE_EXTENSION.to_owned(),
    }
}

impl ArtifactIdentity {
    /// Return the artifact base name.
    #[must_use]
    pub fn base_name(&self) -> &str {
        &self.base_name
    }

    /// Return the appendix (package category).
    #[must_use]
    pub fn appendix(&self) -> &str {
        &self.appendix
    }

    /// Return the platform classifier; may be empty.
    #[must_use]
    pub fn classifier(&self) -> &str {
        &self.classifier
    }

    /// Return the archive extension.
    #[must_use]
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Compose the Maven classifier.
    ///
    /// Never returns an empty string: a package with neither appendix nor
    /// classifier publishes without one.
    #[must_use]
    pub fn maven_classifier(&self) -> Option<String> {
        let composed = if self.classifier.is_empty() {
            self.appendix.clone()
        } else {
            format!("{}_{}", self.appendix, self.classifier)
        };
        (!composed.is_empty()).then_some(composed)
    }

    /// Return the Ivy artifact type.
    #[must_use]
    pub fn ivy_type(&self) -> &str {
        &self.appendix
    }

    /// Return the Ivy classifier, omitted when empty.
    #[must_use]
    pub fn ivy_classifier(&self) -> Option<&str> {
        (!self.classifier.is_empty()).then_some(self.classifier.as_str())
    }

    /// Return the directory below `build_dir` that receives the archive.
    #[must_use]
    pub fn output_dir(&self, build_dir: &Utf8Path) -> Utf8PathBuf {
        let mut subdir = self.appendix.clone();
        if !self.classifier.is_empty() {
            subdir.push('_');
            subdir.push_str(&self.classifier);
        }
        build_dir.join(MAIN_OUTPUT_DIR).join(subdir)
    }

    /// Return the archive file name.
    #[must_use]
    pub fn archive_file_name(&self) -> String {
        self.to_string()
    }

    /// Return the full archive path below `build_dir`.
    #[must_use]
    pub fn archive_path(&self, build_dir: &Utf8Path) -> Utf8PathBuf {
        self.output_dir(build_dir).join(self.archive_file_name())
    }
}

impl fmt::Display for ArtifactIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.base_name)?;
        if !self.appendix.is_empty() {
            write!(f, "-{}", self.appendix)?;
        }
        if !self.classifier.is_empty() {
            write!(f, "_{}", self.classifier)?;
        }
        write!(f, ".{}", self.extension)
    }
}
