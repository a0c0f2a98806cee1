//! Cross-check of declared packages against files found on disk.
//!
//! For each category the validator compares the files present at the
//! conventional location with the packages declared for that category:
//!
//! - files on disk but no package declared: a warning;
//! - a declared package that resolves to no file: an error.
//!
//! Every category is checked before the outcome is decided, so one run
//! reports all problems.

use crate::error::{PackagerError, Result};
use crate::package::PackageCategory;
use crate::package_set::FrozenPackageSet;
use crate::probe::{FileProbe, count_files};
use std::fmt::Write as _;

const RULE: &str = "-----------------------------------------------------------------------------";

/// One validation finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Finding {
    /// Files exist for the category, but no package of it is declared.
    UndeclaredFiles {
        /// The affected category.
        category: PackageCategory,
        /// Number of files found on disk.
        file_count: usize,
    },
    /// At least one declared package of the category has no source file.
    EmptyPackage {
        /// The affected category.
        category: PackageCategory,
    },
}

impl Finding {
    /// Return the category the finding refers to.
    #[must_use]
    pub const fn category(&self) -> PackageCategory {
        match self {
            Self::UndeclaredFiles { category, .. } | Self::EmptyPackage { category } => *category,
        }
    }

    fn render(&self, out: &mut String) {
        let token = self.category().as_str();
        let written = match self {
            Self::UndeclaredFiles { file_count, .. } => writeln!(
                out,
                "   There are {file_count} {token} file(s) and no {token} package.\n   \
                 -> Add configuration '{token}' to the package declarations."
            ),
            Self::EmptyPackage { category } => writeln!(
                out,
                "   {} package is empty!\n   \
                 -> Remove configuration '{token}' from the package declarations.",
                category.label()
            ),
        };
        if written.is_err() {
            // Writing into a String cannot fail.
        }
    }
}

/// File and package counts for one category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CategoryCounts {
    /// Real files at the conventional location, static libs excluded.
    pub files_present: usize,
    /// Declared packages of the category.
    pub configured: usize,
    /// Declared packages whose sources contain at least one file.
    pub valid_configured: usize,
}

impl CategoryCounts {
    /// Classify the counts into at most one finding.
    #[must_use]
    pub const fn finding(&self, category: PackageCategory) -> Option<Finding> {
        if self.files_present > 0 && self.configured == 0 {
            Some(Finding::UndeclaredFiles {
                category,
                file_count: self.files_present,
            })
        } else if self.valid_configured < self.configured {
            Some(Finding::EmptyPackage { category })
        } else {
            None
        }
    }
}

/// Outcome of a validation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    project_name: String,
    warnings: Vec<Finding>,
    errors: Vec<Finding>,
}

impl ValidationReport {
    /// Create an empty report for `project_name`.
    pub fn new(project_name: impl Into<String>) -> Self {
        Self {
            project_name: project_name.into(),
            warnings: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Return the project the report covers.
    #[must_use]
    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    /// Return the warnings in category order.
    #[must_use]
    pub fn warnings(&self) -> &[Finding] {
        &self.warnings
    }

    /// Return the errors in category order.
    #[must_use]
    pub fn errors(&self) -> &[Finding] {
        &self.errors
    }

    /// Record a finding under warnings or errors according to its kind.
    pub fn push(&mut self, finding: Finding) {
        match finding {
            Finding::UndeclaredFiles { .. } => self.warnings.push(finding),
            Finding::EmptyPackage { .. } => self.errors.push(finding),
        }
    }

    fn banner(&self, kind: &str, headline: &str, findings: &[Finding]) -> Option<String> {
        if findings.is_empty() {
            return None;
        }
        let mut out = format!(
            "\n{RULE}\nCartridge '{}' configuration - {kind}\n{headline}\n\n",
            self.project_name
        );
        for finding in findings {
            finding.render(&mut out);
        }
        out.push_str(RULE);
        Some(out)
    }

    /// Render all warnings as one message, if there are any.
    #[must_use]
    pub fn warning_message(&self) -> Option<String> {
        let headline = format!(
            "The cartridge '{}' contains files, but there are no configured packages.",
            self.project_name
        );
        self.banner("WARNING", &headline, &self.warnings)
    }

    /// Render all errors as one message, if there are any.
    #[must_use]
    pub fn error_message(&self) -> Option<String> {
        self.banner(
            "ERRORS",
            "There are configured packages, but without source files.",
            &self.errors,
        )
    }

    /// Turn the report into an error when it holds any error finding.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::Configuration`] carrying the full report.
    pub fn into_result(self) -> Result<Self> {
        if self.errors.is_empty() {
            Ok(self)
        } else {
            Err(PackagerError::Configuration {
                report: Box::new(self),
            })
        }
    }
}

/// Compute the counts of `category`.
///
/// # Errors
///
/// Propagates probe failures as [`PackagerError::Io`].
pub fn category_counts(
    packages: &FrozenPackageSet,
    category: PackageCategory,
    probe: &dyn FileProbe,
) -> Result<CategoryCounts> {
    let static_libs = packages.static_libs();
    let conventional = packages.layout().category_sources(category);

    let mut counts = CategoryCounts {
        files_present: count_files(probe, &conventional, static_libs)?,
        ..CategoryCounts::default()
    };
    for pkg in packages.with_category(category) {
        counts.configured += 1;
        if count_files(probe, pkg.sources(), static_libs)? > 0 {
            counts.valid_configured += 1;
        }
    }
    Ok(counts)
}

/// Validate every category of `packages`.
///
/// The returned report may hold errors; callers decide when to abort via
/// [`ValidationReport::into_result`].
///
/// # Errors
///
/// Returns [`PackagerError::Io`] when a source tree cannot be probed.
pub fn validate(packages: &FrozenPackageSet, probe: &dyn FileProbe) -> Result<ValidationReport> {
    let mut report = ValidationReport::new(packages.layout().project_name());
    for category in PackageCategory::ALL {
        let counts = category_counts(packages, category, probe)?;
        log::trace!("{category}: {counts:?}");
        if let Some(finding) = counts.finding(category) {
            report.push(finding);
        }
    }
    Ok(report)
}
