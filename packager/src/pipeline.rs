//! End-to-end packaging pipeline.
//!
//! Runs the stages in their required order: validation (fail fast), identity
//! resolution, archive assembly, and publication synthesis. All stages read
//! the same frozen package set.

use crate::archive::{BuiltArchive, build_archive};
use crate::error::Result;
use crate::metadata::ProjectMetadata;
use crate::naming::{ArtifactIdentity, resolve};
use crate::package::ComponentPackage;
use crate::package_set::FrozenPackageSet;
use crate::probe::FileProbe;
use crate::publication::{Publications, ResolvedArtifact, Synthesis, synthesize};
use crate::validate::{ValidationReport, validate};
use camino::{Utf8Path, Utf8PathBuf};
use log::{info, warn};
use std::collections::BTreeMap;

/// Inputs of one pipeline run.
pub struct PipelineContext<'a> {
    /// Frozen packages and static libraries.
    pub packages: &'a FrozenPackageSet,
    /// Project metadata and publication targets.
    pub metadata: &'a ProjectMetadata,
    /// Source enumeration backend.
    pub probe: &'a dyn FileProbe,
    /// Directory receiving the component archives.
    pub build_dir: &'a Utf8Path,
}

/// Two or more packages that write the same archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputCollision {
    /// The contested archive path.
    pub path: Utf8PathBuf,
    /// Packages resolving to it, in declaration order.
    pub packages: Vec<String>,
}

/// Result of a successful pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Validation report; holds warnings only.
    pub report: ValidationReport,
    /// Archives written, in declaration order.
    pub archives: Vec<BuiltArchive>,
    /// Output paths claimed by more than one package.
    pub collisions: Vec<OutputCollision>,
    /// Publications that were updated.
    pub synthesis: Synthesis,
}

/// Validate the packages and fail when the report holds errors.
///
/// Warnings are logged and returned in the report.
///
/// # Errors
///
/// Returns [`crate::PackagerError::Configuration`] carrying the full report
/// when any category has an empty declared package.
pub fn check(packages: &FrozenPackageSet, probe: &dyn FileProbe) -> Result<ValidationReport> {
    let report = validate(packages, probe)?;
    if let Some(message) = report.warning_message() {
        warn!("{message}");
    }
    report.into_result()
}

/// Resolve the identity of every package.
#[must_use]
pub fn resolve_all(packages: &FrozenPackageSet) -> Vec<(&ComponentPackage, ArtifactIdentity)> {
    let project_name = packages.layout().project_name();
    packages
        .iter()
        .map(|pkg| (pkg, resolve(pkg, project_name)))
        .collect()
}

/// Find archive paths claimed by more than one package.
#[must_use]
pub fn find_collisions(
    resolved: &[(&ComponentPackage, ArtifactIdentity)],
    build_dir: &Utf8Path,
) -> Vec<OutputCollision> {
    let mut claims: BTreeMap<Utf8PathBuf, Vec<String>> = BTreeMap::new();
    for (pkg, identity) in resolved {
        claims
            .entry(identity.archive_path(build_dir))
            .or_default()
            .push(pkg.name().to_owned());
    }
    claims
        .into_iter()
        .filter(|(_, packages)| packages.len() > 1)
        .map(|(path, packages)| OutputCollision { path, packages })
        .collect()
}

/// Run validation, archiving and synthesis.
///
/// Colliding output paths are logged and the later package's archive
/// replaces the earlier one.
///
/// # Errors
///
/// Returns a configuration error when validation fails, and propagates
/// archive assembly failures. Nothing is archived when validation fails.
pub fn run(context: &PipelineContext<'_>, publications: &mut Publications) -> Result<PipelineOutput> {
    let report = check(context.packages, context.probe)?;

    let resolved = resolve_all(context.packages);
    let collisions = find_collisions(&resolved, context.build_dir);
    for collision in &collisions {
        warn!(
            "packages {} all write {}; the last one wins",
            collision.packages.join(", "),
            collision.path
        );
    }

    let mut archives = Vec::with_capacity(resolved.len());
    for (pkg, identity) in &resolved {
        let built = build_archive(
            pkg,
            identity,
            context.packages.static_libs(),
            context.probe,
            context.build_dir,
        )?;
        info!("{}: {} ({} file(s))", pkg.task_name(), built.path, built.files.len());
        archives.push(built);
    }

    let artifacts: Vec<ResolvedArtifact> = archives.iter().map(BuiltArchive::artifact).collect();
    let synthesis = synthesize(
        publications,
        context.metadata,
        &artifacts,
        context.packages.static_libs(),
    );

    Ok(PipelineOutput {
        report,
        archives,
        collisions,
        synthesis,
    })
}
