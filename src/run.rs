//! One `cartridge-package` invocation.
//!
//! Loads the manifest, validates the declared packages, builds the
//! archives, updates the registered descriptors in place, and writes the
//! publication summary. Operator-facing text goes to the injected `stderr`.

use crate::cli::Cli;
use crate::config::{CartridgeManifest, ConfigError, MANIFEST_FILE};
use crate::error::{CartridgeError, Result};
use camino::{Utf8Path, Utf8PathBuf};
use cartridge_packager::PackagerError;
use cartridge_packager::descriptor::{DescriptorDocument, ivy};
use cartridge_packager::layout::CartridgeLayout;
use cartridge_packager::metadata::ProjectMetadata;
use cartridge_packager::package_set::FrozenPackageSet;
use cartridge_packager::pipeline::{self, PipelineContext, PipelineOutput};
use cartridge_packager::probe::FsProbe;
use cartridge_packager::publication::Publications;
use cartridge_packager::validate::ValidationReport;
use std::io::Write;

/// File name of the publication summary inside the build directory.
pub const SUMMARY_FILE: &str = "publication.json";

/// Default build directory below the project directory.
pub const BUILD_DIR: &str = "build";

/// Write `message` followed by a newline, ignoring write failures.
pub fn write_stderr_line(stderr: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort output; ignore write failures.
    }
}

/// Write the warning and error banners of `report`.
pub fn write_report(stderr: &mut dyn Write, report: &ValidationReport) {
    if let Some(warnings) = report.warning_message() {
        write_stderr_line(stderr, warnings);
    }
    if let Some(errors) = report.error_message() {
        write_stderr_line(stderr, errors);
    }
}

/// Everything the run resolved before touching the pipeline.
struct Project {
    layout: CartridgeLayout,
    packages: FrozenPackageSet,
    metadata: ProjectMetadata,
}

fn resolve_project_dir(requested: &Utf8Path) -> Result<Utf8PathBuf> {
    let dir = if requested.as_str().is_empty() {
        Utf8Path::new(".")
    } else {
        requested
    };
    let canonical = dir
        .canonicalize_utf8()
        .map_err(|e| ConfigError::ProjectDir {
            path: dir.to_path_buf(),
            reason: e.to_string(),
        })?;
    if !canonical.is_dir() {
        return Err(ConfigError::ProjectDir {
            path: dir.to_path_buf(),
            reason: "not a directory".to_owned(),
        }
        .into());
    }
    Ok(canonical)
}

fn load_project(cli: &Cli) -> Result<Project> {
    let project_dir = resolve_project_dir(&cli.project_dir)?;
    let manifest = match &cli.config {
        Some(path) => CartridgeManifest::load(path)?,
        None => CartridgeManifest::load_or_default(&project_dir.join(MANIFEST_FILE))?,
    };

    let project_name = manifest.project_name(&project_dir);
    let layout = CartridgeLayout::new(project_dir, project_name);
    let metadata = manifest.metadata(&layout);
    let packages = manifest.package_set(layout.clone())?;
    Ok(Project {
        layout,
        packages,
        metadata,
    })
}

fn register_publications(cli: &Cli, metadata: &ProjectMetadata) -> Result<Publications> {
    let mut publications = Publications::new();
    if let Some(path) = &cli.pom {
        publications.register_maven(metadata.maven_publication_name(), DescriptorDocument::load(path)?);
    }
    if let Some(path) = &cli.ivy {
        publications.register_ivy(metadata.ivy_publication_name(), DescriptorDocument::load(path)?);
    }
    Ok(publications)
}

fn save_descriptors(cli: &Cli, metadata: &ProjectMetadata, publications: &Publications) -> Result<()> {
    if let (Some(path), Some(publication)) = (&cli.pom, publications.maven(metadata.maven_publication_name())) {
        publication.descriptor().save(path)?;
    }
    if let (Some(path), Some(publication)) = (&cli.ivy, publications.ivy(metadata.ivy_publication_name())) {
        publication.descriptor().save(path)?;
    }
    Ok(())
}

fn write_summary(build_dir: &Utf8Path, publications: &Publications) -> Result<Utf8PathBuf> {
    let path = build_dir.join(SUMMARY_FILE);
    let summary_error = |reason: String| CartridgeError::Summary {
        path: path.clone(),
        reason,
    };
    let json = serde_json::to_string_pretty(&publications.summary()).map_err(|e| summary_error(e.to_string()))?;
    std::fs::create_dir_all(build_dir).map_err(|e| summary_error(e.to_string()))?;
    std::fs::write(&path, json).map_err(|e| summary_error(e.to_string()))?;
    Ok(path)
}

fn report_output(stderr: &mut dyn Write, output: &PipelineOutput, summary: &Utf8Path) {
    for archive in &output.archives {
        write_stderr_line(
            stderr,
            format!("  {} -> {} ({} file(s))", archive.package, archive.path, archive.files.len()),
        );
    }
    for collision in &output.collisions {
        write_stderr_line(
            stderr,
            format!(
                "warning: packages {} all write {}",
                collision.packages.join(", "),
                collision.path
            ),
        );
    }
    write_stderr_line(stderr, format!("Publication summary written to {summary}"));
}

/// Tell the operator when the Ivy descriptor kept its metadata unchanged.
fn report_skipped_metadata(stderr: &mut dyn Write, cli: &Cli, output: &PipelineOutput) {
    if !output.synthesis.ivy || output.synthesis.ivy_metadata {
        return;
    }
    if let Some(path) = &cli.ivy {
        write_stderr_line(
            stderr,
            format!(
                "warning: Ivy descriptor {path} has no <{}> element; cartridge display name and description were not added",
                ivy::INFO
            ),
        );
    }
}

/// Execute the command described by `cli`.
///
/// Validation banners are written to `stderr` whether or not the run
/// succeeds.
///
/// # Errors
///
/// Returns the first configuration, validation, archive, or descriptor
/// failure.
pub fn run(cli: &Cli, stderr: &mut dyn Write) -> Result<()> {
    let project = load_project(cli)?;

    if cli.validate_only {
        let outcome = pipeline::check(&project.packages, &FsProbe);
        return match outcome {
            Ok(report) => {
                write_report(stderr, &report);
                if !cli.quiet {
                    write_stderr_line(stderr, format!("{} package(s) valid.", project.packages.len()));
                }
                Ok(())
            }
            Err(err) => Err(report_failure(stderr, err)),
        };
    }

    let build_dir = cli
        .build_dir
        .clone()
        .unwrap_or_else(|| project.layout.project_dir().join(BUILD_DIR));
    let mut publications = register_publications(cli, &project.metadata)?;

    if !cli.quiet {
        write_stderr_line(
            stderr,
            format!(
                "Packaging cartridge {} ({} package(s))...",
                project.layout.project_name(),
                project.packages.len()
            ),
        );
    }

    let context = PipelineContext {
        packages: &project.packages,
        metadata: &project.metadata,
        probe: &FsProbe,
        build_dir: &build_dir,
    };
    let output = pipeline::run(&context, &mut publications).map_err(|err| report_failure(stderr, err))?;
    write_report(stderr, &output.report);
    report_skipped_metadata(stderr, cli, &output);

    save_descriptors(cli, &project.metadata, &publications)?;
    let summary = write_summary(&build_dir, &publications)?;
    if !cli.quiet {
        report_output(stderr, &output, &summary);
    }
    Ok(())
}

/// Print the banners carried by a configuration failure and pass it on.
fn report_failure(stderr: &mut dyn Write, err: PackagerError) -> CartridgeError {
    if let PackagerError::Configuration { report } = &err {
        write_report(stderr, report);
    }
    err.into()
}

/// Map a run result to a process exit code, printing any error.
pub fn exit_code_for_run_result(result: Result<()>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            write_stderr_line(stderr, err);
            1
        }
    }
}
