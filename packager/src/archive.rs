//! Component archive assembly.
//!
//! Assembly happens in two steps. [`plan_archive`] enumerates the package
//! sources, drops static libraries, places everything under the release
//! directory, and rejects colliding entries. [`write_archive`] then streams
//! the plan into a zip file through a temporary file, so a failed build
//! never leaves a partial archive behind.

pub use crate::archive_error::ArchiveError;

use crate::naming::ArtifactIdentity;
use crate::package::ComponentPackage;
use crate::package_set::StaticLibs;
use crate::probe::{EntryKind, FileProbe};
use crate::publication::ResolvedArtifact;
use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use log::{debug, trace};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use tempfile::NamedTempFile;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

/// Permission bits applied to every file entry.
pub const FILE_MODE: u32 = 0o640;

/// Permission bits applied to every directory entry.
pub const DIR_MODE: u32 = 0o750;

/// One entry of an archive plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedEntry {
    /// Whether the entry is a file or a directory.
    pub kind: EntryKind,
    /// Source on disk; directories synthesised for nesting have none.
    pub source: Option<Utf8PathBuf>,
}

/// The validated content of one package archive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchivePlan {
    entries: BTreeMap<String, PlannedEntry>,
    excluded: Vec<Utf8PathBuf>,
}

impl ArchivePlan {
    /// Iterate over entries in archive order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &PlannedEntry)> {
        self.entries.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    /// Return the in-archive paths of all file entries.
    #[must_use]
    pub fn file_names(&self) -> Vec<&str> {
        self.entries()
            .filter(|(_, e)| e.kind == EntryKind::File)
            .map(|(name, _)| name)
            .collect()
    }

    /// Return the static libraries that were left out.
    #[must_use]
    pub fn excluded(&self) -> &[Utf8PathBuf] {
        &self.excluded
    }

    /// Return `true` when the plan contains no file.
    #[must_use]
    pub fn has_no_files(&self) -> bool {
        self.entries.values().all(|e| e.kind == EntryKind::Directory)
    }

    fn add_directory(&mut self, package: &str, name: &str, source: Option<&Utf8Path>) -> Result<(), ArchiveError> {
        if name.is_empty() {
            return Ok(());
        }
        match self.entries.get(name) {
            Some(existing) if existing.kind == EntryKind::File => Err(duplicate(
                package,
                name,
                existing.source.as_deref(),
                source,
            )),
            Some(_) => Ok(()),
            None => {
                self.entries.insert(
                    name.to_owned(),
                    PlannedEntry {
                        kind: EntryKind::Directory,
                        source: source.map(Utf8Path::to_path_buf),
                    },
                );
                Ok(())
            }
        }
    }

    fn add_file(&mut self, package: &str, name: &str, source: &Utf8Path) -> Result<(), ArchiveError> {
        if let Some(existing) = self.entries.get(name) {
            return Err(duplicate(package, name, existing.source.as_deref(), Some(source)));
        }
        self.entries.insert(
            name.to_owned(),
            PlannedEntry {
                kind: EntryKind::File,
                source: Some(source.to_path_buf()),
            },
        );
        Ok(())
    }

    fn add_ancestors(&mut self, package: &str, name: &str) -> Result<(), ArchiveError> {
        let mut ancestors: Vec<&str> = Utf8Path::new(name)
            .ancestors()
            .skip(1)
            .map(Utf8Path::as_str)
            .filter(|a| !a.is_empty())
            .collect();
        ancestors.reverse();
        for ancestor in ancestors {
            self.add_directory(package, ancestor, None)?;
        }
        Ok(())
    }
}

fn duplicate(package: &str, entry: &str, first: Option<&Utf8Path>, second: Option<&Utf8Path>) -> ArchiveError {
    ArchiveError::DuplicateEntry {
        package: package.to_owned(),
        entry: entry.to_owned(),
        first: first.map(Utf8Path::to_path_buf).unwrap_or_default(),
        second: second.map(Utf8Path::to_path_buf).unwrap_or_default(),
    }
}

/// Render `path` as a `/`-separated archive name.
///
/// Root, prefix, `.` and `..` components are dropped so no entry can escape
/// the archive root.
#[must_use]
pub fn archive_name(path: &Utf8Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Utf8Component::Normal(part) => Some(part),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Plan the archive content of `pkg`.
///
/// # Errors
///
/// Returns [`ArchiveError::DuplicateEntry`] when two included sources map
/// to the same in-archive path, or [`ArchiveError::Io`] when a source tree
/// cannot be read.
pub fn plan_archive(
    pkg: &ComponentPackage,
    static_libs: &StaticLibs,
    probe: &dyn FileProbe,
) -> Result<ArchivePlan, ArchiveError> {
    let release_dir = Utf8Path::new(pkg.release_dir_name());
    let mut plan = ArchivePlan::default();

    for source in pkg.sources() {
        for entry in probe.entries(source)? {
            if entry.is_file() && static_libs.contains(&entry.path) {
                trace!("{}: excluding static lib {}", pkg.name(), entry.path);
                plan.excluded.push(entry.path);
                continue;
            }

            let name = archive_name(&release_dir.join(&entry.relative));
            plan.add_ancestors(pkg.name(), &name)?;
            match entry.kind {
                EntryKind::Directory => {
                    plan.add_directory(pkg.name(), &name, Some(entry.path.as_path()))?;
                }
                EntryKind::File => plan.add_file(pkg.name(), &name, &entry.path)?,
            }
        }
    }

    Ok(plan)
}

/// Write `plan` as a zip archive at `output_path`.
///
/// Parent directories are created as needed. Entries carry fixed
/// permissions and a fixed timestamp so identical inputs produce identical
/// archives.
///
/// # Errors
///
/// Returns [`ArchiveError::Io`] or [`ArchiveError::Zip`] on write failures.
pub fn write_archive(plan: &ArchivePlan, output_path: &Utf8Path) -> Result<(), ArchiveError> {
    let parent = output_path.parent().unwrap_or_else(|| Utf8Path::new("."));
    fs::create_dir_all(parent)?;

    let mut writer = ZipWriter::new(NamedTempFile::new_in(parent)?);
    for (name, entry) in plan.entries() {
        match (entry.kind, entry.source.as_deref()) {
            (EntryKind::Directory, _) | (EntryKind::File, None) => {
                writer.add_directory(format!("{name}/"), entry_options(DIR_MODE))?;
            }
            (EntryKind::File, Some(source)) => {
                writer.start_file(name, entry_options(FILE_MODE))?;
                let mut input = fs::File::open(source)?;
                io::copy(&mut input, &mut writer)?;
            }
        }
    }

    let temp = writer.finish()?;
    temp.persist(output_path).map_err(|e| e.error)?;
    Ok(())
}

fn entry_options(mode: u32) -> SimpleFileOptions {
    SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default())
        .unix_permissions(mode)
}

/// A package archive written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltArchive {
    /// Name of the package the archive was built from.
    pub package: String,
    /// Resolved artifact identity.
    pub identity: ArtifactIdentity,
    /// Location of the archive.
    pub path: Utf8PathBuf,
    /// In-archive paths of the files it contains.
    pub files: Vec<String>,
}

impl BuiltArchive {
    /// Describe the archive for publication.
    #[must_use]
    pub fn artifact(&self) -> ResolvedArtifact {
        ResolvedArtifact {
            identity: self.identity.clone(),
            file: self.path.clone(),
        }
    }
}

/// Plan and write the archive of `pkg` below `build_dir`.
///
/// # Errors
///
/// Propagates planning and writing failures; nothing is written when
/// planning fails.
pub fn build_archive(
    pkg: &ComponentPackage,
    identity: &ArtifactIdentity,
    static_libs: &StaticLibs,
    probe: &dyn FileProbe,
    build_dir: &Utf8Path,
) -> Result<BuiltArchive, ArchiveError> {
    let plan = plan_archive(pkg, static_libs, probe)?;
    let path = identity.archive_path(build_dir);
    debug!(
        "{}: writing {} file(s) to {path} ({} static lib(s) excluded)",
        pkg.task_name(),
        plan.file_names().len(),
        plan.excluded().len()
    );
    write_archive(&plan, &path)?;

    Ok(BuiltArchive {
        package: pkg.name().to_owned(),
        identity: identity.clone(),
        path,
        files: plan.file_names().into_iter().map(str::to_owned).collect(),
    })
}

#[cfg(test)]
#[path = "archive_tests.rs"]
mod tests;
