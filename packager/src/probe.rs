//! Filesystem probing abstraction.
//!
//! Validation and archive assembly enumerate sources through the
//! [`FileProbe`] trait so tests can substitute an in-memory tree for the
//! real filesystem.

use crate::package::Source;
use crate::package_set::StaticLibs;
use camino::{Utf8Path, Utf8PathBuf};
use std::io;
use walkdir::WalkDir;

/// Kind of an enumerated source entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntryKind {
    /// A regular file.
    File,
    /// A directory, possibly empty.
    Directory,
}

/// One file or directory contributed by a source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEntry {
    /// Location on disk.
    pub path: Utf8PathBuf,
    /// Location relative to the package's release directory.
    pub relative: Utf8PathBuf,
    /// Whether the entry is a file or a directory.
    pub kind: EntryKind,
}

impl SourceEntry {
    /// Create a file entry.
    pub fn file(path: impl Into<Utf8PathBuf>, relative: impl Into<Utf8PathBuf>) -> Self {
        Self {
            path: path.into(),
            relative: relative.into(),
            kind: EntryKind::File,
        }
    }

    /// Create a directory entry.
    pub fn directory(path: impl Into<Utf8PathBuf>, relative: impl Into<Utf8PathBuf>) -> Self {
        Self {
            path: path.into(),
            relative: relative.into(),
            kind: EntryKind::Directory,
        }
    }

    /// Return `true` for regular files.
    #[must_use]
    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }
}

/// Enumerates the entries a source contributes.
#[cfg_attr(test, mockall::automock)]
pub trait FileProbe {
    /// Enumerate every file and directory below `source`.
    ///
    /// A source that does not exist contributes nothing. A file source
    /// contributes itself under its file name.
    ///
    /// # Errors
    ///
    /// Returns an I/O error when an existing tree cannot be read.
    fn entries(&self, source: &Source) -> io::Result<Vec<SourceEntry>>;
}

/// Count the regular files under `sources` that are not static libraries.
///
/// # Errors
///
/// Propagates probe failures.
pub fn count_files<'a, I>(probe: &dyn FileProbe, sources: I, static_libs: &StaticLibs) -> io::Result<usize>
where
    I: IntoIterator<Item = &'a Source>,
{
    let mut count = 0;
    for source in sources {
        count += probe
            .entries(source)?
            .iter()
            .filter(|e| e.is_file() && !static_libs.contains(&e.path))
            .count();
    }
    Ok(count)
}

fn relative_under(prefix: Option<&Utf8Path>, rest: &Utf8Path) -> Utf8PathBuf {
    prefix.map_or_else(|| rest.to_path_buf(), |p| p.join(rest))
}

/// [`FileProbe`] backed by the real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsProbe;

impl FileProbe for FsProbe {
    fn entries(&self, source: &Source) -> io::Result<Vec<SourceEntry>> {
        let root = source.path();
        if root.is_file() {
            let name = root.file_name().unwrap_or(root.as_str());
            return Ok(vec![SourceEntry::file(
                root,
                relative_under(source.prefix(), Utf8Path::new(name)),
            )]);
        }
        if !root.is_dir() {
            return Ok(Vec::new());
        }

        let mut entries = Vec::new();
        let walker = WalkDir::new(root)
            .min_depth(1)
            .follow_links(true)
            .sort_by_file_name();
        for entry in walker {
            let entry = entry?;
            let kind = if entry.file_type().is_dir() {
                EntryKind::Directory
            } else if entry.file_type().is_file() {
                EntryKind::File
            } else {
                continue;
            };
            let path = Utf8PathBuf::try_from(entry.into_path())
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
            let rest = path
                .strip_prefix(root)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?
                .to_path_buf();
            entries.push(SourceEntry {
                relative: relative_under(source.prefix(), &rest),
                path,
                kind,
            });
        }
        Ok(entries)
    }
}

/// In-memory [`FileProbe`] for tests.
#[cfg(any(test, feature = "test-support"))]
#[derive(Debug, Clone, Default)]
pub struct MemoryProbe {
    trees: std::collections::BTreeMap<Utf8PathBuf, Vec<SourceEntry>>,
}

#[cfg(any(test, feature = "test-support"))]
impl MemoryProbe {
    /// Register a file at `relative` below the source rooted at `root`.
    #[must_use]
    pub fn with_file(mut self, root: &str, relative: &str) -> Self {
        let root = Utf8PathBuf::from(root);
        let entry = SourceEntry::file(root.join(relative), relative);
        self.trees.entry(root).or_default().push(entry);
        self
    }

    /// Register `count` files named `file<N>.txt` below `root`.
    #[must_use]
    pub fn with_files(self, root: &str, count: usize) -> Self {
        (0..count).fold(self, |probe, n| probe.with_file(root, &format!("file{n}.txt")))
    }
}

#[cfg(any(test, feature = "test-support"))]
impl FileProbe for MemoryProbe {
    fn entries(&self, source: &Source) -> io::Result<Vec<SourceEntry>> {
        let entries = self.trees.get(source.path()).cloned().unwrap_or_default();
        Ok(entries
            .into_iter()
            .map(|mut e| {
                e.relative = relative_under(source.prefix(), &e.relative);
                e
            })
            .collect())
    }
}
