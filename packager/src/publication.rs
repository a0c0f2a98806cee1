//! Publication registry and artifact attachment.
//!
//! The host registers the Maven and Ivy publications it wants to produce,
//! each with its descriptor document. [`synthesize`] then attaches the
//! package archives, the static libraries, and the optional deployment file
//! to the publications named in the project metadata and merges the metadata
//! into their descriptors. A publication that was never registered is
//! skipped. Artifact lists are rebuilt on every pass, so synthesis can run
//! repeatedly with the same outcome.

use crate::descriptor::{DescriptorDocument, ivy, pom};
use crate::metadata::ProjectMetadata;
use crate::naming::ArtifactIdentity;
use crate::package_set::StaticLibs;
use camino::{Utf8Path, Utf8PathBuf};
use log::debug;
use serde::Serialize;
use std::collections::BTreeMap;

/// Classifier and type of the deployment file artifact.
pub const DEPLOYMENT_CLASSIFIER: &str = "deploy-gradle";

/// Extension of static-library artifacts in Maven publications.
pub const STATIC_LIB_EXTENSION: &str = "jar";

/// A package archive ready for publication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedArtifact {
    /// Resolved identity of the package.
    pub identity: ArtifactIdentity,
    /// Archive on disk.
    pub file: Utf8PathBuf,
}

/// An artifact of a Maven publication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MavenArtifact {
    /// File to publish.
    pub file: Utf8PathBuf,
    /// Artifact extension.
    pub extension: String,
    /// Artifact classifier; never empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classifier: Option<String>,
}

/// An artifact of an Ivy publication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IvyArtifact {
    /// File to publish.
    pub file: Utf8PathBuf,
    /// Artifact name.
    pub name: String,
    /// Artifact type.
    #[serde(rename = "type")]
    pub kind: String,
    /// Artifact extension.
    pub extension: String,
    /// Artifact classifier; omitted when empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classifier: Option<String>,
}

/// A registered Maven publication.
#[derive(Debug, Clone)]
pub struct MavenPublication {
    descriptor: DescriptorDocument,
    artifacts: Vec<MavenArtifact>,
}

impl MavenPublication {
    /// Return the POM descriptor.
    #[must_use]
    pub const fn descriptor(&self) -> &DescriptorDocument {
        &self.descriptor
    }

    /// Return the attached artifacts.
    #[must_use]
    pub fn artifacts(&self) -> &[MavenArtifact] {
        &self.artifacts
    }
}

/// A registered Ivy publication.
#[derive(Debug, Clone)]
pub struct IvyPublication {
    descriptor: DescriptorDocument,
    artifacts: Vec<IvyArtifact>,
}

impl IvyPublication {
    /// Return the Ivy descriptor.
    #[must_use]
    pub const fn descriptor(&self) -> &DescriptorDocument {
        &self.descriptor
    }

    /// Return the attached artifacts.
    #[must_use]
    pub fn artifacts(&self) -> &[IvyArtifact] {
        &self.artifacts
    }
}

/// Publications registered by the host, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct Publications {
    maven: BTreeMap<String, MavenPublication>,
    ivy: BTreeMap<String, IvyPublication>,
}

/// Artifact listing of every publication, as written to the summary file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PublicationSummary {
    /// Maven artifacts by publication name.
    pub maven: BTreeMap<String, Vec<MavenArtifact>>,
    /// Ivy artifacts by publication name.
    pub ivy: BTreeMap<String, Vec<IvyArtifact>>,
}

impl Publications {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a Maven publication with its POM.
    pub fn register_maven(&mut self, name: impl Into<String>, descriptor: DescriptorDocument) {
        self.maven.insert(
            name.into(),
            MavenPublication {
                descriptor,
                artifacts: Vec::new(),
            },
        );
    }

    /// Register an Ivy publication with its descriptor.
    pub fn register_ivy(&mut self, name: impl Into<String>, descriptor: DescriptorDocument) {
        self.ivy.insert(
            name.into(),
            IvyPublication {
                descriptor,
                artifacts: Vec::new(),
            },
        );
    }

    /// Return the Maven publication called `name`.
    #[must_use]
    pub fn maven(&self, name: &str) -> Option<&MavenPublication> {
        self.maven.get(name)
    }

    /// Return the Ivy publication called `name`.
    #[must_use]
    pub fn ivy(&self, name: &str) -> Option<&IvyPublication> {
        self.ivy.get(name)
    }

    /// List every attached artifact.
    #[must_use]
    pub fn summary(&self) -> PublicationSummary {
        PublicationSummary {
            maven: self
                .maven
                .iter()
                .map(|(name, p)| (name.clone(), p.artifacts.clone()))
                .collect(),
            ivy: self
                .ivy
                .iter()
                .map(|(name, p)| (name.clone(), p.artifacts.clone()))
                .collect(),
        }
    }
}

fn stem(path: &Utf8Path) -> String {
    path.file_stem().unwrap_or(path.as_str()).to_owned()
}

fn file_extension(path: &Utf8Path) -> String {
    path.extension().unwrap_or_default().to_owned()
}

/// Build the Maven artifact list.
#[must_use]
pub fn maven_artifacts(
    archives: &[ResolvedArtifact],
    static_libs: &StaticLibs,
    deployment_file: Option<&Utf8Path>,
) -> Vec<MavenArtifact> {
    let packages = archives.iter().map(|a| MavenArtifact {
        file: a.file.clone(),
        extension: a.identity.extension().to_owned(),
        classifier: a.identity.maven_classifier(),
    });
    let libs = static_libs.iter().map(|lib| MavenArtifact {
        file: lib.to_path_buf(),
        extension: STATIC_LIB_EXTENSION.to_owned(),
        classifier: Some(stem(lib)),
    });
    let deployment = deployment_file.map(|file| MavenArtifact {
        file: file.to_path_buf(),
        extension: file_extension(file),
        classifier: Some(DEPLOYMENT_CLASSIFIER.to_owned()),
    });
    packages.chain(libs).chain(deployment).collect()
}

/// Build the Ivy artifact list.
#[must_use]
pub fn ivy_artifacts(
    archives: &[ResolvedArtifact],
    static_libs: &StaticLibs,
    deployment_file: Option<&Utf8Path>,
) -> Vec<IvyArtifact> {
    let packages = archives.iter().map(|a| IvyArtifact {
        file: a.file.clone(),
        name: a.identity.base_name().to_owned(),
        kind: a.identity.ivy_type().to_owned(),
        extension: a.identity.extension().to_owned(),
        classifier: a.identity.ivy_classifier().map(str::to_owned),
    });
    let libs = static_libs.iter().map(|lib| IvyArtifact {
        file: lib.to_path_buf(),
        name: stem(lib),
        kind: file_extension(lib),
        extension: file_extension(lib),
        classifier: None,
    });
    let deployment = deployment_file.map(|file| IvyArtifact {
        file: file.to_path_buf(),
        name: stem(file),
        kind: DEPLOYMENT_CLASSIFIER.to_owned(),
        extension: file_extension(file),
        classifier: None,
    });
    packages.chain(libs).chain(deployment).collect()
}

/// What one synthesis pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Synthesis {
    /// The Maven publication was found and updated.
    pub maven: bool,
    /// The Ivy publication was found and received artifacts.
    pub ivy: bool,
    /// The Ivy descriptor received the metadata.
    pub ivy_metadata: bool,
}

/// Attach artifacts and metadata to the publications named in `metadata`.
pub fn synthesize(
    publications: &mut Publications,
    metadata: &ProjectMetadata,
    archives: &[ResolvedArtifact],
    static_libs: &StaticLibs,
) -> Synthesis {
    let deployment_file = metadata.existing_deployment_file();
    let mut outcome = Synthesis::default();

    match publications.maven.get_mut(metadata.maven_publication_name()) {
        Some(publication) => {
            publication.artifacts = maven_artifacts(archives, static_libs, deployment_file);
            pom::merge(&mut publication.descriptor, metadata);
            outcome.maven = true;
        }
        None => debug!(
            "Maven publication {} is not registered; skipping",
            metadata.maven_publication_name()
        ),
    }

    match publications.ivy.get_mut(metadata.ivy_publication_name()) {
        Some(publication) => {
            publication.artifacts = ivy_artifacts(archives, static_libs, deployment_file);
            outcome.ivy_metadata = ivy::merge(&mut publication.descriptor, metadata);
            outcome.ivy = true;
        }
        None => debug!(
            "Ivy publication {} is not registered; skipping",
            metadata.ivy_publication_name()
        ),
    }

    outcome
}
