//! Project metadata merged into publication descriptors.

use camino::{Utf8Path, Utf8PathBuf};

/// Default name of the Maven publication.
pub const DEFAULT_MAVEN_PUBLICATION: &str = "mvnCartridge";

/// Default name of the Ivy publication.
pub const DEFAULT_IVY_PUBLICATION: &str = "ivyCartridge";

/// Descriptive project data and publication targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectMetadata {
    display_name: String,
    description: String,
    deployment_file: Option<Utf8PathBuf>,
    maven_publication_name: String,
    ivy_publication_name: String,
}

impl ProjectMetadata {
    /// Create metadata whose display name defaults to `project_name`.
    ///
    /// ```
    /// use cartridge_packager::metadata::ProjectMetadata;
    ///
    /// let meta = ProjectMetadata::new("shop");
    /// assert_eq!(meta.display_name(), "shop");
    /// assert_eq!(meta.description(), "");
    /// assert_eq!(meta.maven_publication_name(), "mvnCartridge");
    /// ```
    pub fn new(project_name: impl Into<String>) -> Self {
        Self {
            display_name: project_name.into(),
            description: String::new(),
            deployment_file: None,
            maven_publication_name: DEFAULT_MAVEN_PUBLICATION.to_owned(),
            ivy_publication_name: DEFAULT_IVY_PUBLICATION.to_owned(),
        }
    }

    /// Return the display name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Override the display name.
    pub fn set_display_name(&mut self, display_name: impl Into<String>) -> &mut Self {
        self.display_name = display_name.into();
        self
    }

    /// Return the description; empty when none was given.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Override the description.
    pub fn set_description(&mut self, description: impl Into<String>) -> &mut Self {
        self.description = description.into();
        self
    }

    /// Return the configured deployment file, whether or not it exists.
    #[must_use]
    pub fn deployment_file(&self) -> Option<&Utf8Path> {
        self.deployment_file.as_deref()
    }

    /// Set the deployment file attached when it exists at synthesis time.
    pub fn set_deployment_file(&mut self, path: impl Into<Utf8PathBuf>) -> &mut Self {
        self.deployment_file = Some(path.into());
        self
    }

    /// Return the deployment file if it is an existing regular file.
    #[must_use]
    pub fn existing_deployment_file(&self) -> Option<&Utf8Path> {
        self.deployment_file().filter(|path| path.is_file())
    }

    /// Return the targeted Maven publication.
    #[must_use]
    pub fn maven_publication_name(&self) -> &str {
        &self.maven_publication_name
    }

    /// Target a differently named Maven publication.
    pub fn set_maven_publication_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.maven_publication_name = name.into();
        self
    }

    /// Return the targeted Ivy publication.
    #[must_use]
    pub fn ivy_publication_name(&self) -> &str {
        &self.ivy_publication_name
    }

    /// Target a differently named Ivy publication.
    pub fn set_ivy_publication_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.ivy_publication_name = name.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_deployment_file_is_not_attached() {
        let mut meta = ProjectMetadata::new("shop");
        meta.set_deployment_file("/definitely/not/here/deploy.gradle");
        assert!(meta.deployment_file().is_some());
        assert_eq!(meta.existing_deployment_file(), None);
    }

    #[test]
    fn existing_deployment_file_is_reported() {
        let dir = TempDir::new().expect("temp dir");
        let path = Utf8PathBuf::try_from(dir.path().join("deploy.gradle")).expect("utf8");
        std::fs::write(&path, "apply plugin").expect("write");

        let mut meta = ProjectMetadata::new("shop");
        meta.set_deployment_file(path.clone());
        assert_eq!(meta.existing_deployment_file(), Some(path.as_path()));
    }

    #[test]
    fn directories_are_not_deployment_files() {
        let dir = TempDir::new().expect("temp dir");
        let path = Utf8PathBuf::try_from(dir.path().to_path_buf()).expect("utf8");
        let mut meta = ProjectMetadata::new("shop");
        meta.set_deployment_file(path);
        assert_eq!(meta.existing_deployment_file(), None);
    }
}
