//! Repository configuration and the `Content.toml` manifest.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::locale::Locale;

/// Conventional name of a repository manifest
pub const MANIFEST_FILE: &str = "Content.toml";

/// Configuration of a content repository
///
/// Usually written as a `Content.toml` manifest next to the content tree:
/// ```toml
/// root = "content"
/// default_locale = "en"
/// locales = ["en", "zh"]
/// extensions = ["md"]
/// parallel = false
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositoryConfig {
    root: PathBuf,
    default_locale: Locale,
    locales: Vec<Locale>,
    extensions: Vec<String>,
    parallel: bool,
}

/// Errors that can occur when loading a manifest
#[derive(Debug, thiserror::Error)]
pub enum FailToLoadConfig {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parse error
    #[error("Invalid config: {0}")]
    TomlParse(#[from] toml::de::Error),
}

impl RepositoryConfig {
    /// Configuration with defaults for everything but the content root
    #[must_use]
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            ..Self::default()
        }
    }

    /// Load a manifest file. A relative `root` is resolved against the manifest's directory.
    ///
    /// # Errors
    /// Returns `FailToLoadConfig::Io` if the file cannot be read
    /// Returns `FailToLoadConfig::TomlParse` if the file is not a valid manifest
    pub fn open(path: impl AsRef<Path>) -> Result<Self, FailToLoadConfig> {
        let path = path.as_ref();
        let config = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml_str(&config)?;
        if config.root.is_relative() {
            if let Some(parent) = path.parent() {
                config.root = parent.join(&config.root);
            }
        }
        Ok(config)
    }

    /// Parse a manifest from TOML text
    ///
    /// # Errors
    /// Returns `toml::de::Error` if the text is not a valid manifest
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Export the configuration as a TOML manifest
    ///
    /// # Errors
    /// Returns `toml::ser::Error` if a path cannot be represented as TOML text
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Directory holding one subdirectory per locale
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Locale whose articles read primary fields
    #[must_use]
    pub const fn default_locale(&self) -> &Locale {
        &self.default_locale
    }

    /// Locales declared by the manifest; empty means "discover from the content root"
    #[must_use]
    pub fn locales(&self) -> &[Locale] {
        &self.locales
    }

    /// File extensions recognized as documents, without the leading dot
    #[must_use]
    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Whether documents are parsed on the rayon pool
    #[must_use]
    pub const fn parallel(&self) -> bool {
        self.parallel
    }

    /// Whether `extension` names a document file (case-insensitive)
    #[must_use]
    pub fn accepts_extension(&self, extension: &str) -> bool {
        self.extensions
            .iter()
            .any(|accepted| accepted.trim_start_matches('.').eq_ignore_ascii_case(extension))
    }

    /// Set the default locale
    #[must_use]
    pub fn with_default_locale(mut self, locale: impl Into<Locale>) -> Self {
        self.default_locale = locale.into();
        self
    }

    /// Declare the known locales
    #[must_use]
    pub fn with_locales<I, L>(mut self, locales: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<Locale>,
    {
        self.locales = locales.into_iter().map(Into::into).collect();
        self
    }

    /// Set the document file extensions
    #[must_use]
    pub fn with_extensions<I, E>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    /// Parse documents on the rayon pool
    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("content"),
            default_locale: Locale::default(),
            locales: Vec::new(),
            extensions: ["md", "markdown", "mdx"].map(String::from).to_vec(),
            parallel: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_manifest_keeps_defaults() {
        let config = RepositoryConfig::from_toml_str("default_locale = \"zh\"\n").unwrap();
        assert_eq!(config.default_locale(), &Locale::new("zh"));
        assert_eq!(config.root(), Path::new("content"));
        assert!(config.accepts_extension("md"));
        assert!(config.accepts_extension("MD"));
        assert!(!config.accepts_extension("txt"));
        assert!(!config.parallel());
    }

    #[test]
    fn manifest_round_trips_through_toml() {
        let config = RepositoryConfig::new("/srv/content")
            .with_locales(["en", "zh"])
            .with_extensions([".txt"])
            .with_parallel(true);
        let text = config.to_toml().unwrap();
        assert_eq!(RepositoryConfig::from_toml_str(&text).unwrap(), config);
        assert!(config.accepts_extension("txt"));
    }

    #[test]
    fn relative_root_is_resolved_against_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = dir.path().join(MANIFEST_FILE);
        std::fs::write(&manifest, "root = \"articles\"\nlocales = [\"en\"]\n").unwrap();
        let config = RepositoryConfig::open(&manifest).unwrap();
        assert_eq!(config.root(), dir.path().join("articles"));
        assert_eq!(config.locales(), [Locale::new("en")]);
    }

    #[test]
    fn invalid_manifest_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = dir.path().join(MANIFEST_FILE);
        std::fs::write(&manifest, "parallel = \"sometimes\"\n").unwrap();
        assert!(matches!(
            RepositoryConfig::open(&manifest),
            Err(FailToLoadConfig::TomlParse(_))
        ));
        assert!(matches!(
            RepositoryConfig::open(dir.path().join("missing.toml")),
            Err(FailToLoadConfig::Io(_))
        ));
    }
}
