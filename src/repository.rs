//! Filesystem-backed article source.

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Arc,
    time::UNIX_EPOCH,
};

use rayon::prelude::*;
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::{
    article::Article,
    config::{FailToLoadConfig, RepositoryConfig},
    locale::{FieldVariant, Locale},
};

/// Anything that can produce the articles of a locale.
///
/// Implementors only load; every query is provided by [`crate::query::ContentExt`].
pub trait ArticleSource {
    /// Load every article of `locale`, in enumeration order.
    ///
    /// Never fails: storage problems surface as fewer or zero articles.
    fn load(&self, locale: &str) -> Vec<Article>;

    /// A token that changes whenever the articles of `locale` may have changed.
    ///
    /// `None` means the source cannot tell, and callers must not reuse earlier results.
    fn revision(&self, _locale: &str) -> Option<String> {
        None
    }
}

/// structure of a content tree is as follows:
/// ```text
/// /content-root
/// ├── en
/// │   ├── leg-cramps.md
/// │   ├── sleep-and-diet.md
/// ├── zh
/// │   ├── leg-cramps.md
/// ```
/// Each locale directory holds one document per article, named `<slug>.<ext>`.
/// The repository is read-only and keeps nothing between calls: every query lists
/// the locale directory and parses each document again.
#[derive(Debug, Clone)]
pub struct ContentRepository(Arc<RepositoryInner>);

#[derive(Debug)]
struct RepositoryInner {
    config: RepositoryConfig,
}

impl ContentRepository {
    /// Repository over `root` with default configuration
    #[must_use]
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self::with_config(RepositoryConfig::new(root))
    }

    /// Repository described by `config`
    #[must_use]
    pub fn with_config(config: RepositoryConfig) -> Self {
        Self(Arc::new(RepositoryInner { config }))
    }

    /// Open the repository described by a manifest file
    ///
    /// # Errors
    /// Returns `FailToLoadConfig` if the manifest cannot be read or parsed
    pub fn open(manifest: impl AsRef<Path>) -> Result<Self, FailToLoadConfig> {
        RepositoryConfig::open(manifest).map(Self::with_config)
    }

    /// Get the configuration
    #[must_use]
    pub fn config(&self) -> &RepositoryConfig {
        &self.0.config
    }

    /// Get the content root
    #[must_use]
    pub fn root(&self) -> &Path {
        self.config().root()
    }

    /// Directory of `locale`, or `None` if the code cannot name a directory safely
    #[must_use]
    pub fn locale_dir(&self, locale: &Locale) -> Option<PathBuf> {
        locale
            .is_directory_name()
            .then(|| self.root().join(locale.as_str()))
    }

    /// Field twin read under `locale`
    #[must_use]
    pub fn variant(&self, locale: &Locale) -> FieldVariant {
        FieldVariant::for_locale(locale, self.config().default_locale())
    }

    /// Declared locales, or the locale directories found under the root when none are declared
    #[must_use]
    pub fn locales(&self) -> Vec<Locale> {
        if !self.config().locales().is_empty() {
            return self.config().locales().to_vec();
        }

        let entries = match fs::read_dir(self.root()) {
            Ok(entries) => entries,
            Err(err) => {
                debug!(root = %self.root().display(), error = %err, "content root is not readable");
                return Vec::new();
            }
        };

        let mut locales: Vec<Locale> = entries
            .filter_map(Result::ok)
            .filter(|entry| entry.path().is_dir())
            .filter_map(|entry| entry.file_name().to_str().map(Locale::new))
            .filter(Locale::is_directory_name)
            .collect();
        locales.sort();
        locales
    }

    /// Document files of `locale` in enumeration order (ascending file name)
    ///
    /// # Errors
    /// Returns `std::io::Error` if the locale directory cannot be listed
    pub fn documents(&self, locale: &Locale) -> std::io::Result<Vec<PathBuf>> {
        let Some(dir) = self.locale_dir(locale) else {
            return Err(std::io::Error::new(
                ErrorKind::InvalidInput,
                format!("`{locale}` cannot name a locale directory"),
            ));
        };

        let mut paths = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let path = match entry {
                Ok(entry) => entry.path(),
                Err(err) => {
                    warn!(dir = %dir.display(), error = %err, "skipping unreadable directory entry");
                    continue;
                }
            };
            if self.is_document(&path) {
                paths.push(path);
            }
        }
        paths.sort();
        Ok(paths)
    }

    fn is_document(&self, path: &Path) -> bool {
        let hidden = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_none_or(|name| name.starts_with('.'));
        let accepted = path
            .extension()
            .and_then(|extension| extension.to_str())
            .is_some_and(|extension| self.config().accepts_extension(extension));
        !hidden && accepted && path.is_file()
    }

    fn open_article(path: &Path, locale: &Locale, variant: FieldVariant) -> Option<Article> {
        match Article::open(path, locale, variant) {
            Ok(article) => Some(article),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "skipping unreadable document");
                None
            }
        }
    }
}

impl ArticleSource for ContentRepository {
    fn load(&self, locale: &str) -> Vec<Article> {
        let locale = Locale::new(locale);
        let paths = match self.documents(&locale) {
            Ok(paths) => paths,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(%locale, "locale directory not found");
                return Vec::new();
            }
            Err(err) => {
                warn!(%locale, error = %err, "cannot list locale directory");
                return Vec::new();
            }
        };

        let variant = self.variant(&locale);
        let articles: Vec<Article> = if self.config().parallel() {
            paths
                .par_iter()
                .filter_map(|path| Self::open_article(path, &locale, variant))
                .collect()
        } else {
            paths
                .iter()
                .filter_map(|path| Self::open_article(path, &locale, variant))
                .collect()
        };

        if articles.len() < paths.len() {
            warn!(
                %locale,
                skipped = paths.len() - articles.len(),
                "some documents were skipped"
            );
        }
        debug!(%locale, count = articles.len(), "loaded articles");
        articles
    }

    // Listing plus one `stat` per document, no reads.
    fn revision(&self, locale: &str) -> Option<String> {
        let locale = Locale::new(locale);
        let paths = match self.documents(&locale) {
            Ok(paths) => paths,
            Err(err) if err.kind() == ErrorKind::NotFound => Vec::new(),
            Err(_) => return None,
        };

        let mut hasher = Sha256::new();
        for path in &paths {
            hasher.update(path.to_string_lossy().as_bytes());
            hasher.update([0u8]);
            if let Ok(metadata) = fs::metadata(path) {
                fingerprint(&mut hasher, &metadata);
            }
        }
        let result = hasher.finalize();
        Some(format!("{result:x}"))
    }
}

// Size and mtime everywhere; inode and ctime where the platform has them, so a
// file replaced by rename is noticed even when size and mtime were preserved.
fn fingerprint(hasher: &mut Sha256, metadata: &fs::Metadata) {
    hasher.update(metadata.len().to_le_bytes());
    let modified = metadata
        .modified()
        .ok()
        .and_then(|time| time.duration_since(UNIX_EPOCH).ok())
        .map_or(0, |elapsed| elapsed.as_nanos());
    hasher.update(modified.to_le_bytes());

    #[cfg(unix)]
    {
        use std::os::unix::fs::MetadataExt;
        hasher.update(metadata.ino().to_le_bytes());
        hasher.update(metadata.ctime().to_le_bytes());
        hasher.update(metadata.ctime_nsec().to_le_bytes());
    }
}

impl<S: ArticleSource + ?Sized> ArticleSource for &S {
    fn load(&self, locale: &str) -> Vec<Article> {
        (**self).load(locale)
    }

    fn revision(&self, locale: &str) -> Option<String> {
        (**self).revision(locale)
    }
}

impl<S: ArticleSource + ?Sized> ArticleSource for Arc<S> {
    fn load(&self, locale: &str) -> Vec<Article> {
        (**self).load(locale)
    }

    fn revision(&self, locale: &str) -> Option<String> {
        (**self).revision(locale)
    }
}

// In-memory source: the articles whose locale matches, in slice order.
impl ArticleSource for [Article] {
    fn load(&self, locale: &str) -> Vec<Article> {
        self.iter()
            .filter(|article| article.locale() == locale)
            .cloned()
            .collect()
    }
}

impl ArticleSource for Vec<Article> {
    fn load(&self, locale: &str) -> Vec<Article> {
        self.as_slice().load(locale)
    }
}
