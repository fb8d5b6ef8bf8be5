//! Article records read from documents.

use std::path::Path;

use serde::Serialize;
use time::Date;

use crate::{
    document::{self, Document, ParseError},
    locale::{FieldVariant, Locale},
    metadata::ArticleMetadata,
};

/// One locale-specific rendering of a content document, identified by its slug.
///
/// Accessors for locale-variant fields (`title`, `summary`, `category`, `tags`,
/// `reading_time` and the SEO texts) answer for the locale the article was read under.
/// Under a non-default locale an unauthored twin reads as empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Article {
    slug: String,
    locale: Locale,
    variant: FieldVariant,
    #[serde(flatten)]
    metadata: ArticleMetadata,
    content: String, // opaque body
}

impl Article {
    /// Create a new article with the given parameters
    #[must_use]
    pub fn new(
        slug: impl Into<String>,
        locale: Locale,
        variant: FieldVariant,
        metadata: ArticleMetadata,
        content: impl Into<String>,
    ) -> Self {
        Self {
            slug: slug.into(),
            locale,
            variant,
            metadata,
            content: content.into(),
        }
    }

    /// Assemble an article from a parsed document
    #[must_use]
    pub fn from_document(
        slug: impl Into<String>,
        locale: &Locale,
        variant: FieldVariant,
        document: Document,
    ) -> Self {
        let (metadata, body) = document.into_parts();
        let metadata = ArticleMetadata::from_metadata(&metadata, locale, variant);
        Self::new(slug, locale.clone(), variant, metadata, body)
    }

    /// Get the slug, the file name without its extension
    #[must_use]
    pub const fn slug(&self) -> &str {
        self.slug.as_str()
    }

    /// Get the locale directory this article was read from
    #[must_use]
    pub const fn locale(&self) -> &Locale {
        &self.locale
    }

    /// Which field twin this article's accessors read
    #[must_use]
    pub const fn variant(&self) -> FieldVariant {
        self.variant
    }

    /// Get the typed metadata, including both sides of every locale-variant pair
    #[must_use]
    pub const fn metadata(&self) -> &ArticleMetadata {
        &self.metadata
    }

    /// Get the body of the document, verbatim
    #[must_use]
    pub const fn content(&self) -> &str {
        self.content.as_str()
    }

    /// Title for this article's locale
    #[must_use]
    pub fn title(&self) -> &str {
        text(self.metadata.title().resolve(self.variant))
    }

    /// Summary for this article's locale
    #[must_use]
    pub fn summary(&self) -> &str {
        text(self.metadata.summary().resolve(self.variant))
    }

    /// Category for this article's locale
    #[must_use]
    pub fn category(&self) -> &str {
        text(self.metadata.category().resolve(self.variant))
    }

    /// Tags for this article's locale
    #[must_use]
    pub fn tags(&self) -> &[String] {
        self.metadata
            .tags()
            .resolve(self.variant)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Reading time for this article's locale
    #[must_use]
    pub fn reading_time(&self) -> &str {
        text(self.metadata.reading_time().resolve(self.variant))
    }

    /// Get the author
    #[must_use]
    pub fn author(&self) -> &str {
        self.metadata.author()
    }

    /// Get the featured image reference
    #[must_use]
    pub fn featured_image(&self) -> &str {
        self.metadata.featured_image()
    }

    /// Get the publication date
    #[must_use]
    pub const fn date(&self) -> Option<Date> {
        self.metadata.date()
    }

    /// SEO title, when authored for this article's locale
    #[must_use]
    pub fn seo_title(&self) -> Option<&str> {
        non_empty(self.metadata.seo_title().resolve(self.variant))
    }

    /// SEO description, when authored for this article's locale
    #[must_use]
    pub fn seo_description(&self) -> Option<&str> {
        non_empty(self.metadata.seo_description().resolve(self.variant))
    }

    /// Get the canonical URL
    #[must_use]
    pub fn canonical_url(&self) -> Option<&str> {
        self.metadata.canonical_url()
    }

    /// Get the structured-data schema type
    #[must_use]
    pub fn schema_type(&self) -> Option<&str> {
        self.metadata.schema_type()
    }
}

fn text(value: Option<&String>) -> &str {
    value.map_or("", String::as_str)
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|value| !value.is_empty())
}

/// Errors that can occur when opening an article file
#[derive(Debug, thiserror::Error)]
pub enum FailToOpenArticle {
    /// The file name has no usable UTF-8 stem to become a slug
    #[error("Cannot derive a slug from the file name")]
    InvalidSlug,
    /// I/O error, including files that are not valid UTF-8
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The metadata block is malformed
    #[error("Malformed document: {0}")]
    Malformed(#[from] ParseError),
}

impl Article {
    // example: /content/en/leg-cramps.md
    // would be open("/content/en/leg-cramps.md", "en", Primary) with slug `leg-cramps`
    /// Read and parse a single document file
    ///
    /// # Errors
    /// Returns `FailToOpenArticle::InvalidSlug` if the file name has no UTF-8 stem
    /// Returns `FailToOpenArticle::Io` if the file cannot be read as UTF-8 text
    /// Returns `FailToOpenArticle::Malformed` if the metadata block cannot be parsed
    pub fn open(
        path: impl AsRef<Path>,
        locale: &Locale,
        variant: FieldVariant,
    ) -> Result<Self, FailToOpenArticle> {
        let path = path.as_ref();
        let slug = slug_of(path).ok_or(FailToOpenArticle::InvalidSlug)?;
        let raw = std::fs::read_to_string(path)?;
        let document = document::parse(&raw)?;
        Ok(Self::from_document(slug, locale, variant, document))
    }
}

/// Slug of a document path: its file name without the extension
#[must_use]
pub fn slug_of(path: &Path) -> Option<&str> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .map(str::trim)
        .filter(|stem| !stem.is_empty())
}
