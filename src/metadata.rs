//! Article metadata
//! This module turns the loose front matter mapping into a typed record.
//!
//! Every field has a fixed type and an explicit default, so a field that was never authored
//! never makes a document unreadable:
//! ```plain
//! ---
//! title: Eating for better sleep       <--- primary field
//! title_zh: 改善睡眠的饮食               <--- twin read under the `zh` locale
//! date: 2024-03-01
//! tags: [diet, sleep]
//! ---
//! ```

use serde::Serialize;
use serde_json::Value;
use time::{Date, macros::format_description};

use crate::{
    document::Metadata,
    locale::{FieldVariant, Locale},
};

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

/// A field with a primary value and an optional locale-variant twin
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Localized<T> {
    primary: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    twin: Option<T>,
}

impl<T> Localized<T> {
    /// Create a field from its primary value and optional twin
    #[must_use]
    pub const fn new(primary: T, twin: Option<T>) -> Self {
        Self { primary, twin }
    }

    /// Get the primary value
    #[must_use]
    pub const fn primary(&self) -> &T {
        &self.primary
    }

    /// Get the twin, if it was authored
    #[must_use]
    pub const fn twin(&self) -> Option<&T> {
        self.twin.as_ref()
    }

    /// Value seen under `variant`.
    ///
    /// A missing twin resolves to `None`; the primary value is never substituted for it.
    #[must_use]
    pub const fn resolve(&self, variant: FieldVariant) -> Option<&T> {
        match variant {
            FieldVariant::Primary => Some(&self.primary),
            FieldVariant::Twin => self.twin.as_ref(),
        }
    }
}

/// Typed metadata of an article
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct ArticleMetadata {
    title: Localized<String>,
    summary: Localized<String>,
    category: Localized<String>,
    tags: Localized<Vec<String>>,
    reading_time: Localized<String>,
    seo_title: Localized<String>,
    seo_description: Localized<String>,
    author: String,
    featured_image: String,
    #[serde(with = "iso_date::option")]
    date: Option<Date>,
    canonical_url: Option<String>,
    schema_type: Option<String>,
}

impl ArticleMetadata {
    /// Build typed metadata from a parsed mapping.
    ///
    /// Twin fields are read only when `variant` is [`FieldVariant::Twin`], using the
    /// `<field>_<locale>` key.
    #[must_use]
    pub fn from_metadata(metadata: &Metadata, locale: &Locale, variant: FieldVariant) -> Self {
        let reader = FieldReader {
            metadata,
            twin: (variant == FieldVariant::Twin).then_some(locale),
        };

        Self {
            title: reader.localized("title", text),
            summary: reader.localized("summary", text),
            category: reader.localized("category", text),
            tags: reader.localized("tags", list),
            reading_time: reader.localized("reading_time", text),
            seo_title: reader.localized("seo_title", text),
            seo_description: reader.localized("seo_description", text),
            author: reader.read("author", text).unwrap_or_default(),
            featured_image: reader.read("featured_image", text).unwrap_or_default(),
            date: reader.read("date", text).and_then(|raw| parse_date(&raw)),
            canonical_url: reader.read("canonical_url", text).filter(|url| !url.is_empty()),
            schema_type: reader.read("schema_type", text).filter(|kind| !kind.is_empty()),
        }
    }

    /// Start building metadata in code
    #[must_use]
    pub fn builder() -> ArticleMetadataBuilder {
        ArticleMetadataBuilder::default()
    }

    /// Get the title pair
    #[must_use]
    pub const fn title(&self) -> &Localized<String> {
        &self.title
    }

    /// Get the summary pair
    #[must_use]
    pub const fn summary(&self) -> &Localized<String> {
        &self.summary
    }

    /// Get the category pair
    #[must_use]
    pub const fn category(&self) -> &Localized<String> {
        &self.category
    }

    /// Get the tags pair
    #[must_use]
    pub const fn tags(&self) -> &Localized<Vec<String>> {
        &self.tags
    }

    /// Get the reading time pair
    #[must_use]
    pub const fn reading_time(&self) -> &Localized<String> {
        &self.reading_time
    }

    /// Get the SEO title pair
    #[must_use]
    pub const fn seo_title(&self) -> &Localized<String> {
        &self.seo_title
    }

    /// Get the SEO description pair
    #[must_use]
    pub const fn seo_description(&self) -> &Localized<String> {
        &self.seo_description
    }

    /// Get the author of the article
    #[must_use]
    pub fn author(&self) -> &str {
        &self.author
    }

    /// Get the featured image reference
    #[must_use]
    pub fn featured_image(&self) -> &str {
        &self.featured_image
    }

    /// Get the publication date, if one was authored and readable
    #[must_use]
    pub const fn date(&self) -> Option<Date> {
        self.date
    }

    /// Get the canonical URL
    #[must_use]
    pub fn canonical_url(&self) -> Option<&str> {
        self.canonical_url.as_deref()
    }

    /// Get the structured-data schema type, such as `BlogPosting`
    #[must_use]
    pub fn schema_type(&self) -> Option<&str> {
        self.schema_type.as_deref()
    }
}

/// Builder for [`ArticleMetadata`], for fixtures and in-memory sources
#[derive(Debug, Clone, Default)]
pub struct ArticleMetadataBuilder(ArticleMetadata);

macro_rules! localized_setters {
    ($($field:ident / $twin:ident : $ty:ty),*) => {
        $(
            #[doc = concat!("Set the primary `", stringify!($field), "`")]
            #[must_use]
            pub fn $field(mut self, value: impl Into<$ty>) -> Self {
                self.0.$field.primary = value.into();
                self
            }

            #[doc = concat!("Set the twin of `", stringify!($field), "`")]
            #[must_use]
            pub fn $twin(mut self, value: impl Into<$ty>) -> Self {
                self.0.$field.twin = Some(value.into());
                self
            }
        )*
    };
}

impl ArticleMetadataBuilder {
    localized_setters!(
        title / twin_title: String,
        summary / twin_summary: String,
        category / twin_category: String,
        reading_time / twin_reading_time: String,
        seo_title / twin_seo_title: String,
        seo_description / twin_seo_description: String
    );

    /// Set the primary tags
    #[must_use]
    pub fn tags<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.0.tags.primary = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Set the twin tags
    #[must_use]
    pub fn twin_tags<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.0.tags.twin = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    /// Set the author
    #[must_use]
    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.0.author = author.into();
        self
    }

    /// Set the featured image reference
    #[must_use]
    pub fn featured_image(mut self, image: impl Into<String>) -> Self {
        self.0.featured_image = image.into();
        self
    }

    /// Set the publication date
    #[must_use]
    pub fn date(mut self, date: Date) -> Self {
        self.0.date = Some(date);
        self
    }

    /// Set the canonical URL
    #[must_use]
    pub fn canonical_url(mut self, url: impl Into<String>) -> Self {
        self.0.canonical_url = Some(url.into());
        self
    }

    /// Set the structured-data schema type
    #[must_use]
    pub fn schema_type(mut self, kind: impl Into<String>) -> Self {
        self.0.schema_type = Some(kind.into());
        self
    }

    /// Finish building
    #[must_use]
    pub fn build(self) -> ArticleMetadata {
        self.0
    }
}

struct FieldReader<'a> {
    metadata: &'a Metadata,
    twin: Option<&'a Locale>,
}

impl FieldReader<'_> {
    fn read<T>(&self, key: &str, convert: fn(&Value) -> Option<T>) -> Option<T> {
        self.metadata.get(key).and_then(convert)
    }

    fn localized<T: Default>(&self, field: &str, convert: fn(&Value) -> Option<T>) -> Localized<T> {
        let twin = self
            .twin
            .and_then(|locale| self.read(&locale.twin_key(field), convert));
        Localized::new(self.read(field, convert).unwrap_or_default(), twin)
    }
}

fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

// A sequence, or a single comma separated string
fn list(value: &Value) -> Option<Vec<String>> {
    match value {
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(text)
                .filter(|item| !item.is_empty())
                .collect(),
        ),
        Value::String(joined) => Some(
            joined
                .split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(str::to_owned)
                .collect(),
        ),
        Value::Null | Value::Object(_) => None,
        scalar => text(scalar).map(|item| vec![item]),
    }
}

fn parse_date(raw: &str) -> Option<Date> {
    // datetimes keep only their calendar date
    let raw = raw.trim();
    let head = raw.get(..10).unwrap_or(raw);
    let date = Date::parse(head, format_description!("[year]-[month]-[day]")).ok();
    if date.is_none() {
        tracing::debug!(value = raw, "ignoring unrecognized date");
    }
    date
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use time::macros::date;

    fn mapping(value: Value) -> Metadata {
        match value {
            Value::Object(map) => map.into_iter().collect(),
            _ => unreachable!(),
        }
    }

    #[test]
    fn unauthored_fields_default_to_empty() {
        let metadata = ArticleMetadata::from_metadata(
            &Metadata::new(),
            &Locale::default(),
            FieldVariant::Primary,
        );
        assert_eq!(metadata, ArticleMetadata::default());
        assert_eq!(metadata.title().primary(), "");
        assert!(metadata.tags().primary().is_empty());
        assert_eq!(metadata.date(), None);
        assert_eq!(metadata.canonical_url(), None);
    }

    #[test]
    fn reads_primary_fields() {
        let metadata = ArticleMetadata::from_metadata(
            &mapping(json!({
                "title": "Sleep",
                "date": "2024-03-01",
                "tags": ["diet", "", "sleep"],
                "category": "nutrition",
                "reading_time": 5,
                "author": "Ada",
                "featured_image": "/img/sleep.png",
                "canonical_url": "https://example.com/sleep",
                "schema_type": "BlogPosting",
                "title_zh": "睡眠",
            })),
            &Locale::new("en"),
            FieldVariant::Primary,
        );
        assert_eq!(metadata.title().primary(), "Sleep");
        assert_eq!(metadata.title().twin(), None);
        assert_eq!(metadata.date(), Some(date!(2024 - 03 - 01)));
        assert_eq!(metadata.tags().primary(), &["diet", "sleep"]);
        assert_eq!(metadata.reading_time().primary(), "5");
        assert_eq!(metadata.author(), "Ada");
        assert_eq!(metadata.featured_image(), "/img/sleep.png");
        assert_eq!(metadata.canonical_url(), Some("https://example.com/sleep"));
        assert_eq!(metadata.schema_type(), Some("BlogPosting"));
    }

    #[test]
    fn twins_are_read_under_other_locales() {
        let metadata = ArticleMetadata::from_metadata(
            &mapping(json!({
                "category": "nutrition",
                "category_zh": "营养",
                "tags": "diet, sleep",
            })),
            &Locale::new("zh"),
            FieldVariant::Twin,
        );
        let category = metadata.category();
        assert_eq!(category.resolve(FieldVariant::Twin).map(String::as_str), Some("营养"));
        assert_eq!(category.resolve(FieldVariant::Primary).map(String::as_str), Some("nutrition"));
        // no fallback to the primary tags
        assert_eq!(metadata.tags().resolve(FieldVariant::Twin), None);
        assert_eq!(metadata.tags().primary(), &["diet", "sleep"]);
    }

    #[test]
    fn dates_are_lenient() {
        assert_eq!(parse_date("2024-03-01T08:30:00Z"), Some(date!(2024 - 03 - 01)));
        assert_eq!(parse_date(" 2024-03-01 "), Some(date!(2024 - 03 - 01)));
        assert_eq!(parse_date("March 1st"), None);
        assert_eq!(parse_date("2024-13-01"), None);
    }

    #[test]
    fn strings_are_kept_verbatim() {
        let metadata = ArticleMetadata::from_metadata(
            &mapping(json!({
                "category": " nutrition",
                "tags": ["diet ", "sleep"],
            })),
            &Locale::default(),
            FieldVariant::Primary,
        );
        assert_eq!(metadata.category().primary(), " nutrition");
        assert_eq!(metadata.tags().primary(), &["diet ", "sleep"]);
    }

    #[test]
    fn builder_sets_twins() {
        let metadata = ArticleMetadata::builder()
            .title("Sleep")
            .twin_title("睡眠")
            .tags(["diet"])
            .twin_tags(["饮食"])
            .date(date!(2024 - 01 - 02))
            .build();
        assert_eq!(metadata.title().twin().map(String::as_str), Some("睡眠"));
        assert_eq!(metadata.tags().twin(), Some(&vec!["饮食".to_owned()]));
        assert_eq!(metadata.date(), Some(date!(2024 - 01 - 02)));
    }
}
