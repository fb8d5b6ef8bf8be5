//! Read-only content repository for locale-partitioned articles.
//!
//! Documents live under `<root>/<locale>/<slug>.<ext>` as front matter plus body.
//! [`ContentRepository`] loads them, [`ContentExt`] queries them, and
//! [`related`] ranks similar articles by shared category and tags.
//!
//! ```no_run
//! use folio::{ContentExt, ContentRepository};
//!
//! let repository = ContentRepository::new("content");
//! for article in repository.list_featured("en", 3) {
//!     println!("{} ({})", article.title(), article.slug());
//! }
//! let related = repository.related_to("leg-cramps", "en", folio::related::DEFAULT_RELATED_LIMIT);
//! # let _ = related;
//! ```

pub mod article;
pub mod cache;
pub mod config;
pub mod document;
pub mod locale;
pub mod metadata;
pub mod query;
pub mod related;
pub mod repository;
pub mod telemetry;

pub use article::Article;
pub use cache::CachedSource;
pub use config::RepositoryConfig;
pub use locale::{FieldVariant, Locale};
pub use query::ContentExt;
pub use repository::{ArticleSource, ContentRepository};
