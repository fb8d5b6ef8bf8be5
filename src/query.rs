//! Queries over an [`ArticleSource`].
//!
//! Every query loads the locale afresh through the source, so results reflect the
//! content at call time. Filters compare the locale-appropriate field twin exactly.

use std::collections::BTreeSet;

use tracing::debug;

use crate::{article::Article, related, repository::ArticleSource};

/// Number of featured articles returned when the caller does not say
pub const DEFAULT_FEATURED_LIMIT: usize = 3;

/// Query operations available on every article source
pub trait ContentExt: ArticleSource {
    /// All articles of `locale`, newest first.
    ///
    /// Articles with equal dates keep enumeration order; undated articles come last.
    fn list_articles(&self, locale: &str) -> Vec<Article> {
        let mut articles = self.load(locale);
        sort_by_recency(&mut articles);
        articles
    }

    /// The article named `slug`, if `locale` has one
    fn get_article(&self, slug: &str, locale: &str) -> Option<Article> {
        let article = self
            .load(locale)
            .into_iter()
            .find(|article| article.slug() == slug);
        if article.is_none() {
            debug!(slug, locale, "article not found");
        }
        article
    }

    /// Articles whose category equals `category`, newest first
    fn list_by_category(&self, category: &str, locale: &str) -> Vec<Article> {
        self.list_articles(locale)
            .into_iter()
            .filter(|article| article.category() == category)
            .collect()
    }

    /// Articles carrying `tag`, newest first
    fn list_by_tag(&self, tag: &str, locale: &str) -> Vec<Article> {
        self.list_articles(locale)
            .into_iter()
            .filter(|article| article.tags().iter().any(|candidate| candidate == tag))
            .collect()
    }

    /// The `limit` most recent articles
    fn list_featured(&self, locale: &str, limit: usize) -> Vec<Article> {
        let mut articles = self.list_articles(locale);
        articles.truncate(limit);
        articles
    }

    /// Distinct non-empty categories of `locale`
    fn list_categories(&self, locale: &str) -> BTreeSet<String> {
        self.load(locale)
            .iter()
            .map(Article::category)
            .filter(|category| !category.is_empty())
            .map(str::to_owned)
            .collect()
    }

    /// Distinct non-empty tags of `locale`
    fn list_tags(&self, locale: &str) -> BTreeSet<String> {
        self.load(locale)
            .iter()
            .flat_map(Article::tags)
            .filter(|tag| !tag.is_empty())
            .cloned()
            .collect()
    }

    /// Up to `limit` articles related to `slug`, most similar first.
    ///
    /// Returns nothing when `slug` is unknown. Zero-score candidates fill the tail.
    fn related_to(&self, slug: &str, locale: &str, limit: usize) -> Vec<Article> {
        self.related_scored(slug, locale, limit)
            .into_iter()
            .map(|(article, _)| article)
            .collect()
    }

    /// Like [`ContentExt::related_to`], keeping each candidate's score
    fn related_scored(&self, slug: &str, locale: &str, limit: usize) -> Vec<(Article, u32)> {
        let articles = self.list_articles(locale);
        let Some(reference) = articles.iter().find(|article| article.slug() == slug).cloned()
        else {
            debug!(slug, locale, "no reference article for related lookup");
            return Vec::new();
        };

        let mut ranked = related::rank(&reference, articles);
        ranked.truncate(limit);
        ranked
    }
}

impl<S: ArticleSource + ?Sized> ContentExt for S {}

/// Stable sort, newest first; `None` dates sort after every date
pub fn sort_by_recency(articles: &mut [Article]) {
    articles.sort_by(|left, right| right.date().cmp(&left.date()));
}
