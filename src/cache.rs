//! Memoizing article source.

use std::{
    collections::HashMap,
    sync::{PoisonError, RwLock},
};

use tracing::debug;

use crate::{article::Article, repository::ArticleSource};

#[derive(Debug, Clone)]
struct Snapshot {
    revision: String,
    articles: Vec<Article>,
}

impl Snapshot {
    fn matches(&self, revision: &str) -> bool {
        self.revision == revision
    }
}

/// Memoizing decorator in front of an [`ArticleSource`].
///
/// Keeps one snapshot per locale, tagged with the source's revision. A load asks the
/// source for the current revision and re-parses only when it differs. Sources that
/// report no revision are passed straight through.
///
/// Over a [`ContentRepository`](crate::ContentRepository) the revision is derived from
/// file metadata, not contents. An in-place rewrite that keeps the file size and lands
/// within the filesystem's timestamp granularity can go unnoticed; call
/// [`CachedSource::invalidate`] after such edits.
#[derive(Debug)]
pub struct CachedSource<S> {
    source: S,
    snapshots: RwLock<HashMap<String, Snapshot>>,
}

impl<S: ArticleSource> CachedSource<S> {
    /// Wrap `source` with an empty cache
    #[must_use]
    pub fn new(source: S) -> Self {
        Self {
            source,
            snapshots: RwLock::new(HashMap::new()),
        }
    }

    /// Get the wrapped source
    pub const fn source(&self) -> &S {
        &self.source
    }

    /// Drop every snapshot
    pub fn invalidate(&self) {
        self.snapshots
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Cached articles of `locale` if they match `revision`
    fn hit(&self, locale: &str, revision: &str) -> Option<Vec<Article>> {
        self.snapshots
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(locale)
            .and_then(|snapshot| snapshot.matches(revision).then(|| snapshot.articles.clone()))
    }

    fn store(&self, locale: &str, revision: String, articles: Vec<Article>) {
        self.snapshots
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(locale.to_owned(), Snapshot { revision, articles });
    }
}

impl<S: ArticleSource> ArticleSource for CachedSource<S> {
    fn load(&self, locale: &str) -> Vec<Article> {
        let Some(revision) = self.source.revision(locale) else {
            return self.source.load(locale);
        };

        if let Some(articles) = self.hit(locale, &revision) {
            debug!(locale, "article cache hit");
            return articles;
        }

        debug!(locale, "article cache miss");
        let articles = self.source.load(locale);
        self.store(locale, revision.clone(), articles.clone());
        articles
    }

    fn revision(&self, locale: &str) -> Option<String> {
        self.source.revision(locale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        locale::{FieldVariant, Locale},
        query::ContentExt,
    };
    use std::sync::atomic::{AtomicUsize, Ordering};

    // Counts loads and reports a fixed revision
    #[derive(Debug, Default)]
    struct Counting {
        loads: AtomicUsize,
        revision: RwLock<Option<String>>,
    }

    impl ArticleSource for Counting {
        fn load(&self, locale: &str) -> Vec<Article> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            vec![Article::new(
                "only",
                Locale::new(locale),
                FieldVariant::Primary,
                Default::default(),
                "",
            )]
        }

        fn revision(&self, _locale: &str) -> Option<String> {
            self.revision.read().unwrap().clone()
        }
    }

    fn loads(cached: &CachedSource<Counting>) -> usize {
        cached.source().loads.load(Ordering::SeqCst)
    }

    #[test]
    fn reuses_snapshot_while_revision_holds() {
        let source = Counting::default();
        *source.revision.write().unwrap() = Some("1".into());
        let cached = CachedSource::new(source);

        assert_eq!(cached.list_articles("en").len(), 1);
        assert_eq!(cached.list_articles("en").len(), 1);
        assert_eq!(loads(&cached), 1);

        // locales are cached separately
        cached.load("zh");
        assert_eq!(loads(&cached), 2);

        *cached.source().revision.write().unwrap() = Some("2".into());
        cached.load("en");
        assert_eq!(loads(&cached), 3);

        cached.invalidate();
        cached.load("en");
        assert_eq!(loads(&cached), 4);
    }

    #[test]
    fn sources_without_revision_pass_through() {
        let cached = CachedSource::new(Counting::default());
        cached.load("en");
        cached.load("en");
        assert_eq!(loads(&cached), 2);
    }
}
