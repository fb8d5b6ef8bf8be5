//! Related-article ranking
//!
//! A candidate earns [`CATEGORY_WEIGHT`] for sharing the reference's category and
//! [`TAG_WEIGHT`] for every distinct tag both articles carry. Fields are read for the
//! locale each article belongs to.

use std::collections::HashSet;

use crate::article::Article;

/// Number of related articles returned when the caller does not say
pub const DEFAULT_RELATED_LIMIT: usize = 3;

/// Score for an equal category
pub const CATEGORY_WEIGHT: u32 = 3;

/// Score per shared tag
pub const TAG_WEIGHT: u32 = 1;

/// Similarity of `candidate` to `reference`.
///
/// Categories are compared verbatim, so two articles that both lack a category
/// (or both lack its twin) count as sharing one.
#[must_use]
pub fn score(reference: &Article, candidate: &Article) -> u32 {
    let category_score = if reference.category() == candidate.category() {
        CATEGORY_WEIGHT
    } else {
        0
    };

    let reference_tags: HashSet<&str> = reference.tags().iter().map(String::as_str).collect();
    let shared = candidate
        .tags()
        .iter()
        .map(String::as_str)
        .collect::<HashSet<_>>()
        .intersection(&reference_tags)
        .count();

    category_score + u32::try_from(shared).unwrap_or(u32::MAX) * TAG_WEIGHT
}

/// Score every candidate other than the reference itself, best first.
///
/// The sort is stable: equal scores keep the order the candidates came in.
/// Zero scores are kept and ranked last.
#[must_use]
pub fn rank(
    reference: &Article,
    candidates: impl IntoIterator<Item = Article>,
) -> Vec<(Article, u32)> {
    let mut ranked: Vec<(Article, u32)> = candidates
        .into_iter()
        .filter(|candidate| candidate.slug() != reference.slug())
        .map(|candidate| {
            let score = score(reference, &candidate);
            (candidate, score)
        })
        .collect();
    ranked.sort_by(|(_, left), (_, right)| right.cmp(left));
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        locale::{FieldVariant, Locale},
        metadata::ArticleMetadata,
    };

    fn article(slug: &str, category: &str, tags: &[&str]) -> Article {
        Article::new(
            slug,
            Locale::default(),
            FieldVariant::Primary,
            ArticleMetadata::builder()
                .category(category)
                .tags(tags.iter().copied())
                .build(),
            "",
        )
    }

    #[test]
    fn category_and_tags_add_up() {
        let reference = article("ref", "nutrition", &["cramps", "diet"]);
        assert_eq!(score(&reference, &article("x", "nutrition", &["diet", "sleep"])), 4);
        assert_eq!(score(&reference, &article("y", "sleep", &["cramps"])), 1);
        assert_eq!(score(&reference, &article("z", "nutrition", &[])), 3);
    }

    #[test]
    fn duplicate_tags_count_once() {
        let reference = article("ref", "", &["diet", "diet"]);
        assert_eq!(score(&reference, &article("x", "", &["diet", "diet", "diet"])), 1);
    }

    #[test]
    fn empty_categories_are_equal() {
        assert_eq!(score(&article("ref", "", &[]), &article("x", "", &[])), 3);
        assert_eq!(score(&article("ref", "", &[]), &article("y", "sleep", &[])), 0);
    }

    #[test]
    fn ranking_is_stable_and_excludes_reference() {
        let reference = article("ref", "nutrition", &["cramps", "diet"]);
        let candidates = vec![
            article("y", "sleep", &["cramps"]),
            reference.clone(),
            article("first-zero", "travel", &[]),
            article("x", "nutrition", &["diet", "sleep"]),
            article("second-zero", "travel", &[]),
            article("z", "nutrition", &[]),
        ];
        let order: Vec<(String, u32)> = rank(&reference, candidates)
            .into_iter()
            .map(|(article, score)| (article.slug().to_owned(), score))
            .collect();
        assert_eq!(
            order,
            [
                ("x".to_owned(), 4),
                ("z".to_owned(), 3),
                ("y".to_owned(), 1),
                ("first-zero".to_owned(), 0),
                ("second-zero".to_owned(), 0),
            ]
        );
    }
}
