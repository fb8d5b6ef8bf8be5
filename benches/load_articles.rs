use std::{fs, path::Path};

use folio::{CachedSource, ContentExt, ContentRepository, RepositoryConfig};
use tempfile::TempDir;

const ARTICLES: usize = 200;
const CATEGORIES: [&str; 4] = ["nutrition", "sleep", "exercise", "travel"];
const TAGS: [&str; 6] = ["diet", "cramps", "rest", "stretching", "hydration", "routine"];

fn main() {
    divan::main();
}

fn fixture() -> TempDir {
    let dir = tempfile::tempdir().unwrap_or_else(|err| panic!("Failed to create fixture: {err}"));
    let locale = dir.path().join("en");
    fs::create_dir_all(&locale).unwrap_or_else(|err| panic!("Failed to create {}: {err}", locale.display()));
    for index in 0..ARTICLES {
        write_article(&locale, index);
    }
    dir
}

fn write_article(dir: &Path, index: usize) {
    let document = format!(
        "---\ntitle: Article {index}\ndate: 2024-{:02}-{:02}\ncategory: {}\ntags: [{}, {}]\n---\n{}\n",
        index % 12 + 1,
        index % 28 + 1,
        CATEGORIES[index % CATEGORIES.len()],
        TAGS[index % TAGS.len()],
        TAGS[(index / 2) % TAGS.len()],
        "Body text. ".repeat(200),
    );
    let path = dir.join(format!("article-{index:04}.md"));
    fs::write(&path, document).unwrap_or_else(|err| panic!("Failed to write {}: {err}", path.display()));
}

#[divan::bench]
fn list_articles(bencher: divan::Bencher) {
    let dir = fixture();
    let repository = ContentRepository::new(dir.path());
    bencher.bench_local(|| repository.list_articles("en"));
}

#[divan::bench]
fn list_articles_parallel(bencher: divan::Bencher) {
    let dir = fixture();
    let repository =
        ContentRepository::with_config(RepositoryConfig::new(dir.path()).with_parallel(true));
    bencher.bench_local(|| repository.list_articles("en"));
}

#[divan::bench]
fn list_articles_cached(bencher: divan::Bencher) {
    let dir = fixture();
    let repository = CachedSource::new(ContentRepository::new(dir.path()));
    bencher.bench_local(|| repository.list_articles("en"));
}

#[divan::bench]
fn related_to(bencher: divan::Bencher) {
    let dir = fixture();
    let repository = ContentRepository::new(dir.path());
    bencher.bench_local(|| repository.related_to("article-0000", "en", 3));
}
