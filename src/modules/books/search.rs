//! Full-scan search over the book collection.
//!
//! There is no index: each query scans every record of a freshly loaded
//! collection. Large collections are split across a bounded worker pool; each
//! worker evaluates its records independently and the pool joins all results
//! before returning. Result order is not part of the contract.

use anyhow::Context;
use rayon::prelude::*;
use shelf_kernel::settings::SearchSettings;

use super::models::Book;

/// Case-insensitive substring matcher backed by a dedicated thread pool.
pub struct SearchEngine {
    pool: rayon::ThreadPool,
    parallel_threshold: usize,
}

impl SearchEngine {
    pub fn new(settings: &SearchSettings) -> anyhow::Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(settings.workers)
            .thread_name(|i| format!("shelf-search-{i}"))
            .build()
            .context("failed to build search worker pool")?;

        Ok(Self {
            pool,
            parallel_threshold: settings.parallel_threshold,
        })
    }

    /// Number of worker threads in the pool
    pub fn workers(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Return every book whose title, description or genre contains `query`,
    /// ignoring case. Blocks until all workers finish.
    pub fn search(&self, books: Vec<Book>, query: &str) -> Vec<Book> {
        let needle = query.to_lowercase();

        if books.len() < self.parallel_threshold {
            return books
                .into_iter()
                .filter(|book| matches(book, &needle))
                .collect();
        }

        self.pool.install(|| {
            books
                .into_par_iter()
                .filter(|book| matches(book, &needle))
                .collect()
        })
    }
}

/// `needle` must already be lowercase.
fn matches(book: &Book, needle: &str) -> bool {
    let contains = |haystack: &str| haystack.to_lowercase().contains(needle);

    contains(&book.title)
        || contains(&book.genre)
        || book.description.as_deref().is_some_and(contains)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(id: &str, title: &str, genre: &str, description: Option<&str>) -> Book {
        Book {
            book_id: id.to_string(),
            title: title.to_string(),
            genre: genre.to_string(),
            description: description.map(str::to_string),
            ..Book::default()
        }
    }

    fn engine(parallel_threshold: usize) -> SearchEngine {
        SearchEngine::new(&SearchSettings {
            workers: 2,
            parallel_threshold,
        })
        .unwrap()
    }

    fn ids(books: Vec<Book>) -> Vec<String> {
        let mut ids: Vec<String> = books.into_iter().map(|b| b.book_id).collect();
        ids.sort();
        ids
    }

    fn sample() -> Vec<Book> {
        vec![
            book("1", "Go in Action", "programming", Some("abc")),
            book("2", "Docker Deep Dive", "devops", Some("test02")),
            book("3", "The Hobbit", "Fantasy", None),
        ]
    }

    #[test]
    fn title_match_is_case_insensitive() {
        let found = engine(usize::MAX).search(sample(), "go");
        assert_eq!(ids(found), vec!["1"]);

        let found = engine(usize::MAX).search(sample(), "DEEP");
        assert_eq!(ids(found), vec!["2"]);
    }

    #[test]
    fn matches_description_and_genre() {
        assert_eq!(ids(engine(usize::MAX).search(sample(), "TEST02")), vec!["2"]);
        assert_eq!(ids(engine(usize::MAX).search(sample(), "fantasy")), vec!["3"]);
    }

    #[test]
    fn no_match_yields_empty() {
        assert!(engine(usize::MAX).search(sample(), "xyz").is_empty());
        assert!(engine(usize::MAX).search(Vec::new(), "go").is_empty());
    }

    #[test]
    fn parallel_path_finds_the_same_set() {
        let books: Vec<Book> = (0..500)
            .map(|n| {
                let title = if n % 7 == 0 { "Rust Atomics" } else { "Cooking" };
                book(&n.to_string(), title, "misc", None)
            })
            .collect();

        let sequential = ids(engine(usize::MAX).search(books.clone(), "rust"));
        let parallel = ids(engine(0).search(books, "rust"));

        assert_eq!(parallel.len(), (0..500).filter(|n| n % 7 == 0).count());
        assert_eq!(parallel, sequential);
    }

    #[test]
    fn pool_size_follows_settings() {
        assert_eq!(engine(0).workers(), 2);
    }
}
