//! Request-scoped lookup of books by content hash.

use std::collections::HashMap;

use super::Book;

/// Books from one result set, keyed by content hash.
///
/// An index lives as long as the command or request that built it and is
/// passed by reference to whatever needs a lookup. Books without a content
/// hash cannot be looked up and are not stored.
#[derive(Debug, Clone, Default)]
pub struct BookIndex {
    books: HashMap<String, Book>,
}

impl BookIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a book, returning the one it replaced.
    ///
    /// Returns `None` without storing when the book has no content hash.
    pub fn insert(&mut self, book: Book) -> Option<Book> {
        if book.content_hash.is_empty() {
            return None;
        }
        self.books.insert(normalize_hash(&book.content_hash), book)
    }

    /// Looks a book up by hash, ignoring case.
    #[must_use]
    pub fn get(&self, hash: &str) -> Option<&Book> {
        self.books.get(&normalize_hash(hash))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.books.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}

impl FromIterator<Book> for BookIndex {
    fn from_iter<I: IntoIterator<Item = Book>>(iter: I) -> Self {
        let mut index = Self::new();
        for book in iter {
            index.insert(book);
        }
        index
    }
}

fn normalize_hash(hash: &str) -> String {
    hash.trim().to_ascii_uppercase()
}
