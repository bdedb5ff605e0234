//! In-memory books repository.
//!
//! Records live in insertion order inside a `Vec` guarded by a read-write lock;
//! every method holds the lock for its whole operation.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::models::book::{Book, BookPayload, BookQuery, BookShort};

#[derive(Clone, Default)]
pub struct BooksRepository {
    books: Arc<RwLock<Vec<Book>>>,
}

impl BooksRepository {
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // READ
    // =========================================================================

    /// Projections of the books matching every filter, in insertion order
    pub async fn search(&self, query: &BookQuery) -> Vec<BookShort> {
        let books = self.books.read().await;
        books
            .iter()
            .filter(|book| query.matches(book))
            .map(BookShort::from)
            .collect()
    }

    pub async fn get_by_id(&self, id: &str) -> Option<Book> {
        let books = self.books.read().await;
        books.iter().find(|book| book.id == id).cloned()
    }

    pub async fn count(&self) -> usize {
        self.books.read().await.len()
    }

    // =========================================================================
    // WRITE
    // =========================================================================

    pub async fn create(&self, book: Book) {
        self.books.write().await.push(book);
    }

    /// Overwrite the mutable fields of a book.
    /// `id`, `inserted_at` and `finished` are left untouched.
    /// Returns false when no book has this id.
    pub async fn update(&self, id: &str, data: BookPayload, updated_at: DateTime<Utc>) -> bool {
        let mut books = self.books.write().await;
        let Some(book) = books.iter_mut().find(|book| book.id == id) else {
            return false;
        };

        book.name = data.name.unwrap_or_default();
        book.year = data.year;
        book.author = data.author;
        book.summary = data.summary;
        book.publisher = data.publisher;
        book.page_count = data.page_count.flatten();
        book.read_page = data.read_page.flatten();
        book.reading = data.reading;
        book.updated_at = updated_at;
        true
    }

    /// Remove a book, keeping the order of the others. Returns false when absent.
    pub async fn delete(&self, id: &str) -> bool {
        let mut books = self.books.write().await;
        match books.iter().position(|book| book.id == id) {
            Some(index) => {
                books.remove(index);
                true
            }
            None => false,
        }
    }
}
