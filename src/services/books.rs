//! Bookshelf service: validation and lifecycle of book records

use chrono::{DateTime, Utc};
use rand::Rng;

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookPayload, BookQuery, BookShort},
    repository::Repository,
};

/// URL-safe alphabet used for book identifiers
const ID_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789_-";
const ID_LENGTH: usize = 16;

/// Random 16-character identifier. Uniqueness is probabilistic, no collision check is made.
pub fn generate_book_id() -> String {
    let mut rng = rand::thread_rng();
    (0..ID_LENGTH)
        .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
        .collect()
}

/// Current time truncated to the precision exposed on the wire
fn now() -> DateTime<Utc> {
    let now = Utc::now();
    DateTime::<Utc>::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now)
}

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
}

impl BooksService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Validate and store a new book, returning its id
    pub async fn add(&self, data: BookPayload) -> AppResult<String> {
        let name = match data.name.as_deref() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => return Err(AppError::MissingName),
        };
        if data.read_page_exceeds_page_count() {
            return Err(AppError::ReadPageExceedsPageCount);
        }

        let timestamp = now();
        let book = Book {
            id: generate_book_id(),
            finished: data.is_finished(),
            name,
            year: data.year,
            author: data.author,
            summary: data.summary,
            publisher: data.publisher,
            page_count: data.page_count.flatten(),
            read_page: data.read_page.flatten(),
            reading: data.reading,
            inserted_at: timestamp,
            updated_at: timestamp,
        };
        let id = book.id.clone();

        self.repository.books.create(book).await;
        tracing::info!("Book added: id={}", id);
        Ok(id)
    }

    /// List books matching the query filters
    pub async fn list(&self, query: &BookQuery) -> Vec<BookShort> {
        let books = self.repository.books.search(query).await;
        tracing::debug!("Book list: {:?} -> {} result(s)", query, books.len());
        books
    }

    pub async fn get_by_id(&self, id: &str) -> AppResult<Book> {
        self.repository
            .books
            .get_by_id(id)
            .await
            .ok_or_else(|| AppError::NotFound("Buku tidak ditemukan".to_string()))
    }

    /// Overwrite a book's fields.
    ///
    /// Unlike `add`, no field is validated here and `finished` keeps the value
    /// computed at creation.
    pub async fn update(&self, id: &str, data: BookPayload) -> AppResult<()> {
        if !self.repository.books.update(id, data, now()).await {
            return Err(AppError::NotFound(
                "Gagal memperbarui buku. Id tidak ditemukan".to_string(),
            ));
        }
        tracing::info!("Book updated: id={}", id);
        Ok(())
    }

    pub async fn delete(&self, id: &str) -> AppResult<()> {
        if !self.repository.books.delete(id).await {
            return Err(AppError::NotFound(
                "Buku gagal dihapus. Id tidak ditemukan".to_string(),
            ));
        }
        tracing::info!("Book deleted: id={}", id);
        Ok(())
    }

    /// Number of books currently on the shelf
    pub async fn count(&self) -> usize {
        self.repository.books.count().await
    }
}
