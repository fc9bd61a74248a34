//! Storage seam for book records.
//!
//! Handlers only ever see `Arc<dyn BookRepository>`; bootstrap decides whether
//! it is backed by MongoDB or by the in-process map.

mod memory;
mod mongo;

pub use memory::InMemoryBookRepository;
pub use mongo::MongoBookRepository;

use async_trait::async_trait;
use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

use super::models::{Book, BookChanges, NewBook};

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("storage backend error: {0}")]
    Storage(#[from] mongodb::error::Error),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Shared handle injected into every module that touches books
pub type SharedBookRepository = Arc<dyn BookRepository>;

/// Every method maps to exactly one storage operation.
///
/// Identifiers that are not valid ObjectIds are treated as absent: lookups
/// return `None`, deletes return `false`.
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Short backend name reported by the readiness check
    fn backend(&self) -> &'static str;

    async fn ping(&self) -> RepositoryResult<()>;

    async fn ensure_indexes(&self) -> RepositoryResult<()>;

    /// All books, newest first
    async fn list(&self) -> RepositoryResult<Vec<Book>>;

    async fn insert(&self, book: NewBook) -> RepositoryResult<Book>;

    async fn get(&self, id: &str) -> RepositoryResult<Option<Book>>;

    /// Apply `changes` atomically and return the post-update record
    async fn update(&self, id: &str, changes: BookChanges) -> RepositoryResult<Option<Book>>;

    /// Returns whether a record was removed
    async fn delete(&self, id: &str) -> RepositoryResult<bool>;

    /// Exact genre match, ordered by title
    async fn find_by_genre(&self, genre: &str) -> RepositoryResult<Vec<Book>>;

    /// Books with the given read flag, ordered by title
    async fn find_by_read_status(&self, is_read: bool) -> RepositoryResult<Vec<Book>>;

    /// Literal, case-insensitive substring search over title, author and
    /// description, ordered by title
    async fn search(&self, query: &str) -> RepositoryResult<Vec<Book>>;

    /// Remove every book, returning how many were deleted
    async fn clear(&self) -> RepositoryResult<u64>;
}

pub(crate) fn parse_id(id: &str) -> Option<ObjectId> {
    ObjectId::parse_str(id).ok()
}

/// Creation timestamp truncated to the millisecond precision BSON stores
pub(crate) fn creation_time() -> DateTime<Utc> {
    bson::DateTime::now().to_chrono()
}

pub(crate) fn sort_by_title(books: &mut [Book]) {
    books.sort_by(|a, b| a.title.cmp(&b.title).then_with(|| a.id.cmp(&b.id)));
}

pub(crate) fn sort_newest_first(books: &mut [Book]) {
    books.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });
}
