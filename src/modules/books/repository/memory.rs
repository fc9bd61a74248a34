use async_trait::async_trait;
use bson::oid::ObjectId;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::RwLock;

use super::{
    creation_time, parse_id, sort_by_title, sort_newest_first, BookRepository, RepositoryResult,
};
use crate::modules::books::models::{Book, BookChanges, NewBook};

/// Process-local repository keyed by hex ObjectId.
///
/// Clones share the same underlying map. Queries scan every record, which is
/// fine for tests and small demo catalogs.
#[derive(Debug, Default, Clone)]
pub struct InMemoryBookRepository {
    books: Arc<RwLock<HashMap<String, Book>>>,
}

impl InMemoryBookRepository {
    pub fn new() -> Self {
        Self::default()
    }

    async fn select(&self, predicate: impl Fn(&Book) -> bool) -> Vec<Book> {
        let books = self.books.read().await;
        let mut selected: Vec<Book> = books.values().filter(|b| predicate(b)).cloned().collect();
        sort_by_title(&mut selected);
        selected
    }
}

/// Canonical map key for a user-supplied id
fn key(id: &str) -> Option<String> {
    parse_id(id).map(|oid| oid.to_hex())
}

#[async_trait]
impl BookRepository for InMemoryBookRepository {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> RepositoryResult<()> {
        Ok(())
    }

    async fn ensure_indexes(&self) -> RepositoryResult<()> {
        Ok(())
    }

    async fn list(&self) -> RepositoryResult<Vec<Book>> {
        let mut books: Vec<Book> = self.books.read().await.values().cloned().collect();
        sort_newest_first(&mut books);
        Ok(books)
    }

    async fn insert(&self, book: NewBook) -> RepositoryResult<Book> {
        let book = Book::from_new(ObjectId::new().to_hex(), book, creation_time());
        self.books
            .write()
            .await
            .insert(book.id.clone(), book.clone());
        Ok(book)
    }

    async fn get(&self, id: &str) -> RepositoryResult<Option<Book>> {
        let Some(key) = key(id) else {
            return Ok(None);
        };
        Ok(self.books.read().await.get(&key).cloned())
    }

    async fn update(&self, id: &str, changes: BookChanges) -> RepositoryResult<Option<Book>> {
        let Some(key) = key(id) else {
            return Ok(None);
        };
        let mut books = self.books.write().await;
        Ok(books.get_mut(&key).map(|book| {
            changes.apply(book);
            book.clone()
        }))
    }

    async fn delete(&self, id: &str) -> RepositoryResult<bool> {
        let Some(key) = key(id) else {
            return Ok(false);
        };
        Ok(self.books.write().await.remove(&key).is_some())
    }

    async fn find_by_genre(&self, genre: &str) -> RepositoryResult<Vec<Book>> {
        Ok(self.select(|book| book.genre == genre).await)
    }

    async fn find_by_read_status(&self, is_read: bool) -> RepositoryResult<Vec<Book>> {
        Ok(self.select(|book| book.is_read == is_read).await)
    }

    async fn search(&self, query: &str) -> RepositoryResult<Vec<Book>> {
        Ok(self.select(|book| book.matches_text(query)).await)
    }

    async fn clear(&self) -> RepositoryResult<u64> {
        let mut books = self.books.write().await;
        let removed = books.len() as u64;
        books.clear();
        Ok(removed)
    }
}
