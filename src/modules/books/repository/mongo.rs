use async_trait::async_trait;
use bson::{doc, oid::ObjectId, Document};
use futures::TryStreamExt;
use mongodb::{options::ReturnDocument, Collection, Database, IndexModel};
use serde::{Deserialize, Serialize};

use super::{creation_time, parse_id, BookRepository, RepositoryResult};
use crate::modules::books::models::{Book, BookChanges, NewBook, DEFAULT_GENRE};

/// Stored shape of a book; `_id` and `createdAt` are native BSON types.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BookDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    title: String,
    author: String,
    #[serde(default)]
    published_year: Option<i32>,
    #[serde(default)]
    description: String,
    #[serde(default = "default_genre")]
    genre: String,
    #[serde(default)]
    rating: f64,
    #[serde(default)]
    is_read: bool,
    #[serde(default)]
    image: String,
    created_at: bson::DateTime,
}

fn default_genre() -> String {
    DEFAULT_GENRE.to_string()
}

impl From<BookDocument> for Book {
    fn from(document: BookDocument) -> Self {
        Self {
            id: document.id.to_hex(),
            title: document.title,
            author: document.author,
            published_year: document.published_year,
            description: document.description,
            genre: document.genre,
            rating: document.rating,
            is_read: document.is_read,
            image: document.image,
            created_at: document.created_at.to_chrono(),
        }
    }
}

fn set_document(changes: &BookChanges) -> Document {
    let mut set = Document::new();
    if let Some(title) = &changes.title {
        set.insert("title", title.as_str());
    }
    if let Some(author) = &changes.author {
        set.insert("author", author.as_str());
    }
    if let Some(year) = changes.published_year {
        set.insert("publishedYear", year);
    }
    if let Some(description) = &changes.description {
        set.insert("description", description.as_str());
    }
    if let Some(genre) = &changes.genre {
        set.insert("genre", genre.as_str());
    }
    if let Some(rating) = changes.rating {
        set.insert("rating", rating);
    }
    if let Some(is_read) = changes.is_read {
        set.insert("isRead", is_read);
    }
    if let Some(image) = &changes.image {
        set.insert("image", image.as_str());
    }
    set
}

/// Search filter matching `query` literally and case-insensitively
fn search_filter(query: &str) -> Document {
    let pattern = regex::escape(query);
    doc! {
        "$or": [
            { "title": { "$regex": pattern.as_str(), "$options": "i" } },
            { "author": { "$regex": pattern.as_str(), "$options": "i" } },
            { "description": { "$regex": pattern.as_str(), "$options": "i" } },
        ]
    }
}

/// MongoDB-backed repository over a single collection
#[derive(Debug, Clone)]
pub struct MongoBookRepository {
    database: Database,
    collection: Collection<BookDocument>,
}

impl MongoBookRepository {
    pub fn new(database: Database, collection_name: &str) -> Self {
        Self {
            collection: database.collection(collection_name),
            database,
        }
    }

    async fn find_sorted(&self, filter: Document, sort: Document) -> RepositoryResult<Vec<Book>> {
        let documents: Vec<BookDocument> = self
            .collection
            .find(filter)
            .sort(sort)
            .await?
            .try_collect()
            .await?;
        Ok(documents.into_iter().map(Book::from).collect())
    }

    async fn find_by_title(&self, filter: Document) -> RepositoryResult<Vec<Book>> {
        self.find_sorted(filter, doc! { "title": 1, "_id": 1 }).await
    }
}

#[async_trait]
impl BookRepository for MongoBookRepository {
    fn backend(&self) -> &'static str {
        "mongodb"
    }

    async fn ping(&self) -> RepositoryResult<()> {
        shelf_db::ping(&self.database).await?;
        Ok(())
    }

    async fn ensure_indexes(&self) -> RepositoryResult<()> {
        let indexes = [
            doc! { "createdAt": -1 },
            doc! { "title": 1 },
            doc! { "genre": 1 },
            doc! { "isRead": 1 },
        ]
        .into_iter()
        .map(|keys| IndexModel::builder().keys(keys).build());

        self.collection.create_indexes(indexes).await?;
        tracing::info!(
            collection = self.collection.name(),
            "book collection indexes ensured"
        );
        Ok(())
    }

    async fn list(&self) -> RepositoryResult<Vec<Book>> {
        self.find_sorted(doc! {}, doc! { "createdAt": -1, "_id": -1 })
            .await
    }

    async fn insert(&self, book: NewBook) -> RepositoryResult<Book> {
        let document = BookDocument {
            id: ObjectId::new(),
            title: book.title,
            author: book.author,
            published_year: book.published_year,
            description: book.description,
            genre: book.genre,
            rating: book.rating,
            is_read: book.is_read,
            image: book.image,
            created_at: bson::DateTime::from_chrono(creation_time()),
        };

        self.collection.insert_one(&document).await?;
        Ok(document.into())
    }

    async fn get(&self, id: &str) -> RepositoryResult<Option<Book>> {
        let Some(oid) = parse_id(id) else {
            return Ok(None);
        };
        Ok(self
            .collection
            .find_one(doc! { "_id": oid })
            .await?
            .map(Book::from))
    }

    async fn update(&self, id: &str, changes: BookChanges) -> RepositoryResult<Option<Book>> {
        let Some(oid) = parse_id(id) else {
            return Ok(None);
        };
        if changes.is_empty() {
            return self.get(id).await;
        }

        Ok(self
            .collection
            .find_one_and_update(doc! { "_id": oid }, doc! { "$set": set_document(&changes) })
            .return_document(ReturnDocument::After)
            .await?
            .map(Book::from))
    }

    async fn delete(&self, id: &str) -> RepositoryResult<bool> {
        let Some(oid) = parse_id(id) else {
            return Ok(false);
        };
        let result = self.collection.delete_one(doc! { "_id": oid }).await?;
        Ok(result.deleted_count == 1)
    }

    async fn find_by_genre(&self, genre: &str) -> RepositoryResult<Vec<Book>> {
        self.find_by_title(doc! { "genre": genre }).await
    }

    async fn find_by_read_status(&self, is_read: bool) -> RepositoryResult<Vec<Book>> {
        self.find_by_title(doc! { "isRead": is_read }).await
    }

    async fn search(&self, query: &str) -> RepositoryResult<Vec<Book>> {
        self.find_by_title(search_filter(query)).await
    }

    async fn clear(&self) -> RepositoryResult<u64> {
        let result = self.collection.delete_many(doc! {}).await?;
        Ok(result.deleted_count)
    }
}
