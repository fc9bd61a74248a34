//! Repository tests against a live MongoDB.
//!
//! Run with `MONGODB_URI=mongodb://... cargo test -- --ignored`.

use shelf_app::{BookRepository, CreateBook, MongoBookRepository, UpdateBook};
use shelf_kernel::settings::DatabaseSettings;

async fn repository() -> MongoBookRepository {
    let settings = DatabaseSettings {
        uri: std::env::var("MONGODB_URI").expect("MONGODB_URI must be set"),
        name: "shelf_test".to_string(),
        ..DatabaseSettings::default()
    };
    let (_, database) = shelf_db::connect(&settings).await.unwrap();
    let collection = format!("books_{}", bson::oid::ObjectId::new().to_hex());
    let repository = MongoBookRepository::new(database, &collection);
    repository.ensure_indexes().await.unwrap();
    repository
}

fn book(title: &str, author: &str, genre: &str) -> CreateBook {
    CreateBook {
        title: Some(title.to_string()),
        author: Some(author.to_string()),
        genre: Some(genre.to_string()),
        ..CreateBook::default()
    }
}

#[tokio::test]
#[ignore = "requires MONGODB_URI"]
async fn crud_round_trip() {
    let repository = repository().await;
    repository.ping().await.unwrap();

    let created = repository
        .insert(book("Dune", "Frank Herbert", "Science Fiction").validate().unwrap())
        .await
        .unwrap();
    assert_eq!(repository.get(&created.id).await.unwrap(), Some(created.clone()));

    let changes = UpdateBook {
        rating: Some(5.0),
        ..UpdateBook::default()
    }
    .validate()
    .unwrap();
    let updated = repository.update(&created.id, changes).await.unwrap().unwrap();
    assert_eq!(updated.rating, 5.0);
    assert_eq!(updated.created_at, created.created_at);

    assert!(repository.delete(&created.id).await.unwrap());
    assert!(!repository.delete(&created.id).await.unwrap());
    assert_eq!(repository.get(&created.id).await.unwrap(), None);
    assert_eq!(repository.get("not-an-id").await.unwrap(), None);

    repository.clear().await.unwrap();
}

#[tokio::test]
#[ignore = "requires MONGODB_URI"]
async fn queries_order_and_escape() {
    let repository = repository().await;
    for (title, author, genre) in [
        ("The Hobbit", "J.R.R. Tolkien", "Fantasy"),
        ("Emma", "Jane Austen", "Romance"),
        ("Beowulf", "Anonymous", "Fantasy"),
    ] {
        repository
            .insert(book(title, author, genre).validate().unwrap())
            .await
            .unwrap();
    }

    let titles = |books: Vec<shelf_app::Book>| -> Vec<String> {
        books.into_iter().map(|b| b.title).collect()
    };

    assert_eq!(
        titles(repository.list().await.unwrap()),
        vec!["Beowulf", "Emma", "The Hobbit"]
    );
    assert_eq!(
        titles(repository.find_by_genre("Fantasy").await.unwrap()),
        vec!["Beowulf", "The Hobbit"]
    );
    assert_eq!(
        titles(repository.search("j.r.r.").await.unwrap()),
        vec!["The Hobbit"]
    );
    assert!(repository.search("j.r.r.x").await.unwrap().is_empty());
    assert!(repository.search(".*").await.unwrap().is_empty());
    assert_eq!(repository.find_by_read_status(false).await.unwrap().len(), 3);

    assert_eq!(repository.clear().await.unwrap(), 3);
}
