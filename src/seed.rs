//! Sample catalog used to populate an empty database.

use anyhow::Context;

use crate::modules::books::{
    models::{Book, CreateBook},
    repository::BookRepository,
};

fn sample(
    title: &str,
    author: &str,
    description: &str,
    published_year: i32,
    genre: &str,
    rating: f64,
    is_read: bool,
) -> CreateBook {
    CreateBook {
        title: Some(title.to_string()),
        author: Some(author.to_string()),
        published_year: Some(published_year),
        description: Some(description.to_string()),
        genre: Some(genre.to_string()),
        rating: Some(rating),
        is_read: Some(is_read),
        image: None,
    }
}

pub fn sample_books() -> Vec<CreateBook> {
    vec![
        sample(
            "To Kill a Mockingbird",
            "Harper Lee",
            "A powerful story of racial injustice and loss of innocence in the American South.",
            1960,
            "Fiction",
            4.5,
            true,
        ),
        sample(
            "1984",
            "George Orwell",
            "A dystopian novel about totalitarianism and surveillance society.",
            1949,
            "Science Fiction",
            4.3,
            false,
        ),
        sample(
            "The Great Gatsby",
            "F. Scott Fitzgerald",
            "A story of the Jazz Age and the American Dream.",
            1925,
            "Fiction",
            4.2,
            true,
        ),
        sample(
            "Pride and Prejudice",
            "Jane Austen",
            "A classic romance novel about love and marriage in Georgian-era England.",
            1813,
            "Romance",
            4.4,
            false,
        ),
        sample(
            "The Hobbit",
            "J.R.R. Tolkien",
            "A fantasy novel about a hobbit's journey with dwarves to reclaim their homeland.",
            1937,
            "Fantasy",
            4.6,
            true,
        ),
    ]
}

/// Insert the sample catalog through the regular validation path.
pub async fn seed_catalog(repository: &dyn BookRepository, reset: bool) -> anyhow::Result<Vec<Book>> {
    if reset {
        let removed = repository
            .clear()
            .await
            .context("failed to clear existing books")?;
        tracing::info!(removed, "cleared existing books");
    }

    let mut inserted = Vec::new();
    for candidate in sample_books() {
        let new_book = candidate.validate().context("sample book is invalid")?;
        let book = repository
            .insert(new_book)
            .await
            .context("failed to insert sample book")?;
        tracing::info!(title = %book.title, author = %book.author, "seeded book");
        inserted.push(book);
    }

    tracing::info!(count = inserted.len(), "sample catalog seeded");
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::books::repository::InMemoryBookRepository;

    #[test]
    fn sample_books_are_valid() {
        for book in sample_books() {
            assert!(book.validate().is_ok());
        }
    }

    #[tokio::test]
    async fn reset_replaces_existing_catalog() {
        let repository = InMemoryBookRepository::new();

        seed_catalog(&repository, false).await.unwrap();
        seed_catalog(&repository, false).await.unwrap();
        assert_eq!(repository.list().await.unwrap().len(), 10);

        let inserted = seed_catalog(&repository, true).await.unwrap();
        assert_eq!(inserted.len(), 5);
        assert_eq!(repository.list().await.unwrap().len(), 5);
    }
}
