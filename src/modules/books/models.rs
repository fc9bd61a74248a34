use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_GENRE: &str = "General";
pub const MIN_RATING: f64 = 0.0;
pub const MAX_RATING: f64 = 5.0;

/// A stored book record as exposed by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Storage-assigned identifier (24 hex characters)
    pub id: String,
    pub title: String,
    pub author: String,
    pub published_year: Option<i32>,
    pub description: String,
    pub genre: String,
    /// Always within [`MIN_RATING`, `MAX_RATING`]
    pub rating: f64,
    pub is_read: bool,
    /// Cover image as a URL or encoded image data
    pub image: String,
    pub created_at: DateTime<Utc>,
}

/// Request body for creating a book.
///
/// Every field is optional at the wire level so that missing required fields
/// surface as validation errors instead of deserialization failures.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBook {
    pub title: Option<String>,
    pub author: Option<String>,
    pub published_year: Option<i32>,
    pub description: Option<String>,
    pub genre: Option<String>,
    pub rating: Option<f64>,
    pub is_read: Option<bool>,
    pub image: Option<String>,
}

/// Request body for updating a book; absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBook {
    pub title: Option<String>,
    pub author: Option<String>,
    pub published_year: Option<i32>,
    pub description: Option<String>,
    pub genre: Option<String>,
    pub rating: Option<f64>,
    pub is_read: Option<bool>,
    pub image: Option<String>,
}

/// A validated, normalized book ready to be inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub published_year: Option<i32>,
    pub description: String,
    pub genre: String,
    pub rating: f64,
    pub is_read: bool,
    pub image: String,
}

/// A validated set of field changes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookChanges {
    pub title: Option<String>,
    pub author: Option<String>,
    pub published_year: Option<i32>,
    pub description: Option<String>,
    pub genre: Option<String>,
    pub rating: Option<f64>,
    pub is_read: Option<bool>,
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("invalid book fields: {}", self.field_names().join(", "))]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn field_names(&self) -> Vec<&'static str> {
        self.errors.iter().map(|e| e.field).collect()
    }

    /// Human readable summary used as the response message
    pub fn summary(&self) -> &'static str {
        let missing_required = self
            .errors
            .iter()
            .any(|e| matches!(e.field, "title" | "author"));
        if missing_required {
            "Title and author are required"
        } else {
            "Invalid book data"
        }
    }
}

#[derive(Default)]
struct Checker {
    errors: Vec<FieldError>,
}

impl Checker {
    fn fail(&mut self, field: &'static str, error: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            error: error.into(),
        });
    }

    /// Trimmed value of a required text field, recording an error when blank
    fn required_text(&mut self, field: &'static str, value: Option<String>) -> Option<String> {
        match value.as_deref().map(str::trim) {
            Some(text) if !text.is_empty() => Some(text.to_string()),
            Some(_) => {
                self.fail(field, "must not be empty");
                None
            }
            None => {
                self.fail(field, "required");
                None
            }
        }
    }

    fn rating(&mut self, value: f64) -> Option<f64> {
        if value.is_finite() && (MIN_RATING..=MAX_RATING).contains(&value) {
            Some(value)
        } else {
            self.fail(
                "rating",
                format!("out of range: must be between {MIN_RATING} and {MAX_RATING}"),
            );
            None
        }
    }

    fn finish<T>(self, value: T) -> Result<T, ValidationErrors> {
        if self.errors.is_empty() {
            Ok(value)
        } else {
            Err(ValidationErrors {
                errors: self.errors,
            })
        }
    }
}

fn trimmed(value: String) -> String {
    value.trim().to_string()
}

impl CreateBook {
    /// Normalize and validate into an insertable record, applying defaults.
    pub fn validate(self) -> Result<NewBook, ValidationErrors> {
        let mut checker = Checker::default();

        let title = checker.required_text("title", self.title);
        let author = checker.required_text("author", self.author);
        let rating = match self.rating {
            Some(value) => checker.rating(value),
            None => Some(MIN_RATING),
        };

        let (Some(title), Some(author), Some(rating)) = (title, author, rating) else {
            return Err(ValidationErrors {
                errors: checker.errors,
            });
        };

        checker.finish(NewBook {
            title,
            author,
            published_year: self.published_year,
            description: self.description.map(trimmed).unwrap_or_default(),
            genre: self
                .genre
                .map(trimmed)
                .unwrap_or_else(|| DEFAULT_GENRE.to_string()),
            rating,
            is_read: self.is_read.unwrap_or(false),
            image: self.image.unwrap_or_default(),
        })
    }
}

impl UpdateBook {
    /// Validate the supplied fields with the same rules as creation.
    ///
    /// A stored record already satisfies every invariant, so checking the
    /// supplied fields is equivalent to checking the merged record.
    pub fn validate(self) -> Result<BookChanges, ValidationErrors> {
        let mut checker = Checker::default();

        let title = self
            .title
            .and_then(|title| checker.required_text("title", Some(title)));
        let author = self
            .author
            .and_then(|author| checker.required_text("author", Some(author)));
        let rating = self.rating.and_then(|rating| checker.rating(rating));

        checker.finish(BookChanges {
            title,
            author,
            published_year: self.published_year,
            description: self.description.map(trimmed),
            genre: self.genre.map(trimmed),
            rating,
            is_read: self.is_read,
            image: self.image,
        })
    }
}

impl BookChanges {
    pub fn is_empty(&self) -> bool {
        *self == BookChanges::default()
    }

    /// Overwrite the fields of `book` that this change set supplies
    pub fn apply(&self, book: &mut Book) {
        if let Some(title) = &self.title {
            book.title = title.clone();
        }
        if let Some(author) = &self.author {
            book.author = author.clone();
        }
        if let Some(year) = self.published_year {
            book.published_year = Some(year);
        }
        if let Some(description) = &self.description {
            book.description = description.clone();
        }
        if let Some(genre) = &self.genre {
            book.genre = genre.clone();
        }
        if let Some(rating) = self.rating {
            book.rating = rating;
        }
        if let Some(is_read) = self.is_read {
            book.is_read = is_read;
        }
        if let Some(image) = &self.image {
            book.image = image.clone();
        }
    }
}

impl Book {
    /// Materialize a freshly inserted record
    pub fn from_new(id: String, book: NewBook, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            title: book.title,
            author: book.author,
            published_year: book.published_year,
            description: book.description,
            genre: book.genre,
            rating: book.rating,
            is_read: book.is_read,
            image: book.image,
            created_at,
        }
    }

    /// Case-insensitive substring match over title, author and description
    pub fn matches_text(&self, query: &str) -> bool {
        let needle = query.to_lowercase();
        [&self.title, &self.author, &self.description]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dune() -> CreateBook {
        CreateBook {
            title: Some("Dune".to_string()),
            author: Some("Frank Herbert".to_string()),
            ..CreateBook::default()
        }
    }

    #[test]
    fn create_applies_defaults() {
        let book = dune().validate().unwrap();

        assert_eq!(book.title, "Dune");
        assert_eq!(book.author, "Frank Herbert");
        assert_eq!(book.published_year, None);
        assert_eq!(book.description, "");
        assert_eq!(book.genre, DEFAULT_GENRE);
        assert_eq!(book.rating, 0.0);
        assert!(!book.is_read);
        assert_eq!(book.image, "");
    }

    #[test]
    fn create_trims_text_fields() {
        let book = CreateBook {
            title: Some("  Dune ".to_string()),
            author: Some("\tFrank Herbert\n".to_string()),
            description: Some("  Spice  ".to_string()),
            genre: Some(" Science Fiction ".to_string()),
            ..CreateBook::default()
        }
        .validate()
        .unwrap();

        assert_eq!(book.title, "Dune");
        assert_eq!(book.author, "Frank Herbert");
        assert_eq!(book.description, "Spice");
        assert_eq!(book.genre, "Science Fiction");
    }

    #[test]
    fn create_requires_title_and_author() {
        let err = CreateBook::default().validate().unwrap_err();
        assert_eq!(err.field_names(), vec!["title", "author"]);
        assert_eq!(err.summary(), "Title and author are required");

        let err = CreateBook {
            title: Some("   ".to_string()),
            ..dune()
        }
        .validate()
        .unwrap_err();
        assert_eq!(err.field_names(), vec!["title"]);
        assert_eq!(err.errors[0].error, "must not be empty");
    }

    #[test]
    fn rating_bounds_are_inclusive() {
        for rating in [0.0, 2.5, 5.0] {
            let book = CreateBook {
                rating: Some(rating),
                ..dune()
            }
            .validate()
            .unwrap();
            assert_eq!(book.rating, rating);
        }

        for rating in [-0.1, 5.1, f64::NAN, f64::INFINITY] {
            let err = CreateBook {
                rating: Some(rating),
                ..dune()
            }
            .validate()
            .unwrap_err();
            assert_eq!(err.field_names(), vec!["rating"]);
            assert_eq!(err.summary(), "Invalid book data");
        }
    }

    #[test]
    fn update_validates_only_supplied_fields() {
        let changes = UpdateBook {
            rating: Some(5.0),
            ..UpdateBook::default()
        }
        .validate()
        .unwrap();
        assert_eq!(changes.rating, Some(5.0));
        assert_eq!(changes.title, None);

        let err = UpdateBook {
            title: Some(" ".to_string()),
            rating: Some(-0.1),
            ..UpdateBook::default()
        }
        .validate()
        .unwrap_err();
        assert_eq!(err.field_names(), vec!["title", "rating"]);
    }

    #[test]
    fn empty_update_is_empty() {
        assert!(UpdateBook::default().validate().unwrap().is_empty());
    }

    #[test]
    fn changes_apply_over_existing_record() {
        let mut book = Book::from_new("1".repeat(24), dune().validate().unwrap(), Utc::now());
        let before = book.clone();

        UpdateBook {
            title: Some(" Dune Messiah ".to_string()),
            is_read: Some(true),
            ..UpdateBook::default()
        }
        .validate()
        .unwrap()
        .apply(&mut book);

        assert_eq!(book.title, "Dune Messiah");
        assert!(book.is_read);
        assert_eq!(book.author, before.author);
        assert_eq!(book.created_at, before.created_at);
        assert_eq!(book.id, before.id);
    }

    #[test]
    fn text_match_is_case_insensitive() {
        let mut book = Book::from_new("1".repeat(24), dune().validate().unwrap(), Utc::now());
        book.description = "Desert planet Arrakis".to_string();

        assert!(book.matches_text("dUnE"));
        assert!(book.matches_text("herbert"));
        assert!(book.matches_text("ARRAKIS"));
        assert!(!book.matches_text("tolkien"));
    }

    #[test]
    fn book_serializes_camel_case() {
        let book = Book::from_new("1".repeat(24), dune().validate().unwrap(), Utc::now());
        let value = serde_json::to_value(&book).unwrap();

        assert_eq!(value["genre"], "General");
        assert_eq!(value["isRead"], false);
        assert!(value["publishedYear"].is_null());
        assert!(value["createdAt"].is_string());
    }
}
