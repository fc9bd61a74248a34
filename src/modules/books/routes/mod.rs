//! CRUD handlers for `/api/books`.

use anyhow::Context;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use shelf_http::{ApiResponse, AppError};

use super::{
    models::{Book, CreateBook, UpdateBook, ValidationErrors},
    repository::SharedBookRepository,
};

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let details = errors
            .errors
            .iter()
            .map(|e| json!({ "field": e.field, "error": e.error }))
            .collect();
        AppError::validation(details, errors.summary())
    }
}

fn book_not_found() -> AppError {
    AppError::not_found("Book not found")
}

pub fn router(repository: SharedBookRepository) -> Router {
    Router::new()
        .route("/", get(list_books).post(create_book))
        .route("/health", get(health_check))
        .route("/{id}", get(get_book).put(update_book).delete(delete_book))
        .with_state(repository)
}

/// Readiness: the repository answers a ping
async fn health_check(
    State(repository): State<SharedBookRepository>,
) -> Result<ApiResponse<Value>, AppError> {
    repository
        .ping()
        .await
        .context("Book storage is unreachable")?;

    Ok(ApiResponse::ok(json!({
        "status": "healthy",
        "storage": repository.backend()
    })))
}

async fn list_books(
    State(repository): State<SharedBookRepository>,
) -> Result<ApiResponse<Vec<Book>>, AppError> {
    let books = repository.list().await.context("Error fetching books")?;
    Ok(ApiResponse::list(books))
}

async fn create_book(
    State(repository): State<SharedBookRepository>,
    payload: Result<Json<CreateBook>, JsonRejection>,
) -> Result<ApiResponse<Book>, AppError> {
    let Json(payload) = payload?;
    let new_book = payload.validate()?;

    let book = repository
        .insert(new_book)
        .await
        .context("Error creating book")?;

    tracing::info!(book_id = %book.id, title = %book.title, "book created");
    Ok(ApiResponse::created(book).with_message("Book created successfully"))
}

async fn get_book(
    State(repository): State<SharedBookRepository>,
    Path(id): Path<String>,
) -> Result<ApiResponse<Book>, AppError> {
    repository
        .get(&id)
        .await
        .context("Error fetching book")?
        .map(ApiResponse::ok)
        .ok_or_else(book_not_found)
}

async fn update_book(
    State(repository): State<SharedBookRepository>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateBook>, JsonRejection>,
) -> Result<ApiResponse<Book>, AppError> {
    let Json(payload) = payload?;
    let changes = payload.validate()?;

    let book = repository
        .update(&id, changes)
        .await
        .context("Error updating book")?
        .ok_or_else(book_not_found)?;

    tracing::info!(book_id = %book.id, "book updated");
    Ok(ApiResponse::ok(book).with_message("Book updated successfully"))
}

async fn delete_book(
    State(repository): State<SharedBookRepository>,
    Path(id): Path<String>,
) -> Result<ApiResponse<()>, AppError> {
    let deleted = repository
        .delete(&id)
        .await
        .context("Error deleting book")?;

    if !deleted {
        return Err(book_not_found());
    }

    tracing::info!(book_id = %id, "book deleted");
    Ok(ApiResponse::message("Book deleted successfully"))
}
