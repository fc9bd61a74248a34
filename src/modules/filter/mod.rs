//! Read-only views of the catalog filtered by genre or read status.

use anyhow::Context;
use async_trait::async_trait;
use axum::{
    extract::{Path, State},
    routing::get,
    Router,
};
use serde_json::json;
use shelf_http::{ApiResponse, AppError};
use shelf_kernel::{InitCtx, Module};

use super::books::{models::Book, repository::SharedBookRepository};
use crate::utils::{book_list_response, error_response, path_param};

/// Status token selecting read books; anything else selects unread ones
const READ_STATUS: &str = "read";

pub struct FilterModule {
    repository: SharedBookRepository,
}

impl FilterModule {
    pub fn new(repository: SharedBookRepository) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl Module for FilterModule {
    fn name(&self) -> &'static str {
        "filter"
    }

    async fn init(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "filter module initialized");
        Ok(())
    }

    fn routes(&self) -> Option<Router> {
        Some(
            Router::new()
                .route("/genre/{genre}", get(books_by_genre))
                .route("/status/{status}", get(books_by_status))
                .with_state(self.repository.clone()),
        )
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(json!({
            "paths": {
                "/genre/{genre}": {
                    "parameters": [path_param("genre", "Exact, case-sensitive genre")],
                    "get": {
                        "summary": "Books of a genre, by title",
                        "tags": ["Filters"],
                        "responses": {
                            "200": book_list_response("Matching books"),
                            "500": error_response("Storage failure")
                        }
                    }
                },
                "/status/{status}": {
                    "parameters": [path_param("status", "`read` for read books, anything else for unread")],
                    "get": {
                        "summary": "Books by read status, by title",
                        "tags": ["Filters"],
                        "responses": {
                            "200": book_list_response("Matching books"),
                            "500": error_response("Storage failure")
                        }
                    }
                }
            }
        }))
    }
}

fn is_read_status(token: &str) -> bool {
    token == READ_STATUS
}

async fn books_by_genre(
    State(repository): State<SharedBookRepository>,
    Path(genre): Path<String>,
) -> Result<ApiResponse<Vec<Book>>, AppError> {
    let books = repository
        .find_by_genre(&genre)
        .await
        .context("Error fetching books by genre")?;
    Ok(ApiResponse::list(books))
}

async fn books_by_status(
    State(repository): State<SharedBookRepository>,
    Path(status): Path<String>,
) -> Result<ApiResponse<Vec<Book>>, AppError> {
    let books = repository
        .find_by_read_status(is_read_status(&status))
        .await
        .context("Error fetching books by status")?;
    Ok(ApiResponse::list(books))
}

pub fn create_module(repository: SharedBookRepository) -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(FilterModule::new(repository))
}
