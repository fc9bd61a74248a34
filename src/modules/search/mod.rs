//! Free-text substring search across title, author and description.

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

pub struct SearchModule {
    repository: SharedBookRepository,
}

impl SearchModule {
    pub fn new(repository: SharedBookRepository) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl Module for SearchModule {
    fn name(&self) -> &'static str {
        "search"
    }

    async fn init(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "search module initialized");
        Ok(())
    }

    fn routes(&self) -> Option<Router> {
        Some(
            Router::new()
                .route("/{query}", get(search_books))
                .with_state(self.repository.clone()),
        )
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(json!({
            "paths": {
                "/{query}": {
                    "parameters": [path_param("query", "Case-insensitive substring")],
                    "get": {
                        "summary": "Search title, author and description",
                        "tags": ["Search"],
                        "responses": {
                            "200": book_list_response("Matching books, by title"),
                            "500": error_response("Storage failure")
                        }
                    }
                }
            }
        }))
    }
}

async fn search_books(
    State(repository): State<SharedBookRepository>,
    Path(query): Path<String>,
) -> Result<ApiResponse<Vec<Book>>, AppError> {
    let books = repository
        .search(&query)
        .await
        .context("Error searching books")?;

    tracing::debug!(%query, matches = books.len(), "book search");
    Ok(ApiResponse::list(books))
}

pub fn create_module(repository: SharedBookRepository) -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(SearchModule::new(repository))
}
