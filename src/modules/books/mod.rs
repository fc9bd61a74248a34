pub mod models;
pub mod repository;
pub mod routes;

use anyhow::Context;
use async_trait::async_trait;
use axum::Router;
use serde_json::json;
use shelf_kernel::{InitCtx, Module};

use crate::utils::{envelope_schema, error_response, json_response, path_param};
use repository::SharedBookRepository;

/// Books module: CRUD over the catalog plus a storage readiness probe
pub struct BooksModule {
    repository: SharedBookRepository,
}

impl BooksModule {
    pub fn new(repository: SharedBookRepository) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            storage = self.repository.backend(),
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Option<Router> {
        Some(routes::router(self.repository.clone()))
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let book_ref = json!({ "$ref": "#/components/schemas/Book" });
        let id_param = path_param("id", "Book identifier (24 hex characters)");

        Some(json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "List books, newest first",
                        "tags": ["Books"],
                        "responses": {
                            "200": crate::utils::book_list_response("List of books"),
                            "500": error_response("Storage failure")
                        }
                    },
                    "post": {
                        "summary": "Create a book",
                        "tags": ["Books"],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/CreateBook" }
                                }
                            }
                        },
                        "responses": {
                            "201": json_response("Book created", envelope_schema(book_ref.clone())),
                            "400": error_response("Missing or invalid fields"),
                            "500": error_response("Storage failure")
                        }
                    }
                },
                "/health": {
                    "get": {
                        "summary": "Book storage readiness",
                        "tags": ["Books"],
                        "responses": {
                            "200": json_response("Storage reachable", envelope_schema(json!({ "type": "object" }))),
                            "500": error_response("Storage unreachable")
                        }
                    }
                },
                "/{id}": {
                    "parameters": [id_param],
                    "get": {
                        "summary": "Get a book",
                        "tags": ["Books"],
                        "responses": {
                            "200": json_response("The book", envelope_schema(book_ref.clone())),
                            "404": error_response("Book not found"),
                            "500": error_response("Storage failure")
                        }
                    },
                    "put": {
                        "summary": "Update supplied fields of a book",
                        "tags": ["Books"],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/UpdateBook" }
                                }
                            }
                        },
                        "responses": {
                            "200": json_response("Updated book", envelope_schema(book_ref)),
                            "400": error_response("Invalid fields"),
                            "404": error_response("Book not found")
                        }
                    },
                    "delete": {
                        "summary": "Delete a book",
                        "tags": ["Books"],
                        "responses": {
                            "200": json_response("Deletion confirmed", json!({
                                "type": "object",
                                "properties": {
                                    "success": { "type": "boolean" },
                                    "message": { "type": "string" }
                                },
                                "required": ["success", "message"]
                            })),
                            "404": error_response("Book not found"),
                            "500": error_response("Storage failure")
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Book": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "string", "description": "Storage-assigned identifier" },
                            "title": { "type": "string" },
                            "author": { "type": "string" },
                            "publishedYear": { "type": ["integer", "null"] },
                            "description": { "type": "string" },
                            "genre": { "type": "string" },
                            "rating": { "type": "number", "minimum": 0, "maximum": 5 },
                            "isRead": { "type": "boolean" },
                            "image": { "type": "string", "description": "URL or encoded image data" },
                            "createdAt": { "type": "string", "format": "date-time" }
                        },
                        "required": [
                            "id", "title", "author", "publishedYear", "description",
                            "genre", "rating", "isRead", "image", "createdAt"
                        ]
                    },
                    "CreateBook": {
                        "type": "object",
                        "properties": book_input_properties(),
                        "required": ["title", "author"]
                    },
                    "UpdateBook": {
                        "type": "object",
                        "properties": book_input_properties()
                    }
                }
            }
        }))
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        self.repository
            .ensure_indexes()
            .await
            .context("failed to ensure book indexes")?;
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

fn book_input_properties() -> serde_json::Value {
    json!({
        "title": { "type": "string" },
        "author": { "type": "string" },
        "publishedYear": { "type": "integer" },
        "description": { "type": "string" },
        "genre": { "type": "string", "default": models::DEFAULT_GENRE },
        "rating": { "type": "number", "minimum": 0, "maximum": 5, "default": 0 },
        "isRead": { "type": "boolean", "default": false },
        "image": { "type": "string" }
    })
}

/// Create a new instance of the books module
pub fn create_module(repository: SharedBookRepository) -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(BooksModule::new(repository))
}
