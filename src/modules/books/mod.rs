pub mod models;
pub mod routes;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use bookshelf_authz::Authenticator;
use bookshelf_kernel::{InitCtx, Module};
use serde_json::json;

use routes::BooksState;

/// Books catalog: books, genres, and reviews
pub struct BooksModule {
    state: BooksState,
    authenticator: Arc<dyn Authenticator>,
}

impl BooksModule {
    pub fn new(state: BooksState, authenticator: Arc<dyn Authenticator>) -> Self {
        Self {
            state,
            authenticator,
        }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        if self.state.genres.is_empty() {
            anyhow::bail!("books module needs at least one genre");
        }

        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            genres = self.state.genres.len(),
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.state.clone(), Arc::clone(&self.authenticator))
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let secured = json!([{ "bearer": [] }]);
        let error = |description: &str| {
            json!({
                "description": description,
                "content": {
                    "application/json": {
                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                    }
                }
            })
        };
        let id_param = json!([{
            "name": "id",
            "in": "path",
            "required": true,
            "schema": { "type": "string" }
        }]);

        Some(json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "List books",
                        "tags": ["Books"],
                        "security": secured,
                        "responses": {
                            "200": {
                                "description": "All books",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "array",
                                            "items": { "$ref": "#/components/schemas/Book" }
                                        }
                                    }
                                }
                            },
                            "401": error("Missing or invalid bearer token")
                        }
                    },
                    "post": {
                        "summary": "Create a book",
                        "tags": ["Books"],
                        "security": secured,
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/CreateBook" }
                                }
                            }
                        },
                        "responses": {
                            "200": {
                                "description": "Identifier of the new book",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "object",
                                            "properties": { "id": { "type": "string" } },
                                            "required": ["id"]
                                        }
                                    }
                                }
                            },
                            "400": error("Malformed JSON body"),
                            "401": error("Missing or invalid bearer token"),
                            "422": error("One or more fields failed validation")
                        }
                    }
                },
                "/genres": {
                    "get": {
                        "summary": "List accepted genres",
                        "tags": ["Books"],
                        "security": secured,
                        "responses": {
                            "200": {
                                "description": "Genre names",
                                "content": {
                                    "application/json": {
                                        "schema": { "type": "array", "items": { "type": "string" } }
                                    }
                                }
                            },
                            "401": error("Missing or invalid bearer token")
                        }
                    }
                },
                "/{id}": {
                    "get": {
                        "summary": "Get a book",
                        "tags": ["Books"],
                        "security": secured,
                        "parameters": id_param,
                        "responses": {
                            "200": {
                                "description": "The book with its reviews",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/Book" }
                                    }
                                }
                            },
                            "401": error("Missing or invalid bearer token"),
                            "404": error("Book not found")
                        }
                    }
                },
                "/{id}/reviews": {
                    "get": {
                        "summary": "List reviews of a book",
                        "tags": ["Reviews"],
                        "security": secured,
                        "parameters": id_param,
                        "responses": {
                            "200": {
                                "description": "Reviews of the book",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "array",
                                            "items": { "$ref": "#/components/schemas/Review" }
                                        }
                                    }
                                }
                            },
                            "401": error("Missing or invalid bearer token"),
                            "404": error("Book not found")
                        }
                    },
                    "post": {
                        "summary": "Review a book",
                        "tags": ["Reviews"],
                        "security": secured,
                        "parameters": id_param,
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/CreateReview" }
                                }
                            }
                        },
                        "responses": {
                            "200": {
                                "description": "Identifier of the new review",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "object",
                                            "properties": { "reviewId": { "type": "string" } },
                                            "required": ["reviewId"]
                                        }
                                    }
                                }
                            },
                            "400": error("Malformed JSON body"),
                            "401": error("Missing or invalid bearer token"),
                            "404": error("Book not found"),
                            "422": error("Review text is missing")
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Book": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "string" },
                            "title": { "type": "string" },
                            "author": { "type": "string" },
                            "description": { "type": "string" },
                            "genre": { "type": "string", "enum": self.state.genres },
                            "publicationYear": { "type": ["integer", "string"] },
                            "createdBy": { "type": "string" },
                            "reviews": {
                                "type": "array",
                                "items": { "$ref": "#/components/schemas/Review" }
                            }
                        },
                        "required": ["id", "title", "author", "description", "genre", "publicationYear", "createdBy", "reviews"]
                    },
                    "CreateBook": {
                        "type": "object",
                        "properties": {
                            "title": { "type": "string", "minLength": 1 },
                            "author": { "type": "string", "minLength": 1 },
                            "description": { "type": "string", "minLength": 1 },
                            "genre": { "type": "string", "enum": self.state.genres },
                            "publicationYear": { "type": ["integer", "string"] }
                        },
                        "required": ["title", "author", "description", "genre", "publicationYear"]
                    },
                    "Review": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "string" },
                            "bookId": { "type": "string" },
                            "review": { "type": "string" },
                            "userId": { "type": "string" },
                            "username": { "type": "string" }
                        },
                        "required": ["id", "bookId", "review", "userId", "username"]
                    },
                    "CreateReview": {
                        "type": "object",
                        "properties": {
                            "review": { "type": "string", "minLength": 1 }
                        },
                        "required": ["review"]
                    }
                }
            }
        }))
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

/// Create a new instance of the books module
pub fn create_module(state: BooksState, authenticator: Arc<dyn Authenticator>) -> Arc<dyn Module> {
    Arc::new(BooksModule::new(state, authenticator))
}
