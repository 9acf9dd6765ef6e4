pub mod models;
pub mod routes;
pub mod search;

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use serde_json::json;
use shelf_kernel::{settings::Settings, InitCtx, Module};
use shelf_store::JsonFileStore;

use models::Book;
use routes::BooksState;
use search::SearchEngine;

/// Books module: CRUD and search over the JSON data file
pub struct BooksModule {
    state: BooksState,
}

impl BooksModule {
    pub fn new(settings: &Settings) -> anyhow::Result<Self> {
        let state = BooksState {
            store: Arc::new(JsonFileStore::new(&settings.storage.data_file)),
            search: Arc::new(SearchEngine::new(&settings.search)?),
            policy: settings.books.validation,
        };
        Ok(Self { state })
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        let path = self.state.store.path().display().to_string();

        // An unreadable file is reported per request as a storage error, so it
        // does not stop startup.
        match self.state.store.load().await {
            Ok(books) => {
                let duplicates = duplicate_ids(&books);
                if !duplicates.is_empty() {
                    tracing::warn!(
                        module = self.name(),
                        ?duplicates,
                        "data file holds duplicate book ids"
                    );
                }
                tracing::info!(
                    module = self.name(),
                    environment = ?ctx.settings.environment,
                    data_file = %path,
                    books = books.len(),
                    policy = ?self.state.policy,
                    search_workers = self.state.search.workers(),
                    "books module initialized"
                );
            }
            Err(e) => {
                tracing::warn!(
                    module = self.name(),
                    data_file = %path,
                    error = %e,
                    "data file is not readable"
                );
            }
        }
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.state.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
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
        let book_body = json!({
            "required": true,
            "content": {
                "application/json": { "schema": { "$ref": "#/components/schemas/Book" } }
            }
        });
        let book_response = |description: &str| {
            json!({
                "description": description,
                "content": {
                    "application/json": { "schema": { "$ref": "#/components/schemas/Book" } }
                }
            })
        };
        let id_param = json!({
            "name": "id",
            "in": "path",
            "required": true,
            "schema": { "type": "string" }
        });
        let update = json!({
            "summary": "Replace a book",
            "tags": ["Books"],
            "parameters": [id_param.clone()],
            "requestBody": book_body.clone(),
            "responses": {
                "200": book_response("Updated book"),
                "400": error("Malformed body or missing required fields"),
                "404": error("Book not found"),
                "500": error("Storage failure")
            }
        });

        Some(json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "List books, or search them when `q` is given",
                        "tags": ["Books"],
                        "parameters": [
                            { "name": "limit", "in": "query", "required": false, "schema": { "type": "integer", "default": 10 } },
                            { "name": "offset", "in": "query", "required": false, "schema": { "type": "integer", "default": 0 } },
                            { "name": "q", "in": "query", "required": false, "schema": { "type": "string" } }
                        ],
                        "responses": {
                            "200": {
                                "description": "Page of books or search matches",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "array",
                                            "items": { "$ref": "#/components/schemas/Book" }
                                        }
                                    }
                                }
                            },
                            "400": error("Empty search query"),
                            "500": error("Storage failure")
                        }
                    },
                    "post": {
                        "summary": "Create a book",
                        "tags": ["Books"],
                        "requestBody": book_body,
                        "responses": {
                            "201": book_response("Created book"),
                            "400": error("Malformed body or missing required fields"),
                            "409": error("Book ID already exists"),
                            "500": error("Storage failure")
                        }
                    }
                },
                "/{id}": {
                    "get": {
                        "summary": "Get a book",
                        "tags": ["Books"],
                        "parameters": [id_param.clone()],
                        "responses": {
                            "200": book_response("The book"),
                            "404": error("Book not found"),
                            "500": error("Storage failure")
                        }
                    },
                    "post": update.clone(),
                    "put": update,
                    "delete": {
                        "summary": "Delete a book",
                        "tags": ["Books"],
                        "parameters": [id_param],
                        "responses": {
                            "204": { "description": "Deleted" },
                            "404": error("Book not found"),
                            "500": error("Storage failure")
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Book": {
                        "type": "object",
                        "properties": {
                            "book_id": { "type": "string", "description": "Unique identifier, supplied by the client" },
                            "author_id": { "type": "string" },
                            "publisher_id": { "type": "string" },
                            "title": { "type": "string" },
                            "publication_date": { "type": "string" },
                            "isbn": { "type": "string" },
                            "pages": { "type": "integer" },
                            "genre": { "type": "string" },
                            "price": { "type": "number" },
                            "quantity": { "type": "integer" },
                            "description": { "type": "string" }
                        },
                        "required": ["book_id"]
                    }
                }
            }
        }))
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

/// Identifiers that occur more than once, in order of their repeat
pub fn duplicate_ids(books: &[Book]) -> Vec<&str> {
    let mut seen = HashSet::new();
    books
        .iter()
        .map(|book| book.book_id.as_str())
        .filter(|id| !seen.insert(*id))
        .collect()
}

/// Create a new instance of the books module
pub fn create_module(settings: &Settings) -> anyhow::Result<Arc<dyn Module>> {
    Ok(Arc::new(BooksModule::new(settings)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_ids_lists_repeats_only() {
        let book = |id: &str| Book {
            book_id: id.to_string(),
            ..Book::default()
        };
        let books = vec![book("1"), book("2"), book("1"), book("3"), book("2")];

        assert_eq!(duplicate_ids(&books), vec!["1", "2"]);
        assert!(duplicate_ids(&books[..2]).is_empty());
    }

    #[test]
    fn openapi_fragment_is_a_valid_document_part() {
        let module = BooksModule::new(&Settings::default()).unwrap();
        let fragment = module.openapi().unwrap();

        assert!(fragment["paths"]["/{id}"]["delete"].is_object());
        assert_eq!(
            fragment["components"]["schemas"]["Book"]["required"][0],
            "book_id"
        );
    }
}
