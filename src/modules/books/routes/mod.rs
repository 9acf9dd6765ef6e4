use std::sync::Arc;

use axum::{routing::get, Router};
use shelf_kernel::settings::ValidationPolicy;
use shelf_store::JsonFileStore;

use super::models::Book;
use super::search::SearchEngine;

pub mod handlers;
pub mod pagination;

/// Shared state handed to every books handler
#[derive(Clone)]
pub struct BooksState {
    pub store: Arc<JsonFileStore<Book>>,
    pub search: Arc<SearchEngine>,
    pub policy: ValidationPolicy,
}

/// Routes for the books module, relative to its mount point
pub fn router(state: BooksState) -> Router {
    Router::new()
        .route("/", get(handlers::list_books).post(handlers::create_book))
        .route(
            "/{id}",
            get(handlers::get_book)
                .post(handlers::update_book)
                .put(handlers::update_book)
                .delete(handlers::delete_book),
        )
        .with_state(state)
}
