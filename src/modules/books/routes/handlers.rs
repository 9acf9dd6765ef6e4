use anyhow::Context;
use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::json;
use shelf_http::AppError;
use shelf_kernel::settings::ValidationPolicy;

use super::pagination::{paginate, ListParams};
use super::BooksState;
use crate::modules::books::models::Book;

/// `GET /books` lists a page of books, or searches when `q` is present.
pub async fn list_books(
    State(state): State<BooksState>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<Vec<Book>>, AppError> {
    let Query(pairs) = query?;
    let params = ListParams::from_pairs(pairs);

    if let Some(q) = params.q.as_deref() {
        return search_books(state, q).await.map(Json);
    }

    let books = state.store.load().await?;
    let total = books.len();
    let page = paginate(books, params.limit(), params.offset());

    tracing::debug!(total, returned = page.len(), "listed books");
    Ok(Json(page))
}

// Blank queries are rejected, but a non-blank one is matched verbatim,
// surrounding spaces included.
async fn search_books(state: BooksState, query: &str) -> Result<Vec<Book>, AppError> {
    if query.trim().is_empty() {
        return Err(AppError::bad_request("Missing search query"));
    }

    let books = state.store.load().await?;
    let scanned = books.len();

    let engine = state.search.clone();
    let needle = query.to_string();
    let found = tokio::task::spawn_blocking(move || engine.search(books, &needle))
        .await
        .context("search workers did not complete")?;

    tracing::debug!(%query, scanned, matches = found.len(), "searched books");
    Ok(found)
}

/// `POST /books` adds a book with a client-supplied, unused `book_id`.
pub async fn create_book(
    State(state): State<BooksState>,
    body: Bytes,
) -> Result<(StatusCode, Json<Book>), AppError> {
    let book = decode_book(&body)?;
    validate(&book, state.policy)?;

    let created = state
        .store
        .transaction(move |books| {
            if books.iter().any(|existing| existing.book_id == book.book_id) {
                return Err(AppError::conflict(
                    vec![json!({ "book_id": book.book_id })],
                    "Book ID already exists",
                ));
            }
            books.push(book.clone());
            Ok(book)
        })
        .await?;

    tracing::info!(book_id = %created.book_id, "book created");
    Ok((StatusCode::CREATED, Json(created)))
}

/// `GET /books/{id}`
pub async fn get_book(
    State(state): State<BooksState>,
    Path(id): Path<String>,
) -> Result<Json<Book>, AppError> {
    state
        .store
        .load()
        .await?
        .into_iter()
        .find(|book| book.book_id == id)
        .map(Json)
        .ok_or_else(|| AppError::not_found("Book not found"))
}

/// `POST|PUT /books/{id}` replaces every field; the identifier comes from the path.
pub async fn update_book(
    State(state): State<BooksState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<Book>, AppError> {
    let mut book = decode_book(&body)?;
    book.book_id = id;
    validate(&book, state.policy)?;

    let updated = state
        .store
        .transaction(move |books| {
            let slot = books
                .iter_mut()
                .find(|existing| existing.book_id == book.book_id)
                .ok_or_else(|| AppError::not_found("Book not found"))?;
            *slot = book.clone();
            Ok::<_, AppError>(book)
        })
        .await?;

    tracing::info!(book_id = %updated.book_id, "book updated");
    Ok(Json(updated))
}

/// `DELETE /books/{id}`
pub async fn delete_book(
    State(state): State<BooksState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state
        .store
        .transaction(|books| {
            let before = books.len();
            books.retain(|book| book.book_id != id);
            if books.len() == before {
                return Err(AppError::not_found("Book not found"));
            }
            Ok(())
        })
        .await?;

    tracing::info!(book_id = %id, "book deleted");
    Ok(StatusCode::NO_CONTENT)
}

// The body is JSON whatever the request's Content-Type says.
fn decode_book(body: &[u8]) -> Result<Book, AppError> {
    serde_json::from_slice(body)
        .map_err(|e| AppError::bad_request(format!("invalid request payload: {e}")))
}

fn validate(book: &Book, policy: ValidationPolicy) -> Result<(), AppError> {
    let missing = book.missing_fields(policy);
    if missing.is_empty() {
        return Ok(());
    }

    let details = missing
        .into_iter()
        .map(|field| json!({ "field": field, "error": "required" }))
        .collect();
    Err(AppError::validation(details, "Missing required fields"))
}
