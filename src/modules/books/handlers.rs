//! HTTP handlers for the `/books` routes.

use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Path, State},
    http::{request::Parts, StatusCode},
    Json,
};
use catalog_http::{AppError, JsonBody};
use mongodb::bson::oid::ObjectId;
use utoipa::OpenApi;

use super::models::{Book, BookInput, CreatedResponse, MessageResponse};
use super::store::BookStore;

/// Shared handler state: the store handle built once at startup.
#[derive(Clone)]
pub struct BooksState {
    store: Arc<dyn BookStore>,
}

impl BooksState {
    pub fn new(store: Arc<dyn BookStore>) -> Self {
        Self { store }
    }
}

/// Book identity bound from the path after `/books/`.
///
/// Rejects anything that is not a 24-character hex identity with
/// `400 invalid id`, before the body is read or the store is touched. A
/// missing segment (`/books/`) or extra segments (`/books/a/b`) are invalid ids.
#[derive(Debug, Clone, Copy)]
pub struct BookId(pub ObjectId);

impl<S> FromRequestParts<S> for BookId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::invalid_id())?;

        ObjectId::parse_str(&raw)
            .map(BookId)
            .map_err(|_| AppError::invalid_id())
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(list_books, create_book, update_book, delete_book),
    components(schemas(Book, BookInput, CreatedResponse, MessageResponse)),
    tags((name = "Books", description = "Book catalog CRUD"))
)]
pub struct BooksApi;

/// List every book
#[utoipa::path(
    get,
    path = "/books",
    tag = "Books",
    responses(
        (status = 200, description = "All books", body = [Book]),
        (status = 500, description = "Store failure")
    )
)]
pub async fn list_books(State(state): State<BooksState>) -> Result<Json<Vec<Book>>, AppError> {
    let books = state.store.list().await.map_err(AppError::internal)?;
    Ok(Json(books))
}

/// Create a book; the store assigns its identity
#[utoipa::path(
    post,
    path = "/books",
    tag = "Books",
    request_body = BookInput,
    responses(
        (status = 201, description = "Book created", body = CreatedResponse),
        (status = 400, description = "Malformed JSON body"),
        (status = 500, description = "Store failure")
    )
)]
pub async fn create_book(
    State(state): State<BooksState>,
    JsonBody(input): JsonBody<BookInput>,
) -> Result<(StatusCode, Json<CreatedResponse>), AppError> {
    let id = state.store.insert(input).await.map_err(AppError::internal)?;

    tracing::debug!(book_id = %id, "book created");

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            message: "created".to_string(),
            id: id.to_hex(),
        }),
    ))
}

/// Overwrite all fields of a book
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "Books",
    params(("id" = String, Path, description = "Book identity (24 hex characters)")),
    request_body = BookInput,
    responses(
        (status = 200, description = "Book updated", body = MessageResponse),
        (status = 400, description = "Invalid id or malformed JSON body"),
        (status = 404, description = "No book with this id"),
        (status = 500, description = "Store failure")
    )
)]
pub async fn update_book(
    State(state): State<BooksState>,
    BookId(id): BookId,
    JsonBody(input): JsonBody<BookInput>,
) -> Result<Json<MessageResponse>, AppError> {
    let matched = state
        .store
        .replace_fields(id, input)
        .await
        .map_err(AppError::internal)?;

    if !matched {
        return Err(AppError::not_found("not found"));
    }

    Ok(Json(MessageResponse {
        message: "updated".to_string(),
    }))
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "Books",
    params(("id" = String, Path, description = "Book identity (24 hex characters)")),
    responses(
        (status = 200, description = "Book deleted", body = MessageResponse),
        (status = 400, description = "Invalid id"),
        (status = 404, description = "No book with this id"),
        (status = 500, description = "Store failure")
    )
)]
pub async fn delete_book(
    State(state): State<BooksState>,
    BookId(id): BookId,
) -> Result<Json<MessageResponse>, AppError> {
    let deleted = state.store.delete(id).await.map_err(AppError::internal)?;

    if !deleted {
        return Err(AppError::not_found("not found"));
    }

    Ok(Json(MessageResponse {
        message: "deleted".to_string(),
    }))
}
