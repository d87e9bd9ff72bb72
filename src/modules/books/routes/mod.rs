//! HTTP handlers for the books API. Every route sits behind the bearer-token gate.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    middleware,
    routing::get,
    Extension, Json, Router,
};
use bookshelf_authz::{Authenticator, CurrentUser};
use bookshelf_db::{Book, BookRepository, GenreSet, Review};
use bookshelf_http::{auth::require_auth, AppError, JsonObject};

use super::models::{CreateBookRequest, CreateReviewRequest, CreatedBook, CreatedReview};

/// Collaborators shared by the books handlers.
#[derive(Clone)]
pub struct BooksState {
    pub repository: Arc<dyn BookRepository>,
    pub genres: GenreSet,
}

/// Build the books router; mounted by the HTTP layer under `/api/books`.
pub fn router(state: BooksState, authenticator: Arc<dyn Authenticator>) -> Router {
    Router::new()
        .route("/", get(list_books).post(create_book))
        .route("/genres", get(list_genres))
        .route("/{id}", get(get_book))
        .route("/{id}/reviews", get(list_reviews).post(create_review))
        .route_layer(middleware::from_fn_with_state(authenticator, require_auth))
        .with_state(state)
}

async fn list_books(State(state): State<BooksState>) -> Result<Json<Vec<Book>>, AppError> {
    let books = state.repository.list().await?;
    Ok(Json(books))
}

async fn create_book(
    State(state): State<BooksState>,
    Extension(user): Extension<CurrentUser>,
    body: JsonObject,
) -> Result<Json<CreatedBook>, AppError> {
    let book = CreateBookRequest::from_body(&body)
        .into_new_book(&state.genres)
        .map_err(AppError::invalid_fields)?;

    let id = state.repository.create(book, &user).await?;
    tracing::info!(book_id = %id, user_id = %user.id, "book created");

    Ok(Json(CreatedBook { id }))
}

async fn list_genres(State(state): State<BooksState>) -> Json<GenreSet> {
    Json(state.genres)
}

async fn get_book(
    State(state): State<BooksState>,
    Path(id): Path<String>,
) -> Result<Json<Book>, AppError> {
    let book = state.repository.one(&id).await?;
    Ok(Json(book))
}

async fn create_review(
    State(state): State<BooksState>,
    Extension(user): Extension<CurrentUser>,
    Path(book_id): Path<String>,
    body: JsonObject,
) -> Result<Json<CreatedReview>, AppError> {
    let review = CreateReviewRequest::from_body(&body)
        .into_new_review()
        .map_err(AppError::invalid_fields)?;

    let review_id = state.repository.save_review(review, &user, &book_id).await?;
    tracing::info!(%book_id, %review_id, user_id = %user.id, "review saved");

    Ok(Json(CreatedReview { review_id }))
}

async fn list_reviews(
    State(state): State<BooksState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Review>>, AppError> {
    let book = state.repository.one(&id).await?;
    Ok(Json(book.reviews))
}
