use async_trait::async_trait;
use bookshelf_authz::CurrentUser;
use thiserror::Error;

use crate::models::{Book, BookId, NewBook, NewReview, ReviewId};

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("{entity} '{id}' not found")]
    NotFound { entity: &'static str, id: String },

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

impl RepositoryError {
    pub fn book_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: "book",
            id: id.into(),
        }
    }
}

/// Storage operations the books API depends on.
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Every stored book, in creation order.
    async fn list(&self) -> Result<Vec<Book>, RepositoryError>;

    /// Persist a new book owned by `user` and return its identifier.
    async fn create(&self, book: NewBook, user: &CurrentUser) -> Result<BookId, RepositoryError>;

    /// Fetch a book together with its reviews.
    async fn one(&self, id: &str) -> Result<Book, RepositoryError>;

    /// Attach a review by `user` to the book `book_id`.
    async fn save_review(
        &self,
        review: NewReview,
        user: &CurrentUser,
        book_id: &str,
    ) -> Result<ReviewId, RepositoryError>;
}
