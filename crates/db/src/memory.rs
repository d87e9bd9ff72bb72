//! In-process book store, used for local runs and tests.

use async_trait::async_trait;
use bookshelf_authz::CurrentUser;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{Book, BookId, NewBook, NewReview, Review, ReviewId};
use crate::repository::{BookRepository, RepositoryError};

#[derive(Debug, Default)]
pub struct MemoryBookRepository {
    books: RwLock<Vec<Book>>,
}

impl MemoryBookRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id() -> String {
        Uuid::now_v7().to_string()
    }
}

#[async_trait]
impl BookRepository for MemoryBookRepository {
    async fn list(&self) -> Result<Vec<Book>, RepositoryError> {
        Ok(self.books.read().await.clone())
    }

    async fn create(&self, book: NewBook, user: &CurrentUser) -> Result<BookId, RepositoryError> {
        let id = Self::next_id();
        let record = Book {
            id: id.clone(),
            title: book.title,
            author: book.author,
            description: book.description,
            genre: book.genre,
            publication_year: book.publication_year,
            created_by: user.id.clone(),
            reviews: Vec::new(),
        };

        self.books.write().await.push(record);
        tracing::debug!(target: "bookshelf-db", book_id = %id, user_id = %user.id, "book stored");

        Ok(id)
    }

    async fn one(&self, id: &str) -> Result<Book, RepositoryError> {
        self.books
            .read()
            .await
            .iter()
            .find(|book| book.id == id)
            .cloned()
            .ok_or_else(|| RepositoryError::book_not_found(id))
    }

    async fn save_review(
        &self,
        review: NewReview,
        user: &CurrentUser,
        book_id: &str,
    ) -> Result<ReviewId, RepositoryError> {
        let mut books = self.books.write().await;
        let book = books
            .iter_mut()
            .find(|book| book.id == book_id)
            .ok_or_else(|| RepositoryError::book_not_found(book_id))?;

        let id = Self::next_id();
        book.reviews.push(Review {
            id: id.clone(),
            book_id: book.id.clone(),
            review: review.review,
            user_id: user.id.clone(),
            username: user.username.clone(),
        });
        tracing::debug!(target: "bookshelf-db", %book_id, review_id = %id, "review stored");

        Ok(id)
    }
}
