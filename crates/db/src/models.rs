use serde::{Deserialize, Serialize};

/// Opaque identifier assigned to a book by the storage backend.
pub type BookId = String;

/// Opaque identifier assigned to a review by the storage backend.
pub type ReviewId = String;

/// Publication year as submitted by clients: either a number or free text
/// such as `"c. 1600"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PublicationYear {
    Year(i64),
    Text(String),
}

impl PublicationYear {
    pub fn is_blank(&self) -> bool {
        matches!(self, PublicationYear::Text(text) if text.is_empty())
    }
}

/// Stored book, including the reviews attached to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub description: String,
    pub genre: String,
    pub publication_year: PublicationYear,
    pub created_by: String,
    #[serde(default)]
    pub reviews: Vec<Review>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: ReviewId,
    pub book_id: BookId,
    pub review: String,
    pub user_id: String,
    pub username: String,
}

/// Validated input for creating a book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub description: String,
    pub genre: String,
    pub publication_year: PublicationYear,
}

/// Validated input for reviewing a book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewReview {
    pub review: String,
}
