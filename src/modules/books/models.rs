//! Request and response payloads for the books API.

use bookshelf_db::{BookId, GenreSet, NewBook, NewReview, PublicationYear, ReviewId};
use bookshelf_http::{FieldError, JsonObject};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::{Validate, ValidationErrors};

/// Message reported for any field that fails a rule.
pub const INVALID_VALUE: &str = "Invalid value";

/// Body of `POST /books`. Fields are optional here so that every missing
/// field is reported instead of failing on the first one. Scalars of any
/// JSON type are read as text.
#[derive(Debug, Clone, Default, Validate)]
pub struct CreateBookRequest {
    #[validate(required, length(min = 1))]
    pub title: Option<String>,
    #[validate(required, length(min = 1))]
    pub author: Option<String>,
    #[validate(required, length(min = 1))]
    pub description: Option<String>,
    #[validate(required, length(min = 1))]
    pub genre: Option<String>,
    pub publication_year: Option<PublicationYear>,
}

impl CreateBookRequest {
    const FIELD_ORDER: &'static [&'static str] =
        &["title", "author", "description", "genre", "publicationYear"];

    pub fn from_body(body: &JsonObject) -> Self {
        let publication_year = match body.get("publicationYear") {
            Some(Value::Number(number)) if number.is_i64() => {
                number.as_i64().map(PublicationYear::Year)
            }
            _ => body.text("publicationYear").map(PublicationYear::Text),
        };

        Self {
            title: body.text("title"),
            author: body.text("author"),
            description: body.text("description"),
            genre: body.text("genre"),
            publication_year,
        }
    }

    /// Check every field and produce the repository input, or all field errors.
    pub fn into_new_book(self, genres: &GenreSet) -> Result<NewBook, Vec<FieldError>> {
        let mut errors = field_errors(self.validate());

        if let Some(genre) = self.genre.as_deref() {
            if !genre.is_empty() && !genres.contains(genre) {
                errors.push(FieldError::new("genre", INVALID_VALUE));
            }
        }

        if self
            .publication_year
            .as_ref()
            .map_or(true, PublicationYear::is_blank)
        {
            errors.push(FieldError::new("publicationYear", INVALID_VALUE));
        }

        match (
            self.title,
            self.author,
            self.description,
            self.genre,
            self.publication_year,
        ) {
            (Some(title), Some(author), Some(description), Some(genre), Some(publication_year))
                if errors.is_empty() =>
            {
                Ok(NewBook {
                    title,
                    author,
                    description,
                    genre,
                    publication_year,
                })
            }
            _ => Err(in_field_order(errors, Self::FIELD_ORDER)),
        }
    }
}

/// Body of `POST /books/{id}/reviews`.
#[derive(Debug, Clone, Default, Validate)]
pub struct CreateReviewRequest {
    #[validate(required, length(min = 1))]
    pub review: Option<String>,
}

impl CreateReviewRequest {
    pub fn from_body(body: &JsonObject) -> Self {
        Self {
            review: body.text("review"),
        }
    }

    pub fn into_new_review(self) -> Result<NewReview, Vec<FieldError>> {
        let errors = field_errors(self.validate());

        match self.review {
            Some(review) if errors.is_empty() => Ok(NewReview { review }),
            _ => Err(errors),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedBook {
    pub id: BookId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedReview {
    pub review_id: ReviewId,
}

/// Flatten derive-validation failures to one error per field.
fn field_errors(result: Result<(), ValidationErrors>) -> Vec<FieldError> {
    let Err(errors) = result else {
        return Vec::new();
    };

    errors
        .field_errors()
        .into_iter()
        .filter_map(|(field, failures)| {
            failures.first().map(|failure| {
                let message = failure.message.as_deref().unwrap_or(INVALID_VALUE);
                FieldError::new(field.to_string(), message)
            })
        })
        .collect()
}

fn in_field_order(mut errors: Vec<FieldError>, order: &[&str]) -> Vec<FieldError> {
    errors.sort_by_key(|error| {
        order
            .iter()
            .position(|field| *field == error.field)
            .unwrap_or(order.len())
    });
    errors
}
