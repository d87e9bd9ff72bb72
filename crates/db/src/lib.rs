//! Book storage: the repository abstraction, its backends, and the genre catalog.

use std::sync::Arc;

use anyhow::bail;
use bookshelf_kernel::settings::DatabaseSettings;

pub mod genres;
pub mod memory;
pub mod models;
pub mod repository;

pub use genres::{GenreSet, DEFAULT_GENRES};
pub use memory::MemoryBookRepository;
pub use models::{Book, BookId, NewBook, NewReview, PublicationYear, Review, ReviewId};
pub use repository::{BookRepository, RepositoryError};

const MEMORY_SCHEME: &str = "memory://";

/// Build the repository selected by `settings.endpoint`.
pub fn connect(settings: &DatabaseSettings) -> anyhow::Result<Arc<dyn BookRepository>> {
    if settings.endpoint.starts_with(MEMORY_SCHEME) {
        tracing::info!(target: "bookshelf-db", endpoint = %settings.endpoint, "using in-memory book store");
        return Ok(Arc::new(MemoryBookRepository::new()));
    }

    bail!(
        "unsupported database endpoint '{}'; expected {}",
        settings.endpoint,
        MEMORY_SCHEME
    )
}
