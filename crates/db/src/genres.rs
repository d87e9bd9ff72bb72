use std::sync::Arc;

use bookshelf_kernel::settings::CatalogSettings;
use serde::{Serialize, Serializer};

/// Genres accepted when no override is configured.
pub const DEFAULT_GENRES: &[&str] = &[
    "Adventure",
    "Biography",
    "Classics",
    "Comics",
    "Fantasy",
    "Historical Fiction",
    "Horror",
    "Literary Fiction",
    "Mystery",
    "Non-Fiction",
    "Poetry",
    "Romance",
    "Science Fiction",
    "Thriller",
    "Young Adult",
];

/// Fixed, ordered set of allowed genre names. Cheap to clone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenreSet(Arc<[String]>);

impl GenreSet {
    pub fn new<I, S>(genres: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(genres.into_iter().map(Into::into).collect())
    }

    pub fn from_settings(settings: &CatalogSettings) -> Self {
        match &settings.genres {
            Some(genres) => Self::new(genres.iter().cloned()),
            None => Self::default(),
        }
    }

    /// Exact, case-sensitive membership.
    pub fn contains(&self, genre: &str) -> bool {
        self.0.iter().any(|candidate| candidate == genre)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for GenreSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.iter())
    }
}

impl Default for GenreSet {
    fn default() -> Self {
        Self::new(DEFAULT_GENRES.iter().copied())
    }
}
