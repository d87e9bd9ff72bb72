pub mod books;

use std::sync::Arc;

use anyhow::Context;
use bookshelf_authz::{Authenticator, StaticTokenAuthenticator};
use bookshelf_db::{BookRepository, GenreSet};
use bookshelf_kernel::{settings::Settings, ModuleRegistry};

/// External collaborators the modules are built on.
#[derive(Clone)]
pub struct Services {
    pub repository: Arc<dyn BookRepository>,
    pub authenticator: Arc<dyn Authenticator>,
    pub genres: GenreSet,
}

impl Services {
    /// Build the configured storage backend, authenticator, and genre catalog.
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let repository = bookshelf_db::connect(&settings.database)
            .with_context(|| "failed to connect book repository")?;
        let authenticator = StaticTokenAuthenticator::from_settings(&settings.auth)
            .with_context(|| "failed to build authenticator")?;

        Ok(Self {
            repository,
            authenticator: Arc::new(authenticator),
            genres: GenreSet::from_settings(&settings.catalog),
        })
    }
}

/// Register all project-specific modules with the registry
pub fn register_all(registry: &mut ModuleRegistry, services: &Services) {
    registry.register(books::create_module(
        books::routes::BooksState {
            repository: Arc::clone(&services.repository),
            genres: services.genres.clone(),
        },
        Arc::clone(&services.authenticator),
    ));
}
