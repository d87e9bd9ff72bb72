//! Authenticated principals and the authenticators that establish them.

use std::collections::HashMap;

use async_trait::async_trait;
use bookshelf_kernel::settings::AuthSettings;
use serde::Serialize;
use thiserror::Error;

/// The user a request is acting as, set by the authentication gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrentUser {
    pub id: String,
    pub username: String,
}

impl CurrentUser {
    pub fn new(id: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid authenticator configuration: {0}")]
    Configuration(String),

    #[error("authentication backend unavailable: {0}")]
    Unavailable(String),
}

/// Resolves a bearer credential to a user.
///
/// `Ok(None)` means the credential is unknown; errors are reserved for
/// backends that could not answer.
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn authenticate(&self, token: &str) -> Result<Option<CurrentUser>, AuthError>;
}

/// Authenticator backed by a fixed token table loaded from configuration.
#[derive(Debug, Default)]
pub struct StaticTokenAuthenticator {
    tokens: HashMap<String, CurrentUser>,
}

impl StaticTokenAuthenticator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a token, rejecting empty or duplicate values.
    pub fn with_token(mut self, token: impl Into<String>, user: CurrentUser) -> Result<Self, AuthError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(AuthError::Configuration(format!(
                "empty token configured for user '{}'",
                user.username
            )));
        }
        if self.tokens.contains_key(&token) {
            return Err(AuthError::Configuration(format!(
                "token for user '{}' is already assigned",
                user.username
            )));
        }
        self.tokens.insert(token, user);
        Ok(self)
    }

    pub fn from_settings(settings: &AuthSettings) -> Result<Self, AuthError> {
        let authenticator = settings
            .tokens
            .iter()
            .try_fold(Self::new(), |authenticator, entry| {
                authenticator.with_token(
                    entry.token.clone(),
                    CurrentUser::new(entry.user_id.clone(), entry.username.clone()),
                )
            })?;

        if authenticator.tokens.is_empty() {
            tracing::warn!(
                target: "bookshelf-authz",
                "no API tokens configured; every authenticated route will answer 401"
            );
        }

        Ok(authenticator)
    }

    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }
}

#[async_trait]
impl Authenticator for StaticTokenAuthenticator {
    async fn authenticate(&self, token: &str) -> Result<Option<CurrentUser>, AuthError> {
        Ok(self.tokens.get(token).cloned())
    }
}
