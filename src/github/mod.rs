use crate::secrets::{self, SecretProvider};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::{fmt, sync::Arc};
use tracing::{info, instrument};

mod client;
mod error;
#[cfg(test)]
pub(crate) mod fakes;
mod jwt;

pub use client::GitHub;
pub use error::{Error, Result};

/// Exchanges app assertions for installation tokens
#[async_trait]
pub trait IssuingClient: Send + Sync {
    /// Exchange a signed app assertion for a token scoped to the installation
    async fn create_installation_token(
        &self,
        jwt: &str,
        installation_id: u64,
    ) -> Result<InstallationToken>;

    /// Build a client authenticated with the installation token
    fn authenticate(&self, token: InstallationToken) -> Box<dyn CommentPoster>;
}

/// Posts comments on issues and pull requests
#[async_trait]
pub trait CommentPoster: Send + Sync {
    async fn create_comment(&self, owner: &str, repo: &str, issue: u64, body: &str) -> Result<()>;
}

/// A bearer credential for a single installation of the app
#[derive(Clone, Deserialize)]
pub struct InstallationToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl fmt::Debug for InstallationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstallationToken")
            .field("token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Mints fresh installation tokens on behalf of the app. Nothing is cached,
/// every call signs a new assertion and performs a new exchange.
pub struct Minter {
    app_id: String,
    private_key: String,
    secrets: Arc<dyn SecretProvider>,
    issuer: Arc<dyn IssuingClient>,
}

impl Minter {
    pub fn new<A, K>(
        app_id: A,
        private_key: K,
        secrets: Arc<dyn SecretProvider>,
        issuer: Arc<dyn IssuingClient>,
    ) -> Minter
    where
        A: Into<String>,
        K: Into<String>,
    {
        Minter {
            app_id: app_id.into(),
            private_key: private_key.into(),
            secrets,
            issuer,
        }
    }

    /// Get a client authenticated as the given installation
    #[instrument(skip(self))]
    pub async fn mint(&self, installation_id: u64) -> Result<Box<dyn CommentPoster>> {
        let pem = self.secrets.fetch(&self.private_key).await?;
        if pem.trim().is_empty() {
            return Err(Error::SecretUnavailable(secrets::Error::Empty));
        }

        let jwt = jwt::generate(pem.as_bytes(), &self.app_id)?;
        let token = self
            .issuer
            .create_installation_token(&jwt, installation_id)
            .await?;
        info!(expires_at = %token.expires_at, "minted installation token");

        Ok(self.issuer.authenticate(token))
    }
}
