use crate::config::{Provider, Secrets};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::fs;
use tracing::{debug, instrument};

mod aws;
mod error;

pub use aws::SecretsManager;
pub use error::{Error, Result};

/// A source of secret values, looked up by identifier
#[async_trait]
pub trait SecretProvider: Send + Sync {
    /// Fetch the current value of a secret
    async fn fetch(&self, id: &str) -> Result<String>;
}

/// Build the provider selected by the configuration
pub async fn from_config(config: &Secrets) -> Arc<dyn SecretProvider> {
    match config.provider {
        Provider::Aws => Arc::new(SecretsManager::from_env().await),
        Provider::File => Arc::new(Files),
    }
}

/// Secrets stored on the local filesystem, the identifier is the path
#[derive(Clone, Copy, Debug)]
pub struct Files;

#[async_trait]
impl SecretProvider for Files {
    #[instrument(skip(self))]
    async fn fetch(&self, id: &str) -> Result<String> {
        let contents = fs::read_to_string(id).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::NotFound(id.to_owned())
            } else {
                Error::IO(e)
            }
        })?;
        debug!("read secret from file");

        Ok(contents)
    }
}
