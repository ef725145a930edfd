use super::{Error, Result, SecretProvider};
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_secretsmanager::{error::ProvideErrorMetadata, Client};
use tracing::{debug, error, instrument};

/// Only ever read the current version of a secret
const VERSION_STAGE: &str = "AWSCURRENT";

/// Secrets stored in AWS Secrets Manager, addressed by name or ARN
#[derive(Clone, Debug)]
pub struct SecretsManager {
    client: Client,
}

impl SecretsManager {
    /// Connect using the credentials and region from the environment
    pub async fn from_env() -> SecretsManager {
        let config = aws_config::load_defaults(BehaviorVersion::latest()).await;
        SecretsManager {
            client: Client::new(&config),
        }
    }
}

#[async_trait]
impl SecretProvider for SecretsManager {
    #[instrument(skip(self))]
    async fn fetch(&self, id: &str) -> Result<String> {
        let output = self
            .client
            .get_secret_value()
            .secret_id(id)
            .version_stage(VERSION_STAGE)
            .send()
            .await
            .map_err(|e| {
                let e = e.into_service_error();
                error!(code = e.code().unwrap_or("unknown"), error = %e, "failed to get secret");

                if e.is_resource_not_found_exception() {
                    Error::NotFound(id.to_owned())
                } else {
                    Error::Request(e)
                }
            })?;
        debug!("retrieved secret");

        output
            .secret_string()
            .map(str::to_owned)
            .ok_or(Error::Empty)
    }
}
