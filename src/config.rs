use serde::Deserialize;
use std::{io::Error as IoError, path::Path, sync::Arc};
use thiserror::Error as ThisError;
use tokio::fs;
use toml::de::Error as TomlError;
use url::{ParseError, Url};

const DEFAULT_API_URL: &str = "https://api.github.com";

pub type SharedConfig = Arc<Config>;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while loading the configuration
#[derive(Debug, ThisError)]
pub enum Error {
    #[error("missing environment variable {0}")]
    Missing(&'static str),
    #[error("unknown secret provider {0:?}, must be one of `aws` or `file`")]
    UnknownProvider(String),
    #[error("invalid GitHub API URL")]
    InvalidUrl(#[from] ParseError),
    #[error("failed to read configuration file")]
    IO(#[from] IoError),
    #[error("failed to parse configuration file")]
    Toml(#[from] TomlError),
}

/// Parse the configuration from a given file
pub async fn parse<P: AsRef<Path>>(path: P) -> Result<SharedConfig> {
    let raw = fs::read(path).await?;
    let data = toml::from_slice(&raw)?;
    Ok(Arc::new(data))
}

/// Build the configuration from the process environment
pub fn from_env() -> Result<SharedConfig> {
    from_lookup(|name| std::env::var(name).ok()).map(Arc::new)
}

/// Build the configuration from an arbitrary variable lookup
fn from_lookup<F>(lookup: F) -> Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    let require = |name: &'static str| lookup(name).ok_or(Error::Missing(name));

    let api_url = match lookup("GITHUB_API_URL") {
        Some(raw) => Url::parse(&raw)?,
        None => default_api_url(),
    };
    let provider = match lookup("PRIVATE_KEY_SECRET_PROVIDER") {
        Some(raw) => raw.parse::<Provider>()?,
        None => Provider::default(),
    };

    Ok(Config {
        log: lookup("LOG_LEVEL").unwrap_or_else(default_log),
        sentry: lookup("SENTRY_DSN").filter(|dsn| !dsn.is_empty()),
        github: GitHub {
            app_id: require("GITHUB_APP_ID")?,
            api_url,
        },
        secrets: Secrets {
            private_key: require("PRIVATE_KEY_SECRET_ARN")?,
            provider,
        },
        webhooks: Webhooks {
            secret: require("WEBHOOK_SECRET")?,
        },
    })
}

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default = "default_log")]
    pub log: String,
    #[serde(default)]
    pub sentry: Option<String>,
    pub github: GitHub,
    pub secrets: Secrets,
    pub webhooks: Webhooks,
}

#[derive(Debug, Deserialize)]
pub struct GitHub {
    pub app_id: String,
    #[serde(default = "default_api_url")]
    pub api_url: Url,
}

#[derive(Debug, Deserialize)]
pub struct Secrets {
    /// Identifier of the app's PEM encoded private key within the provider
    pub private_key: String,
    #[serde(default)]
    pub provider: Provider,
}

/// Where secrets are loaded from
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Aws,
    File,
}

impl Default for Provider {
    fn default() -> Provider {
        Provider::Aws
    }
}

impl std::str::FromStr for Provider {
    type Err = Error;

    fn from_str(s: &str) -> Result<Provider> {
        match s.to_lowercase().as_str() {
            "aws" => Ok(Provider::Aws),
            "file" => Ok(Provider::File),
            _ => Err(Error::UnknownProvider(s.to_owned())),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Webhooks {
    pub secret: String,
}

fn default_log() -> String {
    "info".into()
}

fn default_api_url() -> Url {
    Url::parse(DEFAULT_API_URL).expect("default API URL must be valid")
}
