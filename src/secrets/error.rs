use aws_sdk_secretsmanager::operation::get_secret_value::GetSecretValueError;
use std::io::Error as IoError;
use thiserror::Error as ThisError;

pub type Result<T> = std::result::Result<T, Error>;

/// The possible errors raised while fetching a secret
#[derive(Debug, ThisError)]
pub enum Error {
    #[error("secret {0:?} does not exist")]
    NotFound(String),
    #[error("secret has no value")]
    Empty,
    #[error("failed to fetch the secret from the store")]
    Request(#[source] GetSecretValueError),
    #[error("failed to read the secret file")]
    IO(#[from] IoError),
}
