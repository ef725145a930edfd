use crate::secrets::Error as SecretError;
use jsonwebtoken::errors::Error as JwtError;
use reqwest::Error as ReqwestError;
use thiserror::Error as ThisError;

pub type Result<T> = std::result::Result<T, Error>;

/// Possible errors that can arise while acting as the app
#[derive(Debug, ThisError)]
pub enum Error {
    #[error("the app's private key is unavailable")]
    SecretUnavailable(#[from] SecretError),
    #[error("failed to sign the app assertion")]
    Signing(#[from] JwtError),
    #[error("failed to exchange the app assertion for an installation token")]
    TokenExchange(#[source] RequestError),
    #[error("failed to call the GitHub API")]
    ApiCall(#[source] RequestError),
}

/// Why a request to the GitHub API failed
#[derive(Debug, ThisError)]
pub enum RequestError {
    #[error("failed to deserialize response body")]
    Deserialize(#[source] ReqwestError),
    #[error("failed to serialize request body")]
    Serialize(#[source] ReqwestError),
    #[error("unexpected status code {code}")]
    Status { code: u16, source: ReqwestError },
    #[error("request timed out")]
    Timeout(#[source] ReqwestError),
    #[error("an unknown error occurred while sending the request")]
    Unknown(#[source] ReqwestError),
}

impl From<ReqwestError> for RequestError {
    fn from(error: ReqwestError) -> RequestError {
        if error.is_timeout() {
            RequestError::Timeout(error)
        } else if error.is_status() {
            RequestError::Status {
                code: error.status().unwrap_or_default().as_u16(),
                source: error,
            }
        } else if error.is_body() {
            RequestError::Serialize(error)
        } else if error.is_decode() {
            RequestError::Deserialize(error)
        } else {
            RequestError::Unknown(error)
        }
    }
}
