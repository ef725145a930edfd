use super::validators::Error as SignatureError;
use crate::github::Error as GitHubError;
use http::StatusCode;
use serde_json::Error as SerdeError;
use thiserror::Error as ThisError;

pub type Result<T> = std::result::Result<T, Error>;

/// Reasons a webhook delivery could not be handled
#[derive(Debug, ThisError)]
pub enum Error {
    #[error("signature is invalid")]
    SignatureInvalid(#[from] SignatureError),
    #[error("missing event kind header")]
    MissingEventKind,
    #[error("failed to parse hook")]
    Parse(#[from] SerdeError),
    #[error("failed to process an event")]
    Handler(#[from] GitHubError),
}

impl Error {
    /// The status code to respond to GitHub with
    pub fn status(&self) -> StatusCode {
        match self {
            Error::SignatureInvalid(_) | Error::MissingEventKind | Error::Parse(_) => {
                StatusCode::BAD_REQUEST
            }
            Error::Handler(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// A message safe to expose to the caller
    pub fn message(&self) -> &'static str {
        match self {
            Error::SignatureInvalid(_) => "invalid signature",
            Error::MissingEventKind | Error::Parse(_) => "bad request",
            Error::Handler(_) => "internal server error",
        }
    }
}
