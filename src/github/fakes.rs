//! In-memory implementations of the GitHub and secret store capabilities

use super::{error::RequestError, CommentPoster, Error, InstallationToken, IssuingClient, Result};
use crate::secrets::{self, SecretProvider};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use std::sync::{Arc, Mutex};

const PRIVATE_KEY: &str = include_str!("../../testdata/keys/private.pem");
const PUBLIC_KEY: &str = include_str!("../../testdata/keys/public.pem");

/// Serves a single fixed secret, or nothing at all
pub(crate) struct FakeSecrets {
    value: Option<String>,
}

impl FakeSecrets {
    /// Serve the test private key
    pub fn key() -> FakeSecrets {
        FakeSecrets::value(PRIVATE_KEY)
    }

    pub fn value(value: &str) -> FakeSecrets {
        FakeSecrets {
            value: Some(value.to_owned()),
        }
    }

    /// Behave like a store without the secret
    pub fn missing() -> FakeSecrets {
        FakeSecrets { value: None }
    }
}

#[async_trait]
impl SecretProvider for FakeSecrets {
    async fn fetch(&self, id: &str) -> secrets::Result<String> {
        self.value
            .clone()
            .ok_or_else(|| secrets::Error::NotFound(id.to_owned()))
    }
}

/// A comment recorded by the fake installation client
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct PostedComment {
    pub owner: String,
    pub repo: String,
    pub issue: u64,
    pub body: String,
}

#[derive(Deserialize)]
struct Claims {
    iss: String,
}

/// A real transport error, built without touching the network
fn request_error() -> RequestError {
    reqwest::Client::new()
        .get("not a url")
        .build()
        .unwrap_err()
        .into()
}

/// Issues tokens for any correctly signed assertion and records every call
#[derive(Default)]
pub(crate) struct FakeIssuer {
    exchanges: Mutex<Vec<u64>>,
    comments: Arc<Mutex<Vec<PostedComment>>>,
    reject_exchanges: bool,
    reject_comments: bool,
}

impl FakeIssuer {
    /// Record exchanges but fail every one of them
    pub fn rejecting_exchanges() -> FakeIssuer {
        FakeIssuer {
            reject_exchanges: true,
            ..Default::default()
        }
    }

    /// Issue tokens whose clients fail to post comments
    pub fn rejecting_comments() -> FakeIssuer {
        FakeIssuer {
            reject_comments: true,
            ..Default::default()
        }
    }

    /// Installation ids a token was requested for, in order
    pub fn exchanges(&self) -> Vec<u64> {
        self.exchanges.lock().unwrap().clone()
    }

    /// Comments posted through any client this issuer authenticated
    pub fn comments(&self) -> Vec<PostedComment> {
        self.comments.lock().unwrap().clone()
    }
}

#[async_trait]
impl IssuingClient for FakeIssuer {
    async fn create_installation_token(
        &self,
        jwt: &str,
        installation_id: u64,
    ) -> Result<InstallationToken> {
        let key = DecodingKey::from_rsa_pem(PUBLIC_KEY.as_bytes()).unwrap();
        let decoded = jsonwebtoken::decode::<Claims>(jwt, &key, &Validation::new(Algorithm::RS256))
            .expect("assertion was not signed by the app key");
        assert_eq!("1234", decoded.claims.iss);

        self.exchanges.lock().unwrap().push(installation_id);
        if self.reject_exchanges {
            return Err(Error::TokenExchange(request_error()));
        }

        Ok(InstallationToken {
            token: format!("ghs_installation{}", installation_id),
            expires_at: Utc::now() + Duration::hours(1),
        })
    }

    fn authenticate(&self, token: InstallationToken) -> Box<dyn CommentPoster> {
        Box::new(FakeInstallation {
            _token: token,
            comments: self.comments.clone(),
            reject: self.reject_comments,
        })
    }
}

struct FakeInstallation {
    _token: InstallationToken,
    comments: Arc<Mutex<Vec<PostedComment>>>,
    reject: bool,
}

#[async_trait]
impl CommentPoster for FakeInstallation {
    async fn create_comment(&self, owner: &str, repo: &str, issue: u64, body: &str) -> Result<()> {
        if self.reject {
            return Err(Error::ApiCall(request_error()));
        }
        self.comments.lock().unwrap().push(PostedComment {
            owner: owner.to_owned(),
            repo: repo.to_owned(),
            issue,
            body: body.to_owned(),
        });
        Ok(())
    }
}
