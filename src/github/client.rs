use super::{CommentPoster, Error, InstallationToken, IssuingClient, Result};
use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION},
    Client,
};
use serde::Serialize;
use tracing::{debug, instrument};
use url::Url;

const API_VERSION: &str = "application/vnd.github.v3+json";

/// An unauthenticated GitHub API client able to issue installation tokens
#[derive(Clone, Debug)]
pub struct GitHub {
    client: Client,
    api: Url,
}

impl GitHub {
    /// Setup a client for the API at the given base URL
    pub fn new(api: Url) -> reqwest::Result<GitHub> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(API_VERSION));

        let client = Client::builder()
            .user_agent(format!(
                "{}/{}",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION")
            ))
            .default_headers(headers)
            .build()?;

        Ok(GitHub { client, api })
    }
}

#[async_trait]
impl IssuingClient for GitHub {
    #[instrument(skip(self, jwt))]
    async fn create_installation_token(
        &self,
        jwt: &str,
        installation_id: u64,
    ) -> Result<InstallationToken> {
        let url = format!(
            "{}/app/installations/{}/access_tokens",
            base(&self.api),
            installation_id
        );

        let send = async {
            self.client
                .post(url)
                .header(AUTHORIZATION, format!("Bearer {}", jwt))
                .send()
                .await?
                .error_for_status()?
                .json::<InstallationToken>()
                .await
        };
        let token = send.await.map_err(|e| Error::TokenExchange(e.into()))?;
        debug!(expires_at = %token.expires_at, "retrieved installation token");

        Ok(token)
    }

    fn authenticate(&self, token: InstallationToken) -> Box<dyn CommentPoster> {
        Box::new(Installation {
            client: self.client.clone(),
            api: self.api.clone(),
            token,
        })
    }
}

/// A GitHub API client acting as a single installation of the app
#[derive(Debug)]
pub struct Installation {
    client: Client,
    api: Url,
    token: InstallationToken,
}

#[async_trait]
impl CommentPoster for Installation {
    #[instrument(skip(self, body))]
    async fn create_comment(&self, owner: &str, repo: &str, issue: u64, body: &str) -> Result<()> {
        let url = format!(
            "{}/repos/{}/{}/issues/{}/comments",
            base(&self.api),
            owner,
            repo,
            issue
        );

        let send = async {
            self.client
                .post(url)
                .header(AUTHORIZATION, format!("token {}", self.token.token))
                .json(&Comment { body })
                .send()
                .await?
                .error_for_status()
        };
        send.await.map_err(|e| Error::ApiCall(e.into()))?;
        debug!("created comment");

        Ok(())
    }
}

/// The request body for a new issue comment
#[derive(Serialize)]
struct Comment<'body> {
    body: &'body str,
}

/// The API URL without a trailing slash
fn base(api: &Url) -> &str {
    api.as_str().trim_end_matches('/')
}
