use std::future::Future;

use serde::Serialize;
use tokio::sync::RwLock;
use url::Url;

use super::scheduler::{TokenPair, TokenRefresher};
use crate::error::Error;

/// HTTP client for the backend's token refresh endpoint.
pub struct RefreshClient {
    refresh_url: Url,
    http: reqwest::Client,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

impl RefreshClient {
    /// Create a client for the given refresh endpoint.
    #[must_use]
    pub fn new(refresh_url: Url) -> Self {
        Self {
            refresh_url,
            http: reqwest::Client::new(),
        }
    }

    /// Use a custom HTTP client (for connection pool reuse or testing).
    #[must_use]
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http = client;
        self
    }

    /// Exchange the current refresh token for a rotated pair.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Http`] on network failure, or [`Error::Refresh`] if
    /// the endpoint answers with a non-success status.
    pub async fn refresh_tokens(&self, refresh_token: &str) -> Result<TokenPair, Error> {
        let response = self
            .http
            .post(self.refresh_url.clone())
            .json(&RefreshRequest { refresh_token })
            .send()
            .await?;

        let response = Self::ensure_success(response, "token refresh").await?;
        response.json::<TokenPair>().await.map_err(Into::into)
    }

    /// Checks HTTP response status; returns the response on success or an error with details.
    async fn ensure_success(
        response: reqwest::Response,
        operation: &'static str,
    ) -> Result<reqwest::Response, Error> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let detail = response.text().await.unwrap_or_default();
        Err(Error::Refresh {
            operation,
            status: Some(status),
            detail,
        })
    }
}

/// Current token pair of a live session, rotated in place.
///
/// Implements [`TokenRefresher`] by sending the stored refresh token and
/// keeping whatever pair comes back; when the backend rotates without
/// returning a new refresh token, the previous one is kept. Wrap in an
/// `Arc` to share between the scheduler and request-issuing code.
pub struct SessionTokens {
    client: RefreshClient,
    current: RwLock<TokenPair>,
}

impl SessionTokens {
    #[must_use]
    pub fn new(client: RefreshClient, initial: TokenPair) -> Self {
        Self {
            client,
            current: RwLock::new(initial),
        }
    }

    /// Bearer token for outgoing API calls.
    pub async fn access_token(&self) -> String {
        self.current.read().await.access_token.clone()
    }
}

impl TokenRefresher for SessionTokens {
    fn refresh(
        &self,
    ) -> impl Future<Output = Result<TokenPair, Box<dyn std::error::Error + Send + Sync>>> + Send
    {
        async move {
            let refresh_token = self
                .current
                .read()
                .await
                .refresh_token
                .clone()
                .ok_or("session holds no refresh token")?;

            let mut rotated = self.client.refresh_tokens(&refresh_token).await?;
            if rotated.refresh_token.is_none() {
                rotated.refresh_token = Some(refresh_token);
            }

            *self.current.write().await = rotated.clone();
            Ok(rotated)
        }
    }
}
