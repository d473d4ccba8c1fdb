//! Authorized request gateway
//!
//! Wraps an arbitrary document request with a valid bearer token,
//! renewing through the [`TokenManager`] when the cached token is
//! stale. Transport failures surface verbatim: retry policy belongs to
//! the transport collaborator, not here.

use async_trait::async_trait;
use reqwest::{Method, Response};
use tracing::debug;

use super::token_manager::TokenManager;
use crate::errors::Result;

/// Interface for making authorized document requests.
///
/// The resource layer depends on this seam rather than on the concrete
/// gateway, so tests can substitute their own implementation.
#[async_trait]
pub trait Authorizer: Send + Sync {
    /// Id of the authenticated user, for addressing "my own" resources.
    async fn user_id(&self) -> String;

    /// A currently valid access token.
    async fn access_token(&self) -> Result<String>;

    /// Issue a request for a path relative to the document root.
    async fn request(&self, method: Method, path: &str) -> Result<Response>;
}

/// Gateway that signs every request with the session's bearer token.
///
/// Holds the [`TokenManager`] (which exclusively owns the credential
/// bundle) rather than any copy of the bundle, so every request sees
/// the latest tokens.
#[derive(Debug)]
pub struct AuthorizedClient {
    http: reqwest::Client,
    document_root: String,
    api_key: String,
    tokens: TokenManager,
}

impl AuthorizedClient {
    pub(crate) fn new(
        http: reqwest::Client,
        document_root: String,
        api_key: String,
        tokens: TokenManager,
    ) -> Self {
        Self { http, document_root, api_key, tokens }
    }

    /// The token manager backing this gateway.
    pub fn tokens(&self) -> &TokenManager {
        &self.tokens
    }
}

#[async_trait]
impl Authorizer for AuthorizedClient {
    async fn user_id(&self) -> String {
        self.tokens.user_id().await
    }

    async fn access_token(&self) -> Result<String> {
        self.tokens.access_token().await
    }

    async fn request(&self, method: Method, path: &str) -> Result<Response> {
        let token = self.tokens.access_token().await?;
        let url = format!("{}/{}", self.document_root, path);
        debug!(%method, %url, "authorized request");

        let response = self
            .http
            .request(method, url)
            .query(&[("key", self.api_key.as_str())])
            .bearer_auth(token)
            .send()
            .await?;
        Ok(response)
    }
}
