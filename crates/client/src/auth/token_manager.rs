//! Credential lifecycle management
//!
//! A [`TokenManager`] only exists once sign-in has succeeded, holds the
//! session's single [`Credentials`] bundle, and renews it on demand:
//! staleness is checked at the moment of use, never by a background
//! task. Refreshes are serialized through a gate so two callers that
//! observe staleness at the same time share one exchange; the remote
//! service does not guarantee concurrent refreshes with the same
//! refresh token are idempotent.

use serde_json::json;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use super::credentials::{Credentials, RefreshResponse, SignInResponse};
use crate::config::Config;
use crate::errors::{AuthFailureReason, Error, ErrorResponse, Result};

/// Owns and renews the credential bundle for one authenticated session.
#[derive(Debug)]
pub struct TokenManager {
    http: reqwest::Client,
    config: Config,
    credentials: RwLock<Credentials>,
    /// Serializes refresh exchanges (single-flight).
    refresh_gate: Mutex<()>,
}

impl TokenManager {
    /// Exchange sign-in credentials for a token bundle.
    ///
    /// # Errors
    /// Returns [`Error::Authentication`] when the service rejects the
    /// sign-in with one of its recognized reason codes, so callers can
    /// tell "wrong password" from "network down".
    /// [`Error::UnexpectedResponse`] covers every other non-success
    /// outcome, including a 400 with an unrecognized reason.
    pub async fn login(
        http: reqwest::Client,
        config: Config,
        email: &str,
        password: &str,
    ) -> Result<Self> {
        debug!(url = %config.sign_in_url(), "signing in");
        let response = http
            .post(config.sign_in_url())
            .query(&[("key", config.api_key.as_str())])
            .json(&json!({
                "email": email,
                "password": password,
                "returnSecureToken": true,
            }))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if status.is_success() {
            let sign_in: SignInResponse =
                serde_json::from_str(&body).map_err(|_| Error::unexpected(status, &body))?;
            let credentials = Credentials::from_sign_in(sign_in);
            info!(user_id = %credentials.user_id, "signed in");
            return Ok(Self {
                http,
                config,
                credentials: RwLock::new(credentials),
                refresh_gate: Mutex::new(()),
            });
        }

        if status.is_client_error() {
            if let Ok(parsed) = serde_json::from_str::<ErrorResponse>(&body) {
                if let Some(reason) = AuthFailureReason::from_code(&parsed.error.message) {
                    warn!(%reason, "sign-in rejected");
                    return Err(Error::Authentication {
                        reason,
                        message: parsed.error.message,
                        details: parsed.error.errors,
                    });
                }
            }
        }

        Err(Error::unexpected(status, &body))
    }

    /// Id of the user this manager is authenticated as.
    pub async fn user_id(&self) -> String {
        self.credentials.read().await.user_id.clone()
    }

    /// Snapshot of the current bundle.
    pub async fn credentials(&self) -> Credentials {
        self.credentials.read().await.clone()
    }

    /// Whether the current bundle is within the renewal buffer.
    pub async fn is_stale(&self) -> bool {
        self.credentials.read().await.is_stale()
    }

    /// A currently valid access token, refreshing first if the cached
    /// one is stale. Renewal is strictly demand-driven.
    pub async fn access_token(&self) -> Result<String> {
        {
            let credentials = self.credentials.read().await;
            if !credentials.is_stale() {
                return Ok(credentials.access_token.clone());
            }
        }

        // A second caller that saw staleness while a refresh was already
        // in flight waits here and then reuses that refresh's bundle.
        let _gate = self.refresh_gate.lock().await;
        {
            let credentials = self.credentials.read().await;
            if !credentials.is_stale() {
                return Ok(credentials.access_token.clone());
            }
        }

        self.refresh().await?;
        Ok(self.credentials.read().await.access_token.clone())
    }

    /// Exchange the refresh token for a new bundle and swap it in whole.
    ///
    /// # Errors
    /// Any non-success response is an [`Error::UnexpectedResponse`]:
    /// refresh tokens do not expire under normal operation, so there is
    /// no domain-specific taxonomy here.
    pub async fn refresh(&self) -> Result<()> {
        let refresh_token = self.credentials.read().await.refresh_token.clone();

        debug!(url = %self.config.refresh_url(), "exchanging refresh token");
        let response = self
            .http
            .post(self.config.refresh_url())
            .query(&[("key", self.config.api_key.as_str())])
            .json(&json!({
                "grant_type": "refresh_token",
                "refresh_token": refresh_token,
            }))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(Error::unexpected(status, &body));
        }

        let refreshed: RefreshResponse =
            serde_json::from_str(&body).map_err(|_| Error::unexpected(status, &body))?;
        *self.credentials.write().await = Credentials::from_refresh(refreshed);
        info!("access token refreshed");
        Ok(())
    }
}
