//! Authentication: credential lifecycle and the authorized gateway
//!
//! [`Authenticator`] bootstraps a session: it discovers the backing
//! project from the application web configuration, performs the
//! password sign-in, and assembles an [`AuthorizedClient`] whose
//! requests are signed with the session's bearer token and renewed on
//! demand.
//!
//! ```no_run
//! use embercloud::{Authenticator, CloudClient, Config};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::new("api-key", "1:app:web:id");
//!     let gateway = Authenticator::new(config).login("pit@example.com", "secret").await?;
//!     let client = CloudClient::new(gateway);
//!     let user = client.get_user().await?;
//!     println!("signed in as {:?}", user.display_name);
//!     Ok(())
//! }
//! ```

pub mod credentials;
pub mod gateway;
pub mod token_manager;

use serde::Deserialize;
use tracing::debug;

pub use credentials::{Credentials, RENEWAL_BUFFER_SECONDS};
pub use gateway::{AuthorizedClient, Authorizer};
pub use token_manager::TokenManager;

use crate::config::Config;
use crate::errors::{Error, Result};

/// Application web configuration, as served by the config host.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    pub project_id: String,
    #[serde(default)]
    pub app_id: Option<String>,
    #[serde(rename = "databaseURL", default)]
    pub database_url: Option<String>,
    #[serde(default)]
    pub storage_bucket: Option<String>,
    #[serde(default)]
    pub auth_domain: Option<String>,
}

/// Builds authenticated sessions.
pub struct Authenticator {
    http: reqwest::Client,
    config: Config,
}

impl Authenticator {
    pub fn new(config: Config) -> Self {
        Self::with_http_client(reqwest::Client::new(), config)
    }

    /// Use a caller-supplied HTTP client (connection pools, proxies,
    /// timeouts are the caller's concern).
    pub fn with_http_client(http: reqwest::Client, config: Config) -> Self {
        Self { http, config }
    }

    /// Fetch the application web configuration for this app id.
    ///
    /// # Errors
    /// Any non-success or unparseable response is an
    /// [`Error::UnexpectedResponse`].
    pub async fn app_config(&self) -> Result<AppConfig> {
        let url = self.config.app_config_url();
        debug!(%url, "fetching application config");

        let response = self
            .http
            .get(url)
            .header("accept", "application/json")
            .header("x-goog-api-key", &self.config.api_key)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(Error::unexpected(status, &body));
        }
        serde_json::from_str(&body).map_err(|_| Error::unexpected(status, &body))
    }

    /// Discover the project, sign in, and assemble the gateway.
    ///
    /// # Errors
    /// [`Error::Authentication`] when the sign-in is rejected with a
    /// recognized reason; [`Error::UnexpectedResponse`] or
    /// [`Error::Transport`] otherwise.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthorizedClient> {
        let app_config = self.app_config().await?;
        let tokens =
            TokenManager::login(self.http.clone(), self.config.clone(), email, password).await?;

        Ok(AuthorizedClient::new(
            self.http.clone(),
            self.config.document_root(&app_config.project_id),
            self.config.api_key.clone(),
            tokens,
        ))
    }
}
