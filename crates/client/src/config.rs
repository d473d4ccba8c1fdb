//! Client configuration
//!
//! Every endpoint the client touches is derived from an explicit
//! [`Config`] value threaded through the constructors. There are no
//! process-wide globals, and tests point the hosts at a local mock
//! server.

const DEFAULT_APP_CONFIG_HOST: &str = "https://firebase.googleapis.com";
const DEFAULT_IDENTITY_HOST: &str = "https://identitytoolkit.googleapis.com";
const DEFAULT_TOKEN_HOST: &str = "https://securetoken.googleapis.com";
const DEFAULT_DOCUMENT_HOST: &str = "https://firestore.googleapis.com";

/// Configuration for the embercloud service endpoints.
#[derive(Debug, Clone)]
pub struct Config {
    /// API key sent as the `key` query parameter on every request.
    pub api_key: String,
    /// Application id used to discover the backing project.
    pub app_id: String,
    /// Host serving the application web configuration.
    pub app_config_host: String,
    /// Host serving the password sign-in exchange.
    pub identity_host: String,
    /// Host serving the refresh-token exchange.
    pub token_host: String,
    /// Host serving the document store.
    pub document_host: String,
}

impl Config {
    /// Configuration for the production service.
    pub fn new(api_key: impl Into<String>, app_id: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            app_id: app_id.into(),
            app_config_host: DEFAULT_APP_CONFIG_HOST.to_owned(),
            identity_host: DEFAULT_IDENTITY_HOST.to_owned(),
            token_host: DEFAULT_TOKEN_HOST.to_owned(),
            document_host: DEFAULT_DOCUMENT_HOST.to_owned(),
        }
    }

    /// URL of the application web configuration resource.
    pub fn app_config_url(&self) -> String {
        format!("{}/v1alpha/projects/-/apps/{}/webConfig", self.app_config_host, self.app_id)
    }

    /// URL of the password sign-in endpoint.
    pub fn sign_in_url(&self) -> String {
        format!("{}/v1/accounts:signInWithPassword", self.identity_host)
    }

    /// URL of the refresh-token exchange endpoint.
    pub fn refresh_url(&self) -> String {
        format!("{}/v1/token", self.token_host)
    }

    /// Root under which a project's documents are addressed.
    pub fn document_root(&self, project_id: &str) -> String {
        format!(
            "{}/v1/projects/{}/databases/(default)/documents",
            self.document_host, project_id
        )
    }
}
