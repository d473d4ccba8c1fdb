//! Resource client for the embercloud service

use std::sync::Arc;

use embercloud_domain::{Device, DeviceChannel, Document, FromDocument, User};
use reqwest::{Method, StatusCode};
use tracing::debug;

use crate::auth::{AuthorizedClient, Authorizer};
use crate::errors::{Error, Result};

/// Client for the embercloud document service.
///
/// Fetches documents through an [`Authorizer`] and decodes them into
/// typed records. Gateways are created with
/// [`crate::Authenticator::login`].
pub struct CloudClient {
    auth: Arc<dyn Authorizer>,
}

impl CloudClient {
    /// Create a client over an authenticated gateway.
    pub fn new(gateway: AuthorizedClient) -> Self {
        Self { auth: Arc::new(gateway) }
    }

    /// Create a client over any [`Authorizer`] implementation.
    pub fn with_authorizer(auth: Arc<dyn Authorizer>) -> Self {
        Self { auth }
    }

    /// Fetch the authenticated user's profile.
    ///
    /// # Errors
    /// [`Error::NotFound`] if the user document does not exist;
    /// [`Error::UnexpectedResponse`] / [`Error::Transport`] otherwise.
    pub async fn get_user(&self) -> Result<User> {
        let user_id = self.auth.user_id().await;
        let document =
            self.fetch_document(&format!("users/{user_id}"), format!("user '{user_id}'")).await?;
        Ok(User::from_document(&document))
    }

    /// Fetch a device by serial number.
    ///
    /// # Errors
    /// [`Error::NotFound`] if no device has this serial;
    /// [`Error::UnexpectedResponse`] / [`Error::Transport`] otherwise.
    pub async fn get_device(&self, device_serial: &str) -> Result<Device> {
        let document = self
            .fetch_document(
                &format!("devices/{device_serial}"),
                format!("device with serial '{device_serial}'"),
            )
            .await?;
        Ok(Device::from_document(&document))
    }

    /// Fetch channel information for a device. Channels are one-indexed.
    ///
    /// # Errors
    /// [`Error::NotFound`] once the channel number runs past the
    /// device's probes; callers enumerating channels stop there.
    pub async fn get_device_channel(
        &self,
        device_serial: &str,
        channel: &str,
    ) -> Result<DeviceChannel> {
        let document = self
            .fetch_document(
                &format!("devices/{device_serial}/channels/{channel}"),
                format!("channel '{channel}' on device '{device_serial}'"),
            )
            .await?;
        Ok(DeviceChannel::from_document(&document))
    }

    async fn fetch_document(&self, path: &str, description: String) -> Result<Document> {
        let response = self.auth.request(Method::GET, path).await?;
        let status = response.status();
        debug!(%path, status = status.as_u16(), "fetched document");

        if status == StatusCode::NOT_FOUND {
            return Err(Error::NotFound(description));
        }

        let body = response.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(Error::unexpected(status, &body));
        }

        // An unreadable success body is a document-level failure and is
        // never swallowed.
        serde_json::from_str(&body).map_err(|_| Error::unexpected(status, &body))
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    /// Authorizer that forwards to a mock server with a fixed token.
    struct MockAuthorizer {
        http: reqwest::Client,
        base_url: String,
        token: String,
    }

    impl MockAuthorizer {
        fn new(base_url: String) -> Self {
            Self { http: reqwest::Client::new(), base_url, token: "test-token".to_owned() }
        }
    }

    #[async_trait]
    impl Authorizer for MockAuthorizer {
        async fn user_id(&self) -> String {
            "user-1".to_owned()
        }

        async fn access_token(&self) -> Result<String> {
            Ok(self.token.clone())
        }

        async fn request(&self, method: Method, path: &str) -> Result<reqwest::Response> {
            let url = format!("{}/{}", self.base_url, path);
            let response =
                self.http.request(method, url).bearer_auth(&self.token).send().await?;
            Ok(response)
        }
    }

    fn client_for(server: &MockServer) -> CloudClient {
        CloudClient::with_authorizer(Arc::new(MockAuthorizer::new(server.uri())))
    }

    #[tokio::test]
    async fn get_user_decodes_the_document() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/user-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "projects/p/databases/(default)/documents/users/user-1",
                "fields": {
                    "uid": {"stringValue": "user-1"},
                    "displayName": {"stringValue": "Casey"},
                    "customFlag": {"booleanValue": true}
                },
                "updateTime": "2024-01-15T20:00:00Z"
            })))
            .mount(&server)
            .await;

        let user = client_for(&server).get_user().await.expect("user fetches");
        assert_eq!(user.uid.as_deref(), Some("user-1"));
        assert_eq!(user.display_name.as_deref(), Some("Casey"));
        assert_eq!(
            user.extensions.get("customFlag"),
            Some(&embercloud_domain::Value::Boolean(true))
        );
    }

    #[tokio::test]
    async fn missing_device_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/devices/NOPE"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let error = client_for(&server).get_device("NOPE").await.unwrap_err();
        assert!(matches!(error, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn server_error_is_an_unexpected_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/devices/AB123"))
            .respond_with(ResponseTemplate::new(500).set_body_string("backend on fire"))
            .mount(&server)
            .await;

        let error = client_for(&server).get_device("AB123").await.unwrap_err();
        match error {
            Error::UnexpectedResponse { status, body, .. } => {
                assert_eq!(status, 500);
                assert!(body.contains("backend on fire"));
            }
            other => panic!("expected UnexpectedResponse, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unparseable_success_body_is_an_unexpected_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/devices/AB123"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let error = client_for(&server).get_device("AB123").await.unwrap_err();
        assert!(matches!(error, Error::UnexpectedResponse { status: 200, .. }));
    }

    #[tokio::test]
    async fn channel_probing_stops_at_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/devices/AB123/channels/1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "projects/p/databases/(default)/documents/devices/AB123/channels/1",
                "fields": {"number": {"stringValue": "1"}}
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/devices/AB123/channels/2"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let first = client.get_device_channel("AB123", "1").await.expect("channel 1 exists");
        assert_eq!(first.number.as_deref(), Some("1"));

        let missing = client.get_device_channel("AB123", "2").await.unwrap_err();
        assert!(matches!(missing, Error::NotFound(_)));
    }
}
