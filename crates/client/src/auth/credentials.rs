//! Credential bundle and the wire shapes that produce it

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Deserializer};

/// Lead time before actual expiry at which a token is treated as stale
/// and proactively renewed, so a request never races a token that
/// expires mid-flight.
pub const RENEWAL_BUFFER_SECONDS: i64 = 60;

/// Immutable snapshot of one authenticated session's tokens.
///
/// A bundle is created whole by sign-in or refresh and replaced whole on
/// every refresh, never mutated field-by-field, so a reader can never
/// observe a fresh token paired with a stale expiry.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// Id of the authenticated user.
    pub user_id: String,
    /// Bearer token attached to every document request.
    pub access_token: String,
    /// Token exchanged for a new bundle when the access token goes stale.
    pub refresh_token: String,
    /// Absolute instant at which the access token expires.
    pub expires_at: DateTime<Utc>,
}

impl Credentials {
    pub(crate) fn from_sign_in(response: SignInResponse) -> Self {
        Self {
            user_id: response.local_id,
            access_token: response.id_token,
            refresh_token: response.refresh_token,
            expires_at: Utc::now() + Duration::seconds(response.expires_in),
        }
    }

    pub(crate) fn from_refresh(response: RefreshResponse) -> Self {
        Self {
            user_id: response.user_id,
            access_token: response.id_token,
            refresh_token: response.refresh_token,
            expires_at: Utc::now() + Duration::seconds(response.expires_in),
        }
    }

    /// Whether the current time is within the renewal buffer of expiry.
    pub fn is_stale(&self) -> bool {
        Utc::now() + Duration::seconds(RENEWAL_BUFFER_SECONDS) >= self.expires_at
    }
}

/// Successful password sign-in response (camelCase wire; lifetime as
/// decimal-string seconds).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SignInResponse {
    pub local_id: String,
    pub id_token: String,
    pub refresh_token: String,
    #[serde(deserialize_with = "seconds_from_wire")]
    pub expires_in: i64,
}

/// Successful refresh exchange response (snake_case wire).
#[derive(Debug, Deserialize)]
pub(crate) struct RefreshResponse {
    pub user_id: String,
    pub id_token: String,
    pub refresh_token: String,
    #[serde(deserialize_with = "seconds_from_wire")]
    pub expires_in: i64,
}

/// Token lifetimes arrive as decimal strings; tolerate a bare number.
fn seconds_from_wire<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(i64),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Text(text) => text.parse().map_err(serde::de::Error::custom),
        Raw::Number(number) => Ok(number),
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for the credential bundle.
    use super::*;

    fn bundle_expiring_in(seconds: i64) -> Credentials {
        Credentials {
            user_id: "user-1".to_owned(),
            access_token: "access".to_owned(),
            refresh_token: "refresh".to_owned(),
            expires_at: Utc::now() + Duration::seconds(seconds),
        }
    }

    /// With expiry `T` and a 60 s buffer: fresh at `T - 61s`, stale at
    /// `T - 59s`, stale at and after `T`.
    #[test]
    fn staleness_boundary_sits_at_the_renewal_buffer() {
        assert!(!bundle_expiring_in(61).is_stale());
        assert!(bundle_expiring_in(59).is_stale());
        assert!(bundle_expiring_in(0).is_stale());
        assert!(bundle_expiring_in(-10).is_stale());
    }

    #[test]
    fn sign_in_response_yields_future_expiry() {
        let response: SignInResponse = serde_json::from_str(
            r#"{"localId":"user-1","idToken":"tok","refreshToken":"ref","expiresIn":"3600"}"#,
        )
        .expect("response parses");
        let credentials = Credentials::from_sign_in(response);

        assert_eq!(credentials.user_id, "user-1");
        assert!(!credentials.access_token.is_empty());
        assert!(!credentials.refresh_token.is_empty());
        assert!(credentials.expires_at > Utc::now());
        assert!(!credentials.is_stale());
    }

    #[test]
    fn refresh_response_uses_snake_case_names() {
        let response: RefreshResponse = serde_json::from_str(
            r#"{"user_id":"user-1","id_token":"tok2","refresh_token":"ref2","expires_in":"3600"}"#,
        )
        .expect("response parses");
        let credentials = Credentials::from_refresh(response);

        assert_eq!(credentials.access_token, "tok2");
        assert_eq!(credentials.refresh_token, "ref2");
    }

    #[test]
    fn lifetime_accepts_string_or_number() {
        let from_text: RefreshResponse = serde_json::from_str(
            r#"{"user_id":"u","id_token":"t","refresh_token":"r","expires_in":"120"}"#,
        )
        .expect("string lifetime parses");
        let from_number: RefreshResponse = serde_json::from_str(
            r#"{"user_id":"u","id_token":"t","refresh_token":"r","expires_in":120}"#,
        )
        .expect("numeric lifetime parses");

        assert_eq!(from_text.expires_in, 120);
        assert_eq!(from_number.expires_in, 120);
    }

    #[test]
    fn malformed_lifetime_is_a_parse_error() {
        let result = serde_json::from_str::<SignInResponse>(
            r#"{"localId":"u","idToken":"t","refreshToken":"r","expiresIn":"soon"}"#,
        );
        assert!(result.is_err());
    }
}
