//! Authentication service records

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::token::StaticTokenProvider;

/// Register a new user.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct SignUpRequest {
    /// Login email
    pub email: String,

    /// Initial password
    pub password: String,

    /// Display name
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
}

impl std::fmt::Debug for SignUpRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignUpRequest")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("name", &self.name)
            .finish()
    }
}

/// Result of a sign-up.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignUpResponse {
    /// Identifier of the new user
    #[serde(default)]
    pub user_id: String,

    /// Whether the account is already confirmed
    #[serde(default)]
    pub confirmed: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct ConfirmSignUpRequest<'a> {
    pub email: &'a str,
    pub code: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct EmailRequest<'a> {
    pub email: &'a str,
}

#[derive(Serialize)]
pub(crate) struct RefreshRequest<'a> {
    pub refresh_token: &'a str,
}

#[derive(Serialize)]
pub(crate) struct ResetPasswordRequest<'a> {
    pub email: &'a str,
    pub code: &'a str,
    pub new_password: &'a str,
}

/// Password login.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Login email
    pub email: String,

    /// Password
    pub password: String,
}

impl LoginRequest {
    /// Create a login request.
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// OAuth2 client-credentials grant.
#[derive(Clone, Serialize, Deserialize)]
pub struct ClientCredentialsRequest {
    /// Always `client_credentials`
    pub grant_type: String,

    /// Client identifier
    pub client_id: String,

    /// Client secret
    pub client_secret: String,

    /// Space-separated scopes
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub scope: String,
}

impl ClientCredentialsRequest {
    /// Create a grant for `client_id` / `client_secret`.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            grant_type: "client_credentials".to_string(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            scope: String::new(),
        }
    }

    /// Request specific scopes.
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = scope.into();
        self
    }
}

impl std::fmt::Debug for ClientCredentialsRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientCredentialsRequest")
            .field("grant_type", &self.grant_type)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("scope", &self.scope)
            .finish()
    }
}

/// Tokens issued by login, refresh, or client-credentials.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSet {
    /// Bearer token for authenticated calls
    #[serde(default)]
    pub access_token: String,

    /// Usually `Bearer`
    #[serde(default)]
    pub token_type: String,

    /// Lifetime of the access token in seconds
    #[serde(default)]
    pub expires_in: i64,

    /// Token for [`Auth::refresh`](crate::resources::Auth::refresh)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    /// OpenID identity token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_token: Option<String>,
}

impl TokenSet {
    /// When the access token expires, given when it was issued.
    ///
    /// `None` if the lifetime does not fit in a timestamp.
    pub fn expires_at(&self, issued_at: DateTime<Utc>) -> Option<DateTime<Utc>> {
        Duration::try_seconds(self.expires_in).and_then(|lifetime| issued_at.checked_add_signed(lifetime))
    }

    /// A provider that always returns this access token.
    pub fn token_provider(&self) -> StaticTokenProvider {
        StaticTokenProvider::new(self.access_token.clone())
    }
}

impl std::fmt::Debug for TokenSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSet")
            .field("access_token", &"[REDACTED]")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "[REDACTED]"))
            .field("id_token", &self.id_token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// The authenticated user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// User identifier
    #[serde(default)]
    pub id: String,

    /// Login email
    #[serde(default)]
    pub email: String,

    /// Display name
    #[serde(default)]
    pub name: String,

    /// Whether sign-up was confirmed
    #[serde(default)]
    pub confirmed: bool,

    /// Account creation time
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_sign_up_request_omits_empty_name() {
        let request = SignUpRequest {
            email: "a@example.com".into(),
            password: "hunter2".into(),
            name: String::new(),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json, serde_json::json!({"email": "a@example.com", "password": "hunter2"}));
    }

    #[test]
    fn test_client_credentials_wire_shape() {
        let request = ClientCredentialsRequest::new("cid", "csecret").with_scope("ingest:write");
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "grant_type": "client_credentials",
                "client_id": "cid",
                "client_secret": "csecret",
                "scope": "ingest:write",
            })
        );
    }

    #[test]
    fn test_secrets_are_redacted_in_debug() {
        let login = format!("{:?}", LoginRequest::new("a@example.com", "hunter2"));
        assert!(!login.contains("hunter2"));

        let tokens = TokenSet {
            access_token: "at_secret".into(),
            refresh_token: Some("rt_secret".into()),
            ..TokenSet::default()
        };
        let debug = format!("{tokens:?}");
        assert!(!debug.contains("at_secret"));
        assert!(!debug.contains("rt_secret"));
    }

    #[test]
    fn test_token_set_expires_at() {
        let tokens: TokenSet = serde_json::from_str(
            r#"{"access_token":"at","token_type":"Bearer","expires_in":3600}"#,
        )
        .unwrap();
        let issued = Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap();
        assert_eq!(
            tokens.expires_at(issued),
            Some(Utc.with_ymd_and_hms(2025, 1, 1, 13, 0, 0).unwrap())
        );
        assert!(tokens.refresh_token.is_none());
    }

    #[test]
    fn test_user_tolerates_missing_fields() {
        let user: User = serde_json::from_str(r#"{"id":"usr_1","email":"a@example.com"}"#).unwrap();
        assert_eq!(user.id, "usr_1");
        assert!(!user.confirmed);
        assert!(user.created_at.is_none());
    }
}
