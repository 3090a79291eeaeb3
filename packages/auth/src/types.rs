// ABOUTME: Core type definitions shared by the sign-in paths
// ABOUTME: Session token, guest credential payloads and backend token responses

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::AuthResult;

/// Opaque bearer credential authorizing API calls
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Value for the `Authorization` header
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

// Tokens end up in logs through `?state` fields; never print the secret
impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SessionToken(<{} chars>)", self.0.len())
    }
}

impl From<String> for SessionToken {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for SessionToken {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Email/password pair for the password-grant endpoint
#[derive(Clone, Serialize)]
pub struct GuestCredentials {
    pub email: String,
    pub password: String,
}

impl GuestCredentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for GuestCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GuestCredentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Registration payload; password confirmation is checked by the backend
#[derive(Clone, Serialize)]
pub struct GuestRegistration {
    pub email: String,
    pub password: String,
    pub re_password: String,
}

impl GuestRegistration {
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        re_password: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            re_password: re_password.into(),
        }
    }

    /// Login credentials used for the follow-up sign-in
    pub fn credentials(&self) -> GuestCredentials {
        GuestCredentials::new(self.email.clone(), self.password.clone())
    }
}

impl fmt::Debug for GuestRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GuestRegistration")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("re_password", &"<redacted>")
            .finish()
    }
}

/// Token response from `/auth/jwt/create` and `/auth/o/{provider}/`
///
/// `access` is optional: a 2xx without it is an incomplete exchange, not a parse error.
#[derive(Debug, Default, Deserialize)]
pub struct TokenResponse {
    pub access: Option<String>,
}

impl TokenResponse {
    /// Parse a backend reply; an empty body carries no token
    pub fn from_value(value: serde_json::Value) -> AuthResult<Self> {
        if value.is_null() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_value(value)?)
    }

    pub fn into_token(self) -> Option<SessionToken> {
        self.access
            .filter(|access| !access.is_empty())
            .map(SessionToken::new)
    }
}

/// Outcome of a sign-in entry point that did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignInOutcome {
    SignedIn(SessionToken),
    /// The user abandoned the provider redirect; nothing changed
    Cancelled,
}

impl SignInOutcome {
    pub fn token(&self) -> Option<&SessionToken> {
        match self {
            Self::SignedIn(token) => Some(token),
            Self::Cancelled => None,
        }
    }
}
