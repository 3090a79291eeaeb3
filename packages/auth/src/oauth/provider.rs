// ABOUTME: Delegated identity providers supported by the backend
// ABOUTME: Each provider declares its endpoint segment and the callback fields forwarded to the token exchange

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{AuthError, AuthResult};

/// Supported OAuth providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OAuthProvider {
    Schoology,
    Google,
}

impl OAuthProvider {
    /// Path segment used by `/auth/o/{provider}/`
    pub fn slug(&self) -> &'static str {
        match self {
            Self::Schoology => "schoology",
            Self::Google => "google",
        }
    }

    /// Backend path for both the authorization-URL request and the token exchange
    pub fn endpoint(&self) -> String {
        format!("/auth/o/{}/", self.slug())
    }

    /// Callback fields forwarded to the backend, in submission order
    ///
    /// Anything else the provider puts on the redirect is dropped.
    pub fn callback_fields(&self) -> &'static [&'static str] {
        match self {
            Self::Schoology => &["oauth_token"],
            Self::Google => &["code", "state"],
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Schoology => "Schoology",
            Self::Google => "Google",
        }
    }

    /// Get all supported providers
    pub fn all() -> Vec<Self> {
        vec![Self::Schoology, Self::Google]
    }
}

impl fmt::Display for OAuthProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for OAuthProvider {
    type Err = AuthError;

    fn from_str(s: &str) -> AuthResult<Self> {
        match s.to_lowercase().as_str() {
            "schoology" => Ok(Self::Schoology),
            "google" => Ok(Self::Google),
            _ => Err(AuthError::InvalidProvider(format!(
                "Unknown provider: {}. Supported: schoology, google",
                s
            ))),
        }
    }
}

impl TryFrom<&str> for OAuthProvider {
    type Error = AuthError;

    fn try_from(s: &str) -> AuthResult<Self> {
        s.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("google", OAuthProvider::Google)]
    #[case("GOOGLE", OAuthProvider::Google)]
    #[case("schoology", OAuthProvider::Schoology)]
    #[case("Schoology", OAuthProvider::Schoology)]
    fn test_provider_parsing(#[case] input: &str, #[case] expected: OAuthProvider) {
        assert_eq!(input.parse::<OAuthProvider>().unwrap(), expected);
    }

    #[test]
    fn test_unknown_provider() {
        assert!(matches!(
            "github".parse::<OAuthProvider>(),
            Err(AuthError::InvalidProvider(_))
        ));
    }

    #[test]
    fn test_every_provider_declares_fields() {
        for provider in OAuthProvider::all() {
            assert!(!provider.callback_fields().is_empty(), "{}", provider);
        }
        assert_eq!(OAuthProvider::Google.callback_fields(), &["code", "state"]);
        assert_eq!(OAuthProvider::Schoology.callback_fields(), &["oauth_token"]);
    }

    #[test]
    fn test_provider_endpoint() {
        assert_eq!(OAuthProvider::Google.endpoint(), "/auth/o/google/");
        assert_eq!(OAuthProvider::Schoology.to_string(), "schoology");
    }
}
