// ABOUTME: Error types for session acquisition, storage and API calls
// ABOUTME: String-carrying variants keep the error cloneable so the last failure can be exposed to callers

use thiserror::Error;

pub type AuthResult<T> = Result<T, AuthError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Sign-in was cancelled")]
    FlowCancelled,

    #[error("Token exchange returned no access token")]
    ExchangeIncomplete,

    #[error("Malformed OAuth callback: {0}")]
    MalformedCallback(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("Another sign-in operation is already in progress")]
    OperationInProgress,

    #[error("Callback server error: {0}")]
    CallbackServer(String),

    #[error("Failed to open browser: {0}")]
    BrowserOpen(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid provider: {0}")]
    InvalidProvider(String),
}

impl AuthError {
    /// HTTP status carried by a backend error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True for the 401 response that invalidates the session
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// True when the user abandoned the provider redirect
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::FlowCancelled)
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }
}

impl From<reqwest::Error> for AuthError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => Self::Api {
                status: status.as_u16(),
                message: err.to_string(),
            },
            None => Self::Network(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for AuthError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for AuthError {
    fn from(err: std::io::Error) -> Self {
        Self::Storage(err.to_string())
    }
}

impl From<keyring::Error> for AuthError {
    fn from(err: keyring::Error) -> Self {
        Self::Storage(format!("Keyring failure: {}", err))
    }
}

impl From<url::ParseError> for AuthError {
    fn from(err: url::ParseError) -> Self {
        Self::Configuration(format!("Invalid URL: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized_detection() {
        let err = AuthError::Api {
            status: 401,
            message: "{\"detail\":\"Invalid token\"}".to_string(),
        };
        assert!(err.is_unauthorized());
        assert_eq!(err.status(), Some(401));

        let forbidden = AuthError::Api {
            status: 403,
            message: String::new(),
        };
        assert!(!forbidden.is_unauthorized());
        assert!(!AuthError::Network("connection refused".to_string()).is_unauthorized());
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            AuthError::Api {
                status: 400,
                message: "passwords do not match".to_string()
            }
            .to_string(),
            "API error (400): passwords do not match"
        );
        assert_eq!(
            AuthError::storage("disk full").to_string(),
            "Storage error: disk full"
        );
        assert!(AuthError::FlowCancelled.is_cancelled());
    }
}
