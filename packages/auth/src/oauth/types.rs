// ABOUTME: Types exchanged during the provider redirect flow
// ABOUTME: Callback outcomes from the browser and the backend's authorization URL response

use serde::Deserialize;
use std::collections::HashMap;

/// Outcome of the external browser redirect
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackResult {
    /// Redirect reached the callback with query parameters
    Success { params: HashMap<String, String> },
    /// User backed out of the provider page
    Cancel,
    /// Browser closed or the wait timed out without a redirect
    Dismiss,
    /// Provider reported an error on the redirect
    Error { message: String },
}

impl CallbackResult {
    pub fn success<I, K, V>(params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::Success {
            params: params
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Short label used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Success { .. } => "success",
            Self::Cancel => "cancel",
            Self::Dismiss => "dismiss",
            Self::Error { .. } => "error",
        }
    }
}

/// Response of `GET /auth/o/{provider}/`
#[derive(Debug, Deserialize)]
pub struct AuthorizationUrlResponse {
    pub authorization_url: String,
}
