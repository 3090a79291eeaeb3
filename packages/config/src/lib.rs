// ABOUTME: Shared configuration names and defaults for EventHub
// ABOUTME: Keeps env var names and fallback values in one place for every crate

pub mod constants;

pub use constants::*;

/// Default backend base URL (local development server)
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Default loopback port for the OAuth redirect listener
pub const DEFAULT_CALLBACK_PORT: u16 = 3737;

/// Default time to wait for the browser redirect before treating it as dismissed
pub const DEFAULT_REDIRECT_TIMEOUT_SECS: u64 = 300;

/// Default HTTP request timeout
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Default keyring service name
pub const DEFAULT_KEYRING_SERVICE: &str = "eventhub";

/// Directory name under the home directory for file-backed state
pub const APP_DIR_NAME: &str = ".eventhub";
