// ABOUTME: Environment variable name constants
// ABOUTME: Centralized definitions of all environment variable names used across EventHub

// Backend
pub const EVENTHUB_API_URL: &str = "EVENTHUB_API_URL";
pub const EVENTHUB_HTTP_TIMEOUT_SECS: &str = "EVENTHUB_HTTP_TIMEOUT_SECS";

// OAuth redirect flow
pub const EVENTHUB_CALLBACK_PORT: &str = "EVENTHUB_CALLBACK_PORT";
pub const EVENTHUB_REDIRECT_TIMEOUT_SECS: &str = "EVENTHUB_REDIRECT_TIMEOUT_SECS";

// Token storage
pub const EVENTHUB_TOKEN_STORE: &str = "EVENTHUB_TOKEN_STORE";
pub const EVENTHUB_KEYRING_SERVICE: &str = "EVENTHUB_KEYRING_SERVICE";
pub const EVENTHUB_TOKEN_FILE: &str = "EVENTHUB_TOKEN_FILE";

// Logging
pub const RUST_LOG: &str = "RUST_LOG";
