// ABOUTME: Runtime configuration for the auth stack, loaded from environment variables
// ABOUTME: Covers backend URL, redirect listener, timeouts and token store backend selection

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use eventhub_config as names;
use thiserror::Error;
use url::Url;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid number for {name}: {value}")]
    InvalidNumber { name: &'static str, value: String },
    #[error("Port {0} is out of valid range (1-65535)")]
    PortOutOfRange(u16),
    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),
    #[error("Invalid token store: {0} (expected keyring, file or memory)")]
    InvalidTokenStore(String),
}

/// Which backend persists the session token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenStoreKind {
    Keyring,
    File,
    Memory,
}

impl fmt::Display for TokenStoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Keyring => "keyring",
            Self::File => "file",
            Self::Memory => "memory",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for TokenStoreKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "keyring" => Ok(Self::Keyring),
            "file" => Ok(Self::File),
            "memory" => Ok(Self::Memory),
            _ => Err(ConfigError::InvalidTokenStore(s.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub api_url: String,
    pub callback_port: u16,
    pub redirect_timeout: Duration,
    pub http_timeout: Duration,
    pub token_store: TokenStoreKind,
    pub keyring_service: String,
    /// Overrides the default `~/.eventhub/token` location for the file store
    pub token_file: Option<PathBuf>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            api_url: names::DEFAULT_API_URL.to_string(),
            callback_port: names::DEFAULT_CALLBACK_PORT,
            redirect_timeout: Duration::from_secs(names::DEFAULT_REDIRECT_TIMEOUT_SECS),
            http_timeout: Duration::from_secs(names::DEFAULT_HTTP_TIMEOUT_SECS),
            token_store: TokenStoreKind::Keyring,
            keyring_service: names::DEFAULT_KEYRING_SERVICE.to_string(),
            token_file: None,
        }
    }
}

impl AuthConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let api_url = match env::var(names::EVENTHUB_API_URL) {
            Ok(raw) => {
                Url::parse(&raw).map_err(|_| ConfigError::InvalidUrl(raw.clone()))?;
                raw
            }
            Err(_) => defaults.api_url,
        };

        let callback_port = parse_var::<u16>(names::EVENTHUB_CALLBACK_PORT)?
            .unwrap_or(defaults.callback_port);
        if callback_port == 0 {
            return Err(ConfigError::PortOutOfRange(callback_port));
        }

        let redirect_timeout = parse_var::<u64>(names::EVENTHUB_REDIRECT_TIMEOUT_SECS)?
            .map(Duration::from_secs)
            .unwrap_or(defaults.redirect_timeout);

        let http_timeout = parse_var::<u64>(names::EVENTHUB_HTTP_TIMEOUT_SECS)?
            .map(Duration::from_secs)
            .unwrap_or(defaults.http_timeout);

        let token_store = match env::var(names::EVENTHUB_TOKEN_STORE) {
            Ok(raw) => raw.parse()?,
            Err(_) => defaults.token_store,
        };

        let keyring_service =
            env::var(names::EVENTHUB_KEYRING_SERVICE).unwrap_or(defaults.keyring_service);

        let token_file = env::var(names::EVENTHUB_TOKEN_FILE).ok().map(PathBuf::from);

        Ok(Self {
            api_url,
            callback_port,
            redirect_timeout,
            http_timeout,
            token_store,
            keyring_service,
            token_file,
        })
    }

    /// Redirect target handed to the backend and the loopback listener
    pub fn redirect_uri(&self) -> String {
        format!("http://localhost:{}/auth/callback", self.callback_port)
    }
}

fn parse_var<T: FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidNumber { name, value }),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for name in [
            names::EVENTHUB_API_URL,
            names::EVENTHUB_CALLBACK_PORT,
            names::EVENTHUB_REDIRECT_TIMEOUT_SECS,
            names::EVENTHUB_HTTP_TIMEOUT_SECS,
            names::EVENTHUB_TOKEN_STORE,
            names::EVENTHUB_KEYRING_SERVICE,
            names::EVENTHUB_TOKEN_FILE,
        ] {
            env::remove_var(name);
        }
    }

    #[test]
    #[serial]
    fn test_config_from_env_defaults() {
        clear_env();

        let config = AuthConfig::from_env().unwrap();

        assert_eq!(config.api_url, "http://localhost:8000");
        assert_eq!(config.callback_port, 3737);
        assert_eq!(config.redirect_timeout, Duration::from_secs(300));
        assert_eq!(config.token_store, TokenStoreKind::Keyring);
        assert_eq!(config.redirect_uri(), "http://localhost:3737/auth/callback");
    }

    #[test]
    #[serial]
    fn test_config_from_env_overrides() {
        clear_env();
        env::set_var(names::EVENTHUB_API_URL, "https://api.example.com");
        env::set_var(names::EVENTHUB_CALLBACK_PORT, "9000");
        env::set_var(names::EVENTHUB_TOKEN_STORE, "FILE");

        let config = AuthConfig::from_env().unwrap();

        assert_eq!(config.api_url, "https://api.example.com");
        assert_eq!(config.callback_port, 9000);
        assert_eq!(config.token_store, TokenStoreKind::File);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_config_rejects_bad_values() {
        clear_env();
        env::set_var(names::EVENTHUB_CALLBACK_PORT, "not-a-port");
        assert!(matches!(
            AuthConfig::from_env(),
            Err(ConfigError::InvalidNumber { .. })
        ));

        env::set_var(names::EVENTHUB_CALLBACK_PORT, "0");
        assert!(matches!(
            AuthConfig::from_env(),
            Err(ConfigError::PortOutOfRange(0))
        ));

        clear_env();
        env::set_var(names::EVENTHUB_TOKEN_STORE, "vault");
        assert!(matches!(
            AuthConfig::from_env(),
            Err(ConfigError::InvalidTokenStore(_))
        ));

        clear_env();
    }
}
