// ABOUTME: Durable storage for the single session token
// ABOUTME: OS keyring, owner-only file and in-memory backends behind one async trait

use async_trait::async_trait;
use keyring::Entry;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, error, info};

use crate::{
    config::{AuthConfig, TokenStoreKind},
    error::{AuthError, AuthResult},
    types::SessionToken,
};

/// Well-known key the token is stored under
pub const TOKEN_KEY: &str = "token";

/// Persistence for exactly one secret value
///
/// Failures always propagate; a store that reports success must have
/// durably recorded the value.
#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn set(&self, token: &SessionToken) -> AuthResult<()>;

    async fn get(&self) -> AuthResult<Option<SessionToken>>;

    /// Removing a token that is not there succeeds
    async fn delete(&self) -> AuthResult<()>;
}

/// Build the store selected by configuration
pub fn token_store_from_config(config: &AuthConfig) -> AuthResult<Arc<dyn TokenStore>> {
    let store: Arc<dyn TokenStore> = match config.token_store {
        TokenStoreKind::Keyring => Arc::new(KeyringTokenStore::new(&config.keyring_service)),
        TokenStoreKind::File => match &config.token_file {
            Some(path) => Arc::new(FileTokenStore::new(path.clone())),
            None => Arc::new(FileTokenStore::new_default()?),
        },
        TokenStoreKind::Memory => Arc::new(MemoryTokenStore::new()),
    };
    Ok(store)
}

/// Token store backed by the OS credential manager
pub struct KeyringTokenStore {
    service: String,
}

impl KeyringTokenStore {
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    fn entry(service: &str) -> AuthResult<Entry> {
        Entry::new(service, TOKEN_KEY)
            .map_err(|e| AuthError::storage(format!("Failed to access keyring: {}", e)))
    }

    /// Keyring calls block on platform IPC; keep them off the async workers
    async fn with_entry<T, F>(&self, op: F) -> AuthResult<T>
    where
        T: Send + 'static,
        F: FnOnce(Entry) -> AuthResult<T> + Send + 'static,
    {
        let service = self.service.clone();
        tokio::task::spawn_blocking(move || op(Self::entry(&service)?))
            .await
            .map_err(|e| AuthError::storage(format!("Keyring task failed: {}", e)))?
    }
}

#[async_trait]
impl TokenStore for KeyringTokenStore {
    async fn set(&self, token: &SessionToken) -> AuthResult<()> {
        let value = token.as_str().to_string();
        self.with_entry(move |entry| {
            entry.set_password(&value).map_err(|e| {
                error!("Failed to store session token in keyring: {}", e);
                AuthError::storage(format!("Failed to store token: {}", e))
            })
        })
        .await?;
        debug!("Stored session token in keyring");
        Ok(())
    }

    async fn get(&self) -> AuthResult<Option<SessionToken>> {
        self.with_entry(|entry| match entry.get_password() {
            Ok(value) => Ok(Some(SessionToken::new(value))),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(AuthError::from(e)),
        })
        .await
    }

    async fn delete(&self) -> AuthResult<()> {
        self.with_entry(|entry| match entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(AuthError::from(e)),
        })
        .await?;
        debug!("Removed session token from keyring");
        Ok(())
    }
}

/// Token store writing a single owner-readable file
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `~/.eventhub/token`
    pub fn new_default() -> AuthResult<Self> {
        let home_dir = dirs::home_dir()
            .ok_or_else(|| AuthError::config("Could not determine home directory"))?;
        Ok(Self::new(
            home_dir.join(eventhub_config::APP_DIR_NAME).join(TOKEN_KEY),
        ))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn set(&self, token: &SessionToken) -> AuthResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }

        // Write beside the target and rename so a crash never leaves half a token
        let tmp_path = self.path.with_extension("tmp");
        fs::write(&tmp_path, token.as_str()).await?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&tmp_path, std::fs::Permissions::from_mode(0o600)).await?;
        }

        fs::rename(&tmp_path, &self.path).await?;
        debug!("Stored session token at {}", self.path.display());
        Ok(())
    }

    async fn get(&self) -> AuthResult<Option<SessionToken>> {
        match fs::read_to_string(&self.path).await {
            Ok(content) => {
                let value = content.trim();
                if value.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(SessionToken::new(value)))
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self) -> AuthResult<()> {
        match fs::remove_file(&self.path).await {
            Ok(()) => {
                info!("Removed session token file {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Process-lifetime store
#[derive(Default)]
pub struct MemoryTokenStore {
    value: Mutex<Option<SessionToken>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: SessionToken) -> Self {
        Self {
            value: Mutex::new(Some(token)),
        }
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn set(&self, token: &SessionToken) -> AuthResult<()> {
        *self.value.lock().await = Some(token.clone());
        Ok(())
    }

    async fn get(&self) -> AuthResult<Option<SessionToken>> {
        Ok(self.value.lock().await.clone())
    }

    async fn delete(&self) -> AuthResult<()> {
        *self.value.lock().await = None;
        Ok(())
    }
}
