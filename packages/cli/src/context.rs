// ABOUTME: Wires configuration, token store, session context, manager and fetcher together
// ABOUTME: One instance per process; every command works against the same session handle

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::debug;

use eventhub_auth::{
    token_store_from_config, ApiClient, ApiFetcher, AuthConfig, SessionContext, SessionManager,
    TokenStore, UnauthorizedDetector,
};

pub struct AppContext {
    pub config: AuthConfig,
    pub store: Arc<dyn TokenStore>,
    pub session: SessionContext,
    pub manager: SessionManager,
    pub fetcher: ApiFetcher,
}

impl AppContext {
    pub async fn from_env() -> Result<Self> {
        let config = AuthConfig::from_env().context("Invalid EventHub configuration")?;
        Self::new(config).await
    }

    /// Restore any persisted session and build the stack around it
    pub async fn new(config: AuthConfig) -> Result<Self> {
        let store = token_store_from_config(&config).context("Failed to open token store")?;
        let session = SessionContext::load(store.as_ref()).await;
        debug!(
            store = %config.token_store,
            restored = session.is_authenticated(),
            "Session stack ready"
        );

        let manager = SessionManager::from_config(&config, store.clone(), session.clone())?;
        let detector = Arc::new(UnauthorizedDetector::new(store.clone(), session.clone()));
        let fetcher = ApiFetcher::new(ApiClient::from_config(&config)?, session.clone(), detector);

        Ok(Self {
            config,
            store,
            session,
            manager,
            fetcher,
        })
    }

    /// Forget the current session; `false` when there was none
    pub async fn sign_out(&self) -> Result<bool> {
        if !self.session.is_authenticated() {
            return Ok(false);
        }
        self.manager.sign_out().await?;
        Ok(true)
    }
}
