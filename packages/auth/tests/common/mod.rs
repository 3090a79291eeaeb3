// ABOUTME: Shared fixtures for auth integration tests
// ABOUTME: Scripted browser, fault-injecting token store and wiremock-backed API clients

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use wiremock::MockServer;

use eventhub_auth::{
    ApiClient, AuthBrowser, AuthError, AuthResult, CallbackResult, MemoryTokenStore,
    SessionContext, SessionManager, SessionToken, TokenStore,
};

pub const REDIRECT_URI: &str = "http://localhost:3737/auth/callback";
pub const AUTHORIZE_PAGE: &str = "https://provider.example/authorize?client=eventhub";

/// Browser that answers every authorization with a fixed result
pub struct ScriptedBrowser {
    result: CallbackResult,
    opened: Mutex<Vec<String>>,
}

impl ScriptedBrowser {
    pub fn new(result: CallbackResult) -> Arc<Self> {
        Arc::new(Self {
            result,
            opened: Mutex::new(Vec::new()),
        })
    }

    pub fn opened(&self) -> Vec<String> {
        self.opened.lock().unwrap().clone()
    }
}

#[async_trait]
impl AuthBrowser for ScriptedBrowser {
    async fn authorize(&self, auth_url: &str, _redirect_uri: &str) -> AuthResult<CallbackResult> {
        self.opened.lock().unwrap().push(auth_url.to_string());
        Ok(self.result.clone())
    }
}

/// Memory store with switchable failures, slow deletes and call counters
#[derive(Default)]
pub struct FlakyStore {
    inner: MemoryTokenStore,
    fail_writes: bool,
    fail_deletes: bool,
    delete_delay: Option<Duration>,
    pub sets: AtomicUsize,
    pub deletes: AtomicUsize,
}

impl FlakyStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing_writes() -> Arc<Self> {
        Arc::new(Self {
            fail_writes: true,
            ..Self::default()
        })
    }

    pub fn with_token(token: SessionToken) -> Arc<Self> {
        Arc::new(Self {
            inner: MemoryTokenStore::with_token(token),
            ..Self::default()
        })
    }

    pub fn failing_deletes(token: SessionToken) -> Arc<Self> {
        Arc::new(Self {
            inner: MemoryTokenStore::with_token(token),
            fail_deletes: true,
            ..Self::default()
        })
    }

    /// Each delete stalls for `delay` before touching the stored value
    pub fn slow_deletes(token: SessionToken, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            inner: MemoryTokenStore::with_token(token),
            delete_delay: Some(delay),
            ..Self::default()
        })
    }

    pub fn delete_count(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TokenStore for FlakyStore {
    async fn set(&self, token: &SessionToken) -> AuthResult<()> {
        self.sets.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes {
            return Err(AuthError::storage("keychain is locked"));
        }
        self.inner.set(token).await
    }

    async fn get(&self) -> AuthResult<Option<SessionToken>> {
        self.inner.get().await
    }

    async fn delete(&self) -> AuthResult<()> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delete_delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_deletes {
            return Err(AuthError::storage("keychain is locked"));
        }
        self.inner.delete().await
    }
}

pub fn api_client(server: &MockServer) -> ApiClient {
    ApiClient::new(&server.uri(), Duration::from_secs(5)).unwrap()
}

pub fn manager(
    server: &MockServer,
    store: Arc<dyn TokenStore>,
    session: SessionContext,
    browser: Arc<dyn AuthBrowser>,
) -> SessionManager {
    SessionManager::new(api_client(server), store, session, browser, REDIRECT_URI)
}
