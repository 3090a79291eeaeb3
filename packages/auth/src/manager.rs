// ABOUTME: Session manager orchestrating provider sign-in, guest sign-in, guest registration and sign-out
// ABOUTME: Commits tokens to the durable store before the in-memory session so the two never diverge

use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as AsyncMutex, MutexGuard};
use tracing::{error, info, warn};

use crate::{
    api::ApiClient,
    config::AuthConfig,
    credentials::CredentialExchangeClient,
    error::{AuthError, AuthResult},
    oauth::{AuthBrowser, OAuthProvider, ProviderRedirectFlow, SystemBrowser},
    session::SessionContext,
    store::TokenStore,
    types::{GuestCredentials, GuestRegistration, SessionToken, SignInOutcome},
};

/// Session acquisition entry points
///
/// One acquisition runs at a time per manager; a concurrent call is rejected
/// with `AuthError::OperationInProgress`. Failures are both returned and kept
/// as `last_error()` for callers that render errors instead of propagating.
pub struct SessionManager {
    store: Arc<dyn TokenStore>,
    session: SessionContext,
    flow: ProviderRedirectFlow,
    exchange: CredentialExchangeClient,
    in_flight: AsyncMutex<()>,
    last_error: Mutex<Option<AuthError>>,
}

impl SessionManager {
    pub fn new(
        api: ApiClient,
        store: Arc<dyn TokenStore>,
        session: SessionContext,
        browser: Arc<dyn AuthBrowser>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            store,
            session,
            flow: ProviderRedirectFlow::new(api.clone(), browser, redirect_uri),
            exchange: CredentialExchangeClient::new(api),
            in_flight: AsyncMutex::new(()),
            last_error: Mutex::new(None),
        }
    }

    /// Manager using the system browser and loopback callback from configuration
    pub fn from_config(
        config: &AuthConfig,
        store: Arc<dyn TokenStore>,
        session: SessionContext,
    ) -> AuthResult<Self> {
        let api = ApiClient::from_config(config)?;
        let browser = Arc::new(SystemBrowser::new(
            config.callback_port,
            config.redirect_timeout,
        ));
        Ok(Self::new(api, store, session, browser, config.redirect_uri()))
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn store(&self) -> Arc<dyn TokenStore> {
        self.store.clone()
    }

    /// Most recent failure of any entry point, cleared by the next success
    pub fn last_error(&self) -> Option<AuthError> {
        self.last_error
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// True while an acquisition operation is running
    pub fn is_busy(&self) -> bool {
        self.in_flight.try_lock().is_err()
    }

    /// Sign in through a delegated provider's browser redirect
    pub async fn sign_in_with_provider(&self, provider: OAuthProvider) -> AuthResult<SignInOutcome> {
        let _guard = self.begin()?;
        let result = async {
            let token = self.flow.initiate(provider).await?;
            self.commit(token).await
        }
        .await;
        self.finish("provider sign-in", result)
    }

    /// Sign in with guest email/password
    pub async fn sign_in_as_guest(&self, credentials: &GuestCredentials) -> AuthResult<SignInOutcome> {
        let _guard = self.begin()?;
        let result = self.guest_sign_in(credentials).await;
        self.finish("guest sign-in", result)
    }

    /// Register a guest account, then sign in with the same credentials
    ///
    /// Sign-in is never attempted when registration fails.
    pub async fn register_as_guest(
        &self,
        registration: &GuestRegistration,
    ) -> AuthResult<SignInOutcome> {
        let _guard = self.begin()?;
        let result = async {
            self.exchange.register(registration).await?;
            self.guest_sign_in(&registration.credentials()).await
        }
        .await;
        self.finish("guest registration", result)
    }

    /// Forget the session: store first, then the in-memory context
    ///
    /// Calling this while signed out is a no-op.
    pub async fn sign_out(&self) -> AuthResult<()> {
        clear_session(self.store.as_ref(), &self.session, None).await?;
        Ok(())
    }

    async fn guest_sign_in(&self, credentials: &GuestCredentials) -> AuthResult<SessionToken> {
        let token = self.exchange.sign_in(credentials).await?;
        self.commit(token).await
    }

    /// Persist, then publish; a failed persist leaves the session untouched
    async fn commit(&self, token: SessionToken) -> AuthResult<SessionToken> {
        let _writes = self.session.lock_writes().await;
        if let Err(e) = self.store.set(&token).await {
            error!("Failed to persist session token: {}", e);
            return Err(e);
        }
        self.session.set(Some(token.clone()));
        Ok(token)
    }

    fn begin(&self) -> AuthResult<MutexGuard<'_, ()>> {
        self.in_flight.try_lock().map_err(|_| {
            warn!("Rejected sign-in: another operation is in flight");
            AuthError::OperationInProgress
        })
    }

    fn finish(&self, operation: &str, result: AuthResult<SessionToken>) -> AuthResult<SignInOutcome> {
        match result {
            Ok(token) => {
                self.record_error(None);
                info!("{} succeeded", operation);
                Ok(SignInOutcome::SignedIn(token))
            }
            Err(AuthError::FlowCancelled) => {
                info!("{} cancelled by user", operation);
                Ok(SignInOutcome::Cancelled)
            }
            Err(e) => {
                error!("{} failed: {}", operation, e);
                self.record_error(Some(e.clone()));
                Err(e)
            }
        }
    }

    fn record_error(&self, error: Option<AuthError>) {
        *self
            .last_error
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = error;
    }
}

/// Delete the stored token, then clear the context
///
/// With `expected` set, nothing happens unless the session still holds that
/// token. A failed delete leaves the context as it was so the two never
/// disagree. Returns whether a live session was cleared.
pub(crate) async fn clear_session(
    store: &dyn TokenStore,
    session: &SessionContext,
    expected: Option<&SessionToken>,
) -> AuthResult<bool> {
    let _writes = session.lock_writes().await;

    let current = session.current();
    if let Some(expected) = expected {
        if current.as_ref() != Some(expected) {
            return Ok(false);
        }
    }

    if let Err(e) = store.delete().await {
        error!("Failed to delete stored session token: {}", e);
        return Err(e);
    }
    if current.is_none() {
        return Ok(false);
    }
    session.set(None);
    info!("Signed out");
    Ok(true)
}
