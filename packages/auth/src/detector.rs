// ABOUTME: Watches API failures and signs out when the backend rejects the session token
// ABOUTME: Concurrent 401s for the same token collapse into a single sign-out

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::{
    error::{AuthError, AuthResult},
    manager::clear_session,
    session::SessionContext,
    store::TokenStore,
    types::SessionToken,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectorState {
    Authorized,
    UnauthorizedDetected,
}

/// Reacts to HTTP 401 by invalidating the local session
pub struct UnauthorizedDetector {
    store: Arc<dyn TokenStore>,
    session: SessionContext,
    state: Mutex<DetectorState>,
    sign_outs: AtomicU64,
}

impl UnauthorizedDetector {
    pub fn new(store: Arc<dyn TokenStore>, session: SessionContext) -> Self {
        Self {
            store,
            session,
            state: Mutex::new(DetectorState::Authorized),
            sign_outs: AtomicU64::new(0),
        }
    }

    /// Current state; re-arms once the session holds a token again
    pub async fn state(&self) -> DetectorState {
        let mut state = self.state.lock().await;
        self.rearm(&mut state);
        *state
    }

    /// Number of sign-outs this detector has performed
    pub fn sign_out_count(&self) -> u64 {
        self.sign_outs.load(Ordering::SeqCst)
    }

    /// Inspect a failed request made with `token_used`
    ///
    /// Returns `Ok(true)` only for the call that performed the sign-out.
    /// Non-401 errors, and 401s for a token that is no longer current, are
    /// left to the caller.
    pub async fn observe(
        &self,
        token_used: Option<&SessionToken>,
        error: &AuthError,
    ) -> AuthResult<bool> {
        if !error.is_unauthorized() {
            return Ok(false);
        }

        // Held across the sign-out so a 401 storm is handled one at a time
        let mut state = self.state.lock().await;
        self.rearm(&mut state);

        let Some(used) = token_used else {
            debug!("401 observed for a request made while signed out");
            return Ok(false);
        };

        // Compared again under the session write lock; a sign-in that lands
        // first makes this a no-op
        if !clear_session(self.store.as_ref(), &self.session, Some(used)).await? {
            debug!("Ignoring 401 for a token that is no longer current");
            return Ok(false);
        }

        *state = DetectorState::UnauthorizedDetected;
        self.sign_outs.fetch_add(1, Ordering::SeqCst);
        warn!("Backend rejected the session token, session invalidated");
        Ok(true)
    }

    fn rearm(&self, state: &mut DetectorState) {
        if *state == DetectorState::UnauthorizedDetected && self.session.is_authenticated() {
            debug!("New session present, detector re-armed");
            *state = DetectorState::Authorized;
        }
    }
}
