// ABOUTME: External browser context that drives the provider's authorization page
// ABOUTME: The system implementation opens the platform browser and waits on the loopback callback server

use async_trait::async_trait;
use std::time::Duration;
use tracing::{error, info};

use crate::{
    error::{AuthError, AuthResult},
    oauth::{server::CallbackServer, types::CallbackResult},
};

/// Modal, user-driven authorization context
///
/// Implementations must resolve with a `CallbackResult` when the user
/// finishes, backs out, or closes the page; cancellation is a result, not an
/// error.
#[async_trait]
pub trait AuthBrowser: Send + Sync {
    async fn authorize(&self, auth_url: &str, redirect_uri: &str) -> AuthResult<CallbackResult>;
}

/// Opens the default browser and listens on localhost for the redirect
pub struct SystemBrowser {
    server: CallbackServer,
    timeout: Duration,
}

impl SystemBrowser {
    pub fn new(port: u16, timeout: Duration) -> Self {
        Self {
            server: CallbackServer::with_port(port),
            timeout,
        }
    }

    pub fn callback_url(&self) -> String {
        self.server.callback_url()
    }
}

#[async_trait]
impl AuthBrowser for SystemBrowser {
    async fn authorize(&self, auth_url: &str, redirect_uri: &str) -> AuthResult<CallbackResult> {
        if redirect_uri != self.server.callback_url() {
            return Err(AuthError::config(format!(
                "Redirect target {} does not match callback listener {}",
                redirect_uri,
                self.server.callback_url()
            )));
        }

        // Bind first so a fast provider redirect cannot race the listener
        let listener = self.server.listen().await?;

        info!("Opening browser for provider sign-in");
        if let Err(e) = open::that(auth_url) {
            error!("Failed to open browser: {}", e);
            return Err(AuthError::BrowserOpen(format!(
                "Failed to open browser. Please manually visit: {}",
                auth_url
            )));
        }

        listener.wait_for_callback(self.timeout).await
    }
}
