// ABOUTME: Direct password-grant and registration exchanges for guest accounts
// ABOUTME: Pure request/response calls; backend validation errors surface unchanged

use tracing::{debug, info};

use crate::{
    api::ApiClient,
    error::{AuthError, AuthResult},
    types::{GuestCredentials, GuestRegistration, SessionToken, TokenResponse},
};

const JWT_CREATE_PATH: &str = "/auth/jwt/create";
const USERS_PATH: &str = "/auth/users/";

pub struct CredentialExchangeClient {
    api: ApiClient,
}

impl CredentialExchangeClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Exchange email/password for a session token
    pub async fn sign_in(&self, credentials: &GuestCredentials) -> AuthResult<SessionToken> {
        debug!("Requesting guest token for {}", credentials.email);
        let response = self.api.post_json(JWT_CREATE_PATH, credentials).await?;
        TokenResponse::from_value(response)?
            .into_token()
            .ok_or(AuthError::ExchangeIncomplete)
    }

    /// Create a guest account; issues no token
    ///
    /// Password confirmation is left to the backend.
    pub async fn register(&self, registration: &GuestRegistration) -> AuthResult<()> {
        self.api.post_json(USERS_PATH, registration).await?;
        info!("Registered guest account {}", registration.email);
        Ok(())
    }
}
