// ABOUTME: Provider redirect flow: authorization URL, browser round trip, backend token exchange
// ABOUTME: Forwards only the provider's allow-listed callback fields to the backend

use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

use crate::{
    api::ApiClient,
    error::{AuthError, AuthResult},
    oauth::{
        browser::AuthBrowser,
        provider::OAuthProvider,
        types::{AuthorizationUrlResponse, CallbackResult},
    },
    types::{SessionToken, TokenResponse},
};

/// Drives one provider sign-in; commits nothing itself
pub struct ProviderRedirectFlow {
    api: ApiClient,
    browser: Arc<dyn AuthBrowser>,
    redirect_uri: String,
}

impl ProviderRedirectFlow {
    pub fn new(api: ApiClient, browser: Arc<dyn AuthBrowser>, redirect_uri: impl Into<String>) -> Self {
        Self {
            api,
            browser,
            redirect_uri: redirect_uri.into(),
        }
    }

    pub fn redirect_uri(&self) -> &str {
        &self.redirect_uri
    }

    /// Run the full redirect dance and return the backend session token
    ///
    /// Any non-success callback becomes `AuthError::FlowCancelled`.
    pub async fn initiate(&self, provider: OAuthProvider) -> AuthResult<SessionToken> {
        info!("Starting OAuth sign-in for provider: {}", provider);

        let auth_url = self.authorization_url(provider).await?;

        let outcome = self
            .browser
            .authorize(&auth_url, &self.redirect_uri)
            .await?;

        let params = match outcome {
            CallbackResult::Success { params } => params,
            other => {
                info!("OAuth sign-in for {} ended without success ({})", provider, other.kind());
                return Err(AuthError::FlowCancelled);
            }
        };

        let fields = extract_callback_fields(provider, &params)?;
        debug!("Exchanging {} callback fields with backend", fields.len());

        let response = self.api.post_form(&provider.endpoint(), fields).await?;
        let token = TokenResponse::from_value(response)?
            .into_token()
            .ok_or(AuthError::ExchangeIncomplete)?;

        info!("OAuth sign-in with {} produced a session token", provider);
        Ok(token)
    }

    async fn authorization_url(&self, provider: OAuthProvider) -> AuthResult<String> {
        let mut url = self.api.url_for(&provider.endpoint())?;
        url.query_pairs_mut()
            .append_pair("redirect_uri", &self.redirect_uri);

        let response = self
            .api
            .request(reqwest::Method::GET, url, None, None)
            .await?;
        let parsed: AuthorizationUrlResponse = serde_json::from_value(response)?;
        Ok(parsed.authorization_url)
    }
}

/// Pick exactly the provider's allow-listed fields out of the callback
pub(crate) fn extract_callback_fields(
    provider: OAuthProvider,
    params: &HashMap<String, String>,
) -> AuthResult<Vec<(String, String)>> {
    let allowed = provider.callback_fields();
    if allowed.is_empty() {
        return Err(AuthError::config(format!(
            "No callback fields registered for provider {}",
            provider
        )));
    }

    allowed
        .iter()
        .map(|field| {
            params
                .get(*field)
                .map(|value| (field.to_string(), value.clone()))
                .ok_or_else(|| {
                    AuthError::MalformedCallback(format!(
                        "{} callback is missing '{}'",
                        provider, field
                    ))
                })
        })
        .collect()
}
