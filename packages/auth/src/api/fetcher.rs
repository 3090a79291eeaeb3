// ABOUTME: Token-bound reads against the backend with unauthorized detection attached
// ABOUTME: Every failed fetch is shown to the detector together with the token it was made with

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::{
    api::{
        client::ApiClient,
        resources::{PaginatedResponse, Resource},
    },
    detector::UnauthorizedDetector,
    error::{AuthError, AuthResult},
    session::SessionContext,
    types::SessionToken,
};

/// Authorized GETs bound to the current session token
///
/// The token is read at request time, so a sign-in or sign-out applies to
/// the next fetch without rebuilding the fetcher.
#[derive(Clone)]
pub struct ApiFetcher {
    api: ApiClient,
    session: SessionContext,
    detector: Arc<UnauthorizedDetector>,
}

impl ApiFetcher {
    pub fn new(api: ApiClient, session: SessionContext, detector: Arc<UnauthorizedDetector>) -> Self {
        Self {
            api,
            session,
            detector,
        }
    }

    pub fn detector(&self) -> &Arc<UnauthorizedDetector> {
        &self.detector
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> AuthResult<T> {
        let token = self.session.current();
        let result = match self.api.get(path, token.as_ref()).await {
            Ok(value) => serde_json::from_value(value).map_err(AuthError::from),
            Err(e) => Err(e),
        };

        if let Err(e) = &result {
            self.report(token.as_ref(), e).await;
        }
        result
    }

    pub async fn fetch(&self, resource: Resource) -> AuthResult<Value> {
        self.get(&resource.path()).await
    }

    /// Follow `next` links until the last page, concatenating results
    pub async fn get_all_pages<T: DeserializeOwned>(&self, path: &str) -> AuthResult<Vec<T>> {
        let mut items = Vec::new();
        let mut next = Some(path.to_string());

        while let Some(url) = next.take() {
            let page: PaginatedResponse<T> = self.get(&url).await?;
            debug!("Fetched page with {} of {} items", page.results.len(), page.count);
            items.extend(page.results);
            // A server echoing the same link would loop forever
            next = page.next.filter(|candidate| candidate != &url);
        }

        Ok(items)
    }

    async fn report(&self, token_used: Option<&SessionToken>, error: &AuthError) {
        if let Err(e) = self.detector.observe(token_used, error).await {
            warn!("Sign-out after unauthorized response failed: {}", e);
        }
    }
}
