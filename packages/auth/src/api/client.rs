// ABOUTME: Request helper used by every backend call in the auth stack
// ABOUTME: Joins paths onto the API base, attaches bearer tokens and maps non-2xx into status-carrying errors

use reqwest::{Client, Method};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error};
use url::Url;

use crate::{
    config::AuthConfig,
    error::{AuthError, AuthResult},
    types::SessionToken,
};

/// Request payload encodings the backend accepts
#[derive(Debug, Clone)]
pub enum RequestBody {
    Json(Value),
    /// Sent as `application/x-www-form-urlencoded`, in the given order
    Form(Vec<(String, String)>),
}

/// Thin JSON client over the EventHub backend
///
/// No retries: every failure is returned to the caller as-is.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> AuthResult<Self> {
        // A trailing slash keeps any base path prefix when joining
        let mut normalized = base_url.trim_end_matches('/').to_string();
        normalized.push('/');
        let base_url = Url::parse(&normalized)?;

        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AuthError::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { http, base_url })
    }

    pub fn from_config(config: &AuthConfig) -> AuthResult<Self> {
        Self::new(&config.api_url, config.http_timeout)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve an API path, or pass through an absolute URL (pagination links)
    pub fn url_for(&self, path: &str) -> AuthResult<Url> {
        if path.starts_with("http://") || path.starts_with("https://") {
            return Ok(Url::parse(path)?);
        }
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    /// Perform one request and parse the JSON response
    ///
    /// An empty 2xx body parses as `Value::Null`.
    pub async fn request(
        &self,
        method: Method,
        url: Url,
        body: Option<RequestBody>,
        token: Option<&SessionToken>,
    ) -> AuthResult<Value> {
        debug!("{} {}", method, url.path());

        let mut builder = self.http.request(method.clone(), url.clone());
        if let Some(token) = token {
            builder = builder.header(reqwest::header::AUTHORIZATION, token.bearer());
        }
        builder = match body {
            Some(RequestBody::Json(value)) => builder.json(&value),
            Some(RequestBody::Form(fields)) => builder.form(&fields),
            None => builder,
        };

        let response = builder
            .send()
            .await
            .map_err(|e| AuthError::Network(format!("{} {} failed: {}", method, url.path(), e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| AuthError::Network(format!("Failed to read response body: {}", e)))?;

        if !status.is_success() {
            // Body may echo credentials back; only the status goes to the log
            error!("{} {} failed with status {}", method, url.path(), status);
            let message = if text.trim().is_empty() {
                status.to_string()
            } else {
                text
            };
            return Err(AuthError::Api {
                status: status.as_u16(),
                message,
            });
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }

    pub async fn get(&self, path: &str, token: Option<&SessionToken>) -> AuthResult<Value> {
        let url = self.url_for(path)?;
        self.request(Method::GET, url, None, token).await
    }

    pub async fn post_json<B: Serialize>(&self, path: &str, body: &B) -> AuthResult<Value> {
        let url = self.url_for(path)?;
        let body = serde_json::to_value(body)?;
        self.request(Method::POST, url, Some(RequestBody::Json(body)), None)
            .await
    }

    pub async fn post_form(&self, path: &str, fields: Vec<(String, String)>) -> AuthResult<Value> {
        let url = self.url_for(path)?;
        self.request(Method::POST, url, Some(RequestBody::Form(fields)), None)
            .await
    }
}
