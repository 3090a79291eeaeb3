// ABOUTME: Loopback callback server receiving the provider redirect
// ABOUTME: Collects every query parameter of the redirect into a CallbackResult

use std::collections::HashMap;
use std::time::Duration;
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
};
use tracing::{debug, error, info, warn};

use crate::{
    error::{AuthError, AuthResult},
    oauth::types::CallbackResult,
};

const CALLBACK_PATH: &str = "/auth/callback";

/// OAuth callback server configuration
pub struct CallbackServer {
    port: u16,
}

impl Default for CallbackServer {
    fn default() -> Self {
        Self::new()
    }
}

impl CallbackServer {
    /// Create a new callback server (defaults to port 3737)
    pub fn new() -> Self {
        Self {
            port: eventhub_config::DEFAULT_CALLBACK_PORT,
        }
    }

    pub fn with_port(port: u16) -> Self {
        Self { port }
    }

    pub fn callback_url(&self) -> String {
        format!("http://localhost:{}{}", self.port, CALLBACK_PATH)
    }

    /// Bind the listener; do this before sending the user to the provider
    pub async fn listen(&self) -> AuthResult<CallbackListener> {
        let addr = format!("127.0.0.1:{}", self.port);
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| AuthError::CallbackServer(format!("Failed to bind to {}: {}", addr, e)))?;
        info!("Waiting for OAuth callback on {}", addr);
        Ok(CallbackListener { listener })
    }
}

/// A bound callback listener
pub struct CallbackListener {
    listener: TcpListener,
}

impl CallbackListener {
    /// Wait for the redirect, giving up after `timeout`
    ///
    /// A timeout is reported as `CallbackResult::Dismiss`, never as a hang.
    pub async fn wait_for_callback(self, timeout: Duration) -> AuthResult<CallbackResult> {
        match tokio::time::timeout(timeout, self.accept_callback()).await {
            Ok(result) => result,
            Err(_) => {
                warn!("No OAuth callback within {:?}, treating as dismissed", timeout);
                Ok(CallbackResult::Dismiss)
            }
        }
    }

    async fn accept_callback(&self) -> AuthResult<CallbackResult> {
        loop {
            let (mut stream, peer_addr) = self.listener.accept().await.map_err(|e| {
                AuthError::CallbackServer(format!("Failed to accept connection: {}", e))
            })?;
            debug!("Received connection from {}", peer_addr);

            let mut buffer = vec![0; 4096];
            let n = stream
                .read(&mut buffer)
                .await
                .map_err(|e| AuthError::CallbackServer(format!("Failed to read request: {}", e)))?;
            let request = String::from_utf8_lossy(&buffer[..n]);

            // Browsers also ask for favicons and open speculative connections
            let Some(params) = parse_callback_request(&request) else {
                respond(&mut stream, NOT_FOUND_RESPONSE).await;
                continue;
            };

            let result = callback_result_from_params(params);
            match &result {
                CallbackResult::Success { .. } => respond(&mut stream, &success_response()).await,
                CallbackResult::Error { message } => {
                    respond(&mut stream, &error_response(message)).await
                }
                _ => respond(&mut stream, &error_response("Sign-in was cancelled")).await,
            }
            info!("Received OAuth callback ({})", result.kind());
            return Ok(result);
        }
    }
}

/// Extract query parameters from `GET /auth/callback?... HTTP/1.1`
///
/// Returns `None` for requests that are not the callback.
fn parse_callback_request(request: &str) -> Option<HashMap<String, String>> {
    let first_line = request.lines().next()?;
    let mut parts = first_line.split_whitespace();
    if parts.next()? != "GET" {
        return None;
    }
    let target = parts.next()?;
    let (path, query) = match target.split_once('?') {
        Some((path, query)) => (path, query),
        None => (target, ""),
    };
    if path != CALLBACK_PATH {
        return None;
    }

    Some(
        url::form_urlencoded::parse(query.as_bytes())
            .into_owned()
            .collect(),
    )
}

fn callback_result_from_params(params: HashMap<String, String>) -> CallbackResult {
    if let Some(error) = params.get("error") {
        let message = params
            .get("error_description")
            .cloned()
            .unwrap_or_else(|| error.clone());
        return CallbackResult::Error { message };
    }
    if params.is_empty() {
        return CallbackResult::Cancel;
    }
    CallbackResult::Success { params }
}

async fn respond(stream: &mut TcpStream, response: &str) {
    if let Err(e) = stream.write_all(response.as_bytes()).await {
        error!("Failed to send callback response: {}", e);
    }
}

fn success_response() -> String {
    format!(
        "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        SUCCESS_HTML.len(),
        SUCCESS_HTML
    )
}

fn error_response(error_msg: &str) -> String {
    let html = format!(
        r#"<html><body><h1>Sign-in failed</h1><p>{}</p><p>You can close this tab and return to the app.</p></body></html>"#,
        escape_html(error_msg)
    );
    format!(
        "HTTP/1.1 400 Bad Request\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        html.len(),
        html
    )
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

const NOT_FOUND_RESPONSE: &str =
    "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n";

const SUCCESS_HTML: &str = r#"<html>
<head>
    <title>Signed in</title>
    <style>
        body { font-family: system-ui, -apple-system, sans-serif; max-width: 600px; margin: 100px auto; text-align: center; }
        h1 { color: #22c55e; }
        p { color: #64748b; }
    </style>
</head>
<body>
    <h1>Signed in</h1>
    <p>You can now close this tab and return to the app.</p>
</body>
</html>"#;
