// ABOUTME: EventHub authentication library managing the single session token
// ABOUTME: Provider OAuth, guest login and registration, secure persistence and 401-driven sign-out

pub mod api;
pub mod config;
pub mod credentials;
pub mod detector;
pub mod error;
pub mod manager;
pub mod oauth;
pub mod session;
pub mod store;
pub mod types;

// Re-export main types
pub use api::{ApiClient, ApiFetcher, PaginatedResponse, RequestBody, Resource};
pub use config::{AuthConfig, ConfigError, TokenStoreKind};
pub use credentials::CredentialExchangeClient;
pub use detector::{DetectorState, UnauthorizedDetector};
pub use error::{AuthError, AuthResult};
pub use manager::SessionManager;
pub use oauth::{
    AuthBrowser, CallbackResult, CallbackServer, OAuthProvider, ProviderRedirectFlow,
    SystemBrowser,
};
pub use session::SessionContext;
pub use store::{
    token_store_from_config, FileTokenStore, KeyringTokenStore, MemoryTokenStore, TokenStore,
};
pub use types::{GuestCredentials, GuestRegistration, SessionToken, SignInOutcome, TokenResponse};
