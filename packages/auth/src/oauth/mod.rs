// ABOUTME: Delegated provider sign-in: provider table, browser context, callback listener and flow
// ABOUTME: Produces a session token from a browser redirect without committing it anywhere

pub mod browser;
pub mod flow;
pub mod provider;
pub mod server;
pub mod types;

pub use browser::{AuthBrowser, SystemBrowser};
pub use flow::ProviderRedirectFlow;
pub use provider::OAuthProvider;
pub use server::{CallbackListener, CallbackServer};
pub use types::{AuthorizationUrlResponse, CallbackResult};
