// ABOUTME: Shared setup for the EventHub command-line client
// ABOUTME: Builds the session stack from configuration and installs logging

pub mod context;
pub mod logging;

pub use context::AppContext;
