pub mod auth;
pub mod fetch;
