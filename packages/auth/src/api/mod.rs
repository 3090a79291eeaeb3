// ABOUTME: Backend access: the request helper and the token-bound fetcher the detector watches
// ABOUTME: Every authenticated read goes through ApiFetcher so 401s reach the detector

pub mod client;
pub mod fetcher;
pub mod resources;

pub use client::{ApiClient, RequestBody};
pub use fetcher::ApiFetcher;
pub use resources::{PaginatedResponse, Resource};
