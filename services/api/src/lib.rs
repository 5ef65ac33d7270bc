//! HTTP client for the Cinema Reviews backend
//!
//! [`ApiClient`] wraps `reqwest`, injects the bearer token from the shared
//! token store and exposes one typed method per backend endpoint.

mod auth;
pub mod client;
pub mod models;
mod reviews;
mod users;

pub use client::ApiClient;
