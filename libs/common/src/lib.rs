//! Common library for the Cinema Reviews client
//!
//! This crate provides shared functionality used across the client crates:
//! the error taxonomy, configuration, session token storage, form
//! validation, date rendering and route paths.
//!
//! ```rust,no_run
//! use common::config::ClientConfig;
//! use common::storage::{FileTokenStore, TokenStore};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::from_env()?;
//!     let store = FileTokenStore::new(&config.token_file);
//!     println!("Signed in: {}", store.get().is_some());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod date;
pub mod error;
pub mod routes;
pub mod storage;
pub mod validation;

pub use error::{ApiError, ApiResult, extract_error};
