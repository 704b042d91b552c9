//! # Cirrus SDK
//!
//! Rust SDK for the Cirrus platform:
//! - Authentication (sign-up, login, token refresh, client credentials)
//! - Object storage pre-signed URL brokerage
//! - Prompt catalog
//! - Content ingestion, including direct-to-storage uploads
//!
//! Every call goes through one execution pipeline and fails with a single
//! structured error, [`ApiError`], whose `code` callers match on.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cirrus::{Client, Context, LoginRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Client::new("https://api.cirrus.dev/v1")?;
//!     let ctx = Context::background();
//!
//!     let tokens = client
//!         .auth()
//!         .login(&ctx, &LoginRequest::new("me@example.com", "hunter2"))
//!         .await?;
//!
//!     let client = Client::builder("https://api.cirrus.dev/v1")
//!         .token_provider(tokens.token_provider())
//!         .build()?;
//!
//!     match client.prompts().get(&ctx, "prm_welcome").await {
//!         Ok(prompt) => println!("{}", prompt.template),
//!         Err(err) if err.api().is_some_and(|e| e.is_not_found()) => println!("no such prompt"),
//!         Err(err) => return Err(err.into()),
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

// Re-export commonly used types
pub use client::{Client, ClientBuilder};
pub use config::{ClientConfig, ClientConfigBuilder};
pub use context::{Context, ContextError};
pub use error::{ApiError, BoxError, Error, Result};
pub use self::http::{RawResponse, RequestBuilder};
pub use token::{StaticTokenProvider, TokenProvider, token_provider_fn};
pub use types::*;

// Module declarations
pub mod client;
pub mod config;
pub mod context;
pub mod error;
pub mod http;
pub mod observability;
pub mod resources;
pub mod token;
pub mod types;

// Re-export key dependencies for convenience
pub use async_trait::async_trait;
pub use cirrus_transport as transport;
pub use tokio_util::sync::CancellationToken;

/// Prelude module for common imports
///
/// # Examples
///
/// ```rust
/// use cirrus::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        ApiError, Client, ClientConfig, Context, Error, Result, TokenProvider,
        error::codes,
        types::{IngestJob, JobStatus, Page, Prompt, TokenSet},
    };
}

/// SDK version, automatically updated from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod property_tests;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert_eq!(VERSION, env!("CARGO_PKG_VERSION"));
        assert!(config::DEFAULT_USER_AGENT.ends_with(VERSION));
    }
}
