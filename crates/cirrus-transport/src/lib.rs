//! Transport abstraction layer for Cirrus
//!
//! Provides a trait-based transport abstraction used by every Cirrus service
//! client to move requests over the wire.
//!
//! # Architecture
//!
//! - **Transport trait**: one round trip per call, body left unread
//! - **HTTP transport**: REST client via reqwest
//! - **Error handling**: failures classified as timeout, temporary, or other
//!
//! # Usage
//!
//! ```no_run
//! use cirrus_transport::{HttpRequest, HttpTransport, Transport};
//! use http::Method;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let transport = HttpTransport::new()?;
//! let request = HttpRequest::new(Method::GET, "https://api.example.com/health".parse()?);
//! let response = transport.send(request).await?;
//! let body = response.bytes().await?;
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod http;
pub mod traits;

// Re-export commonly used types
pub use error::{Result, TransportError};
pub use self::http::{HttpTransport, HttpTransportConfig};
pub use traits::{BodyStream, HttpRequest, HttpResponse, RequestBody, Transport};
