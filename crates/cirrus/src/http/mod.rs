//! HTTP layer of the SDK
//!
//! [`RequestBuilder`] turns an operation into a [`PreparedRequest`]; the
//! [`pipeline`] runs it against a transport and yields a [`RawResponse`] or
//! a structured error.

pub use request::{PreparedRequest, RequestBuilder, resolve_url};
pub use response::RawResponse;

pub mod pipeline;
mod request;
mod response;

// Re-export HTTP types from the http crate for convenience
pub use http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode};
