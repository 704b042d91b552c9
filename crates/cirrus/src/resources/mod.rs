//! Service façades
//!
//! One resource per service. Each method builds a request, runs it through
//! the shared pipeline, and returns the decoded record.

pub mod auth;
pub mod ingest;
pub mod prompts;
pub mod storage;

pub use auth::Auth;
pub use ingest::Ingest;
pub use prompts::Prompts;
pub use storage::Storage;

use std::borrow::Cow;
use std::collections::HashMap;

use http::Method;

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::http::RequestBuilder;

/// Base trait for API resources.
pub trait Resource {
    /// The configuration the resource issues requests with.
    fn config(&self) -> &ClientConfig;
}

/// Percent-encode a caller-supplied id for use as one path segment.
pub(crate) fn segment(id: &str) -> Cow<'_, str> {
    urlencoding::encode(id)
}

/// Request for a pre-signed URL. `method` is what the server signed for;
/// empty means `default`.
pub(crate) fn presigned(
    config: &ClientConfig,
    default: Method,
    method: &str,
    url: &str,
) -> Result<RequestBuilder> {
    let method = if method.is_empty() {
        default
    } else {
        Method::from_bytes(method.to_ascii_uppercase().as_bytes())
            .map_err(|_| Error::InvalidMethod(method.to_owned()))?
    };
    config.presigned_request(method, url)
}

/// Apply headers a pre-signed URL requires, replacing earlier values.
pub(crate) fn with_headers(
    mut builder: RequestBuilder,
    headers: &HashMap<String, String>,
) -> Result<RequestBuilder> {
    for (name, value) in headers {
        builder = builder.header(name, value)?;
    }
    Ok(builder)
}
