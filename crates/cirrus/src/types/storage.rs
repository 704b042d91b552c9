//! Object storage records

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::page::is_zero;

/// Ask for a pre-signed URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresignRequest {
    /// Object key
    pub key: String,

    /// Content type the upload will declare
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub content_type: String,

    /// Requested lifetime in seconds; the server default applies when zero
    #[serde(default, skip_serializing_if = "is_zero")]
    pub expires_in: u32,
}

impl PresignRequest {
    /// Presign access to `key`.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    /// Declare the upload's content type.
    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    /// Request a lifetime in seconds.
    pub fn expires_in(mut self, seconds: u32) -> Self {
        self.expires_in = seconds;
        self
    }
}

/// A time-limited URL for direct blob-store access.
///
/// Any `headers` must be sent verbatim with the transfer. The SDK never adds
/// its bearer token to these requests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresignedUrl {
    /// Absolute URL
    #[serde(default)]
    pub url: String,

    /// HTTP method the URL was signed for
    #[serde(default)]
    pub method: String,

    /// Headers the transfer must carry
    #[serde(default)]
    pub headers: HashMap<String, String>,

    /// When the URL stops working
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

/// Metadata of a stored object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredObject {
    /// Object key
    #[serde(default)]
    pub key: String,

    /// Size in bytes
    #[serde(default)]
    pub size_bytes: u64,

    /// MIME type
    #[serde(default)]
    pub content_type: String,

    /// Entity tag
    #[serde(default)]
    pub etag: String,

    /// Last modification time
    #[serde(default)]
    pub last_modified: Option<DateTime<Utc>>,
}

/// Filters for [`Storage::list_objects`](crate::resources::Storage::list_objects).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ListObjectsParams {
    /// Only keys starting with this prefix
    #[serde(skip_serializing_if = "String::is_empty")]
    pub prefix: String,

    /// Page size
    #[serde(skip_serializing_if = "is_zero")]
    pub limit: u32,

    /// Continuation token from a previous page
    #[serde(skip_serializing_if = "String::is_empty")]
    pub page_token: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct KeyQuery<'a> {
    pub key: &'a str,
}
