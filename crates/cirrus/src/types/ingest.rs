//! Content ingestion records

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::page::is_zero;

/// Processing state of an ingestion job.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Accepted, not yet started
    #[default]
    Pending,
    /// Being processed
    Processing,
    /// Done
    Completed,
    /// Gave up; see [`IngestJob::error`]
    Failed,
    /// A status this SDK version does not know
    #[serde(other)]
    Unknown,
}

impl JobStatus {
    /// Whether the job will not change any more.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An ingestion job.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestJob {
    /// Job identifier
    #[serde(default)]
    pub id: String,

    /// Current state
    #[serde(default)]
    pub status: JobStatus,

    /// Name of the ingested file, if any
    #[serde(default)]
    pub filename: String,

    /// Owning tenant
    #[serde(default)]
    pub tenant_id: String,

    /// Owning user
    #[serde(default)]
    pub user_id: String,

    /// Failure reason when `status` is `failed`
    #[serde(default)]
    pub error: String,

    /// Creation time
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    /// Last state change
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Ingest inline text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestTextRequest {
    /// Owning tenant
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub tenant_id: String,

    /// Owning user
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub user_id: String,

    /// Content
    pub text: String,

    /// Where the text came from
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub source: String,

    /// Arbitrary key/value metadata
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
}

/// Owner fields sent with a multipart file ingestion. Empty values are
/// omitted from the form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestFileOptions {
    /// Owning tenant
    pub tenant_id: String,

    /// Owning user
    pub user_id: String,

    /// MIME type of the file part; empty leaves it unset
    pub content_type: String,
}

/// Start a two-step upload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateUploadRequest {
    /// File name
    pub filename: String,

    /// MIME type
    pub content_type: String,

    /// Size of the content in bytes
    pub size_bytes: u64,

    /// Owning tenant
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub tenant_id: String,

    /// Owning user
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub user_id: String,
}

impl CreateUploadRequest {
    /// Describe an upload.
    pub fn new(filename: impl Into<String>, content_type: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            filename: filename.into(),
            content_type: content_type.into(),
            size_bytes,
            ..Self::default()
        }
    }

    /// Attribute the upload to a tenant.
    pub fn tenant_id(mut self, tenant_id: impl Into<String>) -> Self {
        self.tenant_id = tenant_id.into();
        self
    }

    /// Attribute the upload to a user.
    pub fn user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = user_id.into();
        self
    }
}

/// Where and how to PUT the content of a two-step upload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadTicket {
    /// Upload identifier, used to complete the upload
    #[serde(default)]
    pub upload_id: String,

    /// Pre-signed destination
    #[serde(default)]
    pub upload_url: String,

    /// HTTP method to use, normally `PUT`
    #[serde(default)]
    pub method: String,

    /// Headers the PUT must carry
    #[serde(default)]
    pub headers: HashMap<String, String>,

    /// When the URL stops working
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

/// Filters for [`Ingest::list_jobs`](crate::resources::Ingest::list_jobs).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ListJobsParams {
    /// Only jobs of this tenant
    #[serde(skip_serializing_if = "String::is_empty")]
    pub tenant_id: String,

    /// Only jobs of this user
    #[serde(skip_serializing_if = "String::is_empty")]
    pub user_id: String,

    /// Only jobs in this state
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<JobStatus>,

    /// Page size
    #[serde(skip_serializing_if = "is_zero")]
    pub limit: u32,

    /// Continuation token from a previous page
    #[serde(skip_serializing_if = "String::is_empty")]
    pub page_token: String,
}
