//! Prompt catalog records

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::page::is_zero;

/// A versioned prompt template.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Prompt {
    /// Prompt identifier
    #[serde(default)]
    pub id: String,

    /// Display name
    #[serde(default)]
    pub name: String,

    /// Free-form description
    #[serde(default)]
    pub description: String,

    /// Category used for filtering
    #[serde(default)]
    pub category: String,

    /// Tags used for filtering
    #[serde(default)]
    pub tags: Vec<String>,

    /// Template text with `{{variable}}` placeholders
    #[serde(default)]
    pub template: String,

    /// Declared template variables
    #[serde(default)]
    pub variables: Vec<String>,

    /// Version number, starting at 1
    #[serde(default)]
    pub version: u32,

    /// Creation time
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    /// Last update time
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Filters for [`Prompts::list`](crate::resources::Prompts::list).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ListPromptsParams {
    /// Only prompts in this category
    #[serde(skip_serializing_if = "String::is_empty")]
    pub category: String,

    /// Only prompts carrying this tag
    #[serde(skip_serializing_if = "String::is_empty")]
    pub tag: String,

    /// Full-text search
    #[serde(skip_serializing_if = "String::is_empty")]
    pub search: String,

    /// Page size
    #[serde(skip_serializing_if = "is_zero")]
    pub limit: u32,

    /// Continuation token from a previous page
    #[serde(skip_serializing_if = "String::is_empty")]
    pub page_token: String,
}

/// Create a prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePromptRequest {
    /// Display name
    pub name: String,

    /// Template text
    pub template: String,

    /// Free-form description
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    /// Category
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub category: String,

    /// Tags
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    /// Declared template variables
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub variables: Vec<String>,
}

/// Partial update of a prompt. Only fields that are `Some` are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatePromptRequest {
    /// New display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// New template text; the server bumps the version
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,

    /// New description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// New category
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Replacement tag list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,

    /// Replacement variable list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variables: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub(crate) struct RenderRequest<'a> {
    pub variables: &'a BTreeMap<String, String>,
}

/// A template rendered with concrete variables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedPrompt {
    /// Source prompt
    #[serde(default)]
    pub prompt_id: String,

    /// Version that was rendered
    #[serde(default)]
    pub version: u32,

    /// Rendered text
    #[serde(default)]
    pub text: String,
}
