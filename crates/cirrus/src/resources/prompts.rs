//! Prompt catalog

use std::collections::{BTreeMap, HashSet};

use http::Method;

use super::{Resource, segment};
use crate::config::ClientConfig;
use crate::context::Context;
use crate::error::Result;
use crate::types::Page;
use crate::types::prompts::{
    CreatePromptRequest, ListPromptsParams, Prompt, RenderRequest, RenderedPrompt,
    UpdatePromptRequest,
};

/// Prompt catalog API resource.
#[derive(Debug, Clone)]
pub struct Prompts {
    config: ClientConfig,
}

impl Prompts {
    pub(crate) fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    /// List prompts, one page at a time.
    #[tracing::instrument(skip_all, fields(category = %params.category, tag = %params.tag))]
    pub async fn list(&self, ctx: &Context, params: &ListPromptsParams) -> Result<Page<Prompt>> {
        Ok(self
            .config
            .request(Method::GET, "/prompts")?
            .query(params)?
            .send(ctx)
            .await?
            .into_parsed_or_default())
    }

    /// List every prompt matching `params`, following continuation tokens.
    ///
    /// `params.page_token` is the starting point; stops at the first page
    /// without a token, or with a warning when the server hands back a token
    /// it already sent. Any page failing fails the whole call.
    #[tracing::instrument(skip_all)]
    pub async fn list_all(&self, ctx: &Context, params: &ListPromptsParams) -> Result<Vec<Prompt>> {
        let mut params = params.clone();
        let mut seen = HashSet::new();
        if !params.page_token.is_empty() {
            seen.insert(params.page_token.clone());
        }
        let mut prompts = Vec::new();
        loop {
            let page = self.list(ctx, &params).await?;
            let next = page.next_token().map(str::to_owned);
            prompts.extend(page.items);
            match next {
                Some(token) if !seen.insert(token.clone()) => {
                    tracing::warn!(page_token = %token, "continuation token repeated, stopping");
                    break;
                }
                Some(token) => params.page_token = token,
                None => break,
            }
        }
        tracing::debug!(count = prompts.len(), "listed all prompts");
        Ok(prompts)
    }

    /// Latest version of a prompt.
    #[tracing::instrument(skip_all, fields(prompt_id = %id))]
    pub async fn get(&self, ctx: &Context, id: &str) -> Result<Prompt> {
        Ok(self
            .config
            .request(Method::GET, &format!("/prompts/{}", segment(id)))?
            .send(ctx)
            .await?
            .into_parsed_or_default())
    }

    /// A specific version of a prompt.
    #[tracing::instrument(skip_all, fields(prompt_id = %id, version = version))]
    pub async fn get_version(&self, ctx: &Context, id: &str, version: u32) -> Result<Prompt> {
        Ok(self
            .config
            .request(
                Method::GET,
                &format!("/prompts/{}/versions/{version}", segment(id)),
            )?
            .send(ctx)
            .await?
            .into_parsed_or_default())
    }

    /// Create a prompt.
    #[tracing::instrument(skip_all, fields(name = %request.name))]
    pub async fn create(&self, ctx: &Context, request: &CreatePromptRequest) -> Result<Prompt> {
        Ok(self
            .config
            .request(Method::POST, "/prompts")?
            .json(request)?
            .send(ctx)
            .await?
            .into_parsed_or_default())
    }

    /// Change some fields of a prompt.
    #[tracing::instrument(skip_all, fields(prompt_id = %id))]
    pub async fn update(
        &self,
        ctx: &Context,
        id: &str,
        request: &UpdatePromptRequest,
    ) -> Result<Prompt> {
        Ok(self
            .config
            .request(Method::PATCH, &format!("/prompts/{}", segment(id)))?
            .json(request)?
            .send(ctx)
            .await?
            .into_parsed_or_default())
    }

    /// Delete a prompt and all its versions.
    #[tracing::instrument(skip_all, fields(prompt_id = %id))]
    pub async fn delete(&self, ctx: &Context, id: &str) -> Result<()> {
        self.config
            .request(Method::DELETE, &format!("/prompts/{}", segment(id)))?
            .send_empty(ctx)
            .await?;
        Ok(())
    }

    /// Render the latest version with `variables`.
    #[tracing::instrument(skip_all, fields(prompt_id = %id, variables = variables.len()))]
    pub async fn render(
        &self,
        ctx: &Context,
        id: &str,
        variables: &BTreeMap<String, String>,
    ) -> Result<RenderedPrompt> {
        Ok(self
            .config
            .request(Method::POST, &format!("/prompts/{}/render", segment(id)))?
            .json(&RenderRequest { variables })?
            .send(ctx)
            .await?
            .into_parsed_or_default())
    }
}

impl Resource for Prompts {
    fn config(&self) -> &ClientConfig {
        &self.config
    }
}
