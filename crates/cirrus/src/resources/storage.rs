//! Object storage URL brokerage

use bytes::Bytes;
use http::Method;

use super::{Resource, presigned, with_headers};
use crate::config::ClientConfig;
use crate::context::Context;
use crate::error::Result;
use crate::types::Page;
use crate::types::storage::{KeyQuery, ListObjectsParams, PresignRequest, PresignedUrl, StoredObject};

/// Object storage API resource.
///
/// The service never proxies object content. It hands out pre-signed URLs,
/// and [`put_object`](Self::put_object) / [`get_object`](Self::get_object)
/// talk to the blob store directly through the upload transport.
#[derive(Debug, Clone)]
pub struct Storage {
    config: ClientConfig,
}

impl Storage {
    pub(crate) fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    /// Get a URL to upload an object to.
    #[tracing::instrument(skip_all, fields(key = %request.key))]
    pub async fn upload_url(&self, ctx: &Context, request: &PresignRequest) -> Result<PresignedUrl> {
        Ok(self
            .config
            .request(Method::POST, "/storage/upload-url")?
            .json(request)?
            .send(ctx)
            .await?
            .into_parsed_or_default())
    }

    /// Get a URL to download an object from.
    #[tracing::instrument(skip_all, fields(key = %request.key))]
    pub async fn download_url(
        &self,
        ctx: &Context,
        request: &PresignRequest,
    ) -> Result<PresignedUrl> {
        Ok(self
            .config
            .request(Method::POST, "/storage/download-url")?
            .json(request)?
            .send(ctx)
            .await?
            .into_parsed_or_default())
    }

    /// List objects, one page at a time.
    #[tracing::instrument(skip_all, fields(prefix = %params.prefix))]
    pub async fn list_objects(
        &self,
        ctx: &Context,
        params: &ListObjectsParams,
    ) -> Result<Page<StoredObject>> {
        Ok(self
            .config
            .request(Method::GET, "/storage/objects")?
            .query(params)?
            .send(ctx)
            .await?
            .into_parsed_or_default())
    }

    /// Metadata of one object.
    #[tracing::instrument(skip_all, fields(key = %key))]
    pub async fn object(&self, ctx: &Context, key: &str) -> Result<StoredObject> {
        Ok(self
            .config
            .request(Method::GET, "/storage/object")?
            .query(&KeyQuery { key })?
            .send(ctx)
            .await?
            .into_parsed_or_default())
    }

    /// Delete an object.
    #[tracing::instrument(skip_all, fields(key = %key))]
    pub async fn delete_object(&self, ctx: &Context, key: &str) -> Result<()> {
        self.config
            .request(Method::DELETE, "/storage/object")?
            .query(&KeyQuery { key })?
            .send_empty(ctx)
            .await?;
        Ok(())
    }

    /// Upload `body` to a pre-signed URL.
    ///
    /// Headers from `target` are sent verbatim and win over `content_type`.
    #[tracing::instrument(skip_all, fields(size = body.len()))]
    pub async fn put_object(
        &self,
        ctx: &Context,
        target: &PresignedUrl,
        content_type: &str,
        body: Bytes,
    ) -> Result<()> {
        let builder = presigned(&self.config, Method::PUT, &target.method, &target.url)?
            .bytes(content_type, body)?;
        with_headers(builder, &target.headers)?.send_empty(ctx).await?;
        Ok(())
    }

    /// Download the content behind a pre-signed URL.
    #[tracing::instrument(skip_all)]
    pub async fn get_object(&self, ctx: &Context, source: &PresignedUrl) -> Result<Bytes> {
        let builder = presigned(&self.config, Method::GET, &source.method, &source.url)?;
        Ok(with_headers(builder, &source.headers)?
            .send_bytes(ctx)
            .await?
            .into_parsed_or_default())
    }
}

impl Resource for Storage {
    fn config(&self) -> &ClientConfig {
        &self.config
    }
}
