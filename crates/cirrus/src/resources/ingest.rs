//! Content ingestion service

use std::path::Path;

use bytes::Bytes;
use http::Method;
use reqwest::multipart::{Form, Part};
use tokio::io::AsyncRead;
use tokio_util::io::ReaderStream;

use super::{Resource, presigned, segment, with_headers};
use crate::config::ClientConfig;
use crate::context::Context;
use crate::error::{Error, Result};
use crate::types::Page;
use crate::types::ingest::{
    CreateUploadRequest, IngestFileOptions, IngestJob, IngestTextRequest, ListJobsParams,
    UploadTicket,
};

/// Content ingestion API resource.
///
/// The preferred way in is the two-step upload: [`create_upload`] returns a
/// pre-signed URL, the content goes straight to the blob store with
/// [`put_upload`], and [`complete_upload`] starts processing. [`upload`] does
/// all three.
///
/// [`create_upload`]: Self::create_upload
/// [`put_upload`]: Self::put_upload
/// [`complete_upload`]: Self::complete_upload
/// [`upload`]: Self::upload
#[derive(Debug, Clone)]
pub struct Ingest {
    config: ClientConfig,
}

impl Ingest {
    pub(crate) fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    /// Ingest inline text.
    #[deprecated(note = "use `Ingest::upload` with the text as the file body")]
    #[tracing::instrument(skip_all, fields(tenant_id = %request.tenant_id, user_id = %request.user_id))]
    pub async fn ingest_text(&self, ctx: &Context, request: &IngestTextRequest) -> Result<IngestJob> {
        Ok(self
            .config
            .request(Method::POST, "/ingest/text")?
            .json(request)?
            .send(ctx)
            .await?
            .into_parsed_or_default())
    }

    /// Ingest a file through the API host as a multipart form.
    ///
    /// The form carries `tenantId` and `userId` text fields when they are
    /// non-empty, and always a `file` part streamed from `reader`.
    #[deprecated(note = "use `Ingest::upload`, which sends content straight to storage")]
    #[tracing::instrument(skip_all, fields(filename = %filename))]
    pub async fn ingest_file<R>(
        &self,
        ctx: &Context,
        filename: &str,
        reader: R,
        options: &IngestFileOptions,
    ) -> Result<IngestJob>
    where
        R: AsyncRead + Send + Sync + 'static,
    {
        let form = file_form(filename, reader, options)?;
        Ok(self
            .config
            .request(Method::POST, "/ingest/file")?
            .multipart(form)?
            .send(ctx)
            .await?
            .into_parsed_or_default())
    }

    /// Register an upload and get its pre-signed destination.
    ///
    /// Oversized files are refused with the server code `file_too_large`.
    #[tracing::instrument(skip_all, fields(filename = %request.filename, size = request.size_bytes))]
    pub async fn create_upload(
        &self,
        ctx: &Context,
        request: &CreateUploadRequest,
    ) -> Result<UploadTicket> {
        Ok(self
            .config
            .request(Method::POST, "/ingest/uploads")?
            .json(request)?
            .send(ctx)
            .await?
            .into_parsed_or_default())
    }

    /// Send the content to the ticket's pre-signed URL.
    ///
    /// Goes through the upload transport without `Authorization`.
    #[tracing::instrument(skip_all, fields(upload_id = %ticket.upload_id, size = body.len()))]
    pub async fn put_upload(
        &self,
        ctx: &Context,
        ticket: &UploadTicket,
        content_type: &str,
        body: Bytes,
    ) -> Result<()> {
        let builder = presigned(&self.config, Method::PUT, &ticket.method, &ticket.upload_url)?
            .bytes(content_type, body)?;
        with_headers(builder, &ticket.headers)?
            .send_empty(ctx)
            .await?;
        Ok(())
    }

    /// Tell the service the content is in place and start processing.
    #[tracing::instrument(skip_all, fields(upload_id = %upload_id))]
    pub async fn complete_upload(&self, ctx: &Context, upload_id: &str) -> Result<IngestJob> {
        Ok(self
            .config
            .request(
                Method::POST,
                &format!("/ingest/uploads/{}/complete", segment(upload_id)),
            )?
            .send(ctx)
            .await?
            .into_parsed_or_default())
    }

    /// Two-step upload of in-memory content.
    ///
    /// `request.size_bytes` is set from `body`. Stops at the first failing
    /// step; nothing is retried.
    #[tracing::instrument(skip_all, fields(filename = %request.filename, size = body.len()))]
    pub async fn upload(
        &self,
        ctx: &Context,
        mut request: CreateUploadRequest,
        body: Bytes,
    ) -> Result<IngestJob> {
        request.size_bytes = body.len() as u64;
        let ticket = self.create_upload(ctx, &request).await?;
        self.put_upload(ctx, &ticket, &request.content_type, body)
            .await?;
        self.complete_upload(ctx, &ticket.upload_id).await
    }

    /// Two-step upload of a local file.
    ///
    /// The file name sent to the service is the last component of `path`.
    #[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub async fn upload_path(
        &self,
        ctx: &Context,
        path: impl AsRef<Path>,
        content_type: &str,
        options: &IngestFileOptions,
    ) -> Result<IngestJob> {
        let path = path.as_ref();
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let body = tokio::fs::read(path).await?;

        let request = CreateUploadRequest::new(filename, content_type, body.len() as u64)
            .tenant_id(options.tenant_id.as_str())
            .user_id(options.user_id.as_str());
        self.upload(ctx, request, Bytes::from(body)).await
    }

    /// State of one job.
    #[tracing::instrument(skip_all, fields(job_id = %id))]
    pub async fn job(&self, ctx: &Context, id: &str) -> Result<IngestJob> {
        Ok(self
            .config
            .request(Method::GET, &format!("/ingest/jobs/{}", segment(id)))?
            .send(ctx)
            .await?
            .into_parsed_or_default())
    }

    /// List jobs, one page at a time.
    #[tracing::instrument(skip_all, fields(tenant_id = %params.tenant_id, user_id = %params.user_id))]
    pub async fn list_jobs(&self, ctx: &Context, params: &ListJobsParams) -> Result<Page<IngestJob>> {
        Ok(self
            .config
            .request(Method::GET, "/ingest/jobs")?
            .query(params)?
            .send(ctx)
            .await?
            .into_parsed_or_default())
    }
}

impl Resource for Ingest {
    fn config(&self) -> &ClientConfig {
        &self.config
    }
}

fn file_form<R>(filename: &str, reader: R, options: &IngestFileOptions) -> Result<Form>
where
    R: AsyncRead + Send + Sync + 'static,
{
    let mut form = Form::new();
    if !options.tenant_id.is_empty() {
        form = form.text("tenantId", options.tenant_id.clone());
    }
    if !options.user_id.is_empty() {
        form = form.text("userId", options.user_id.clone());
    }

    let body = reqwest::Body::wrap_stream(ReaderStream::new(reader));
    let mut file = Part::stream(body).file_name(filename.to_string());
    if !options.content_type.is_empty() {
        file = file
            .mime_str(&options.content_type)
            .map_err(|e| Error::InvalidHeader(format!("invalid content type {:?}: {e}", options.content_type)))?;
    }

    Ok(form.part("file", file))
}
