//! Shared request execution pipeline
//!
//! Every SDK call ends up here. One call is one linear pass:
//!
//! ```text
//! dispatch -> read body -> classify -> decode success | map error
//! ```
//!
//! There are no retries and no fallback endpoints. The outcome is either a
//! [`RawResponse`] or exactly one [`ApiError`]; the body is read at most once
//! and the response entity is released before returning on every path.

use bytes::Bytes;
use cirrus_transport::{HttpRequest, RequestBody, Transport};
use serde::de::DeserializeOwned;

use super::response::RawResponse;
use crate::context::{Context, ContextError};
use crate::error::ApiError;
use crate::observability::{RequestMetadata, RequestTimer, ResponseMetadata};

/// Run `request` and decode a 2xx body into `T`.
///
/// An empty 2xx body yields `parsed == None`.
pub async fn execute<T: DeserializeOwned>(
    transport: &dyn Transport,
    ctx: &Context,
    request: HttpRequest,
) -> Result<RawResponse<T>, ApiError> {
    run(transport, ctx, request, decode_json::<T>).await
}

/// Run `request` without a success payload. A 2xx body is read and ignored.
pub async fn execute_empty(
    transport: &dyn Transport,
    ctx: &Context,
    request: HttpRequest,
) -> Result<RawResponse<()>, ApiError> {
    run(transport, ctx, request, |_| Ok(None)).await
}

/// Run `request` and hand back the raw 2xx body.
pub async fn execute_bytes(
    transport: &dyn Transport,
    ctx: &Context,
    request: HttpRequest,
) -> Result<RawResponse<Bytes>, ApiError> {
    run(transport, ctx, request, |body| Ok(Some(body))).await
}

fn decode_json<T: DeserializeOwned>(body: Bytes) -> Result<Option<T>, ApiError> {
    if body.is_empty() {
        return Ok(None);
    }
    serde_json::from_slice(&body).map(Some).map_err(ApiError::parse)
}

async fn run<T, D>(
    transport: &dyn Transport,
    ctx: &Context,
    request: HttpRequest,
    decode: D,
) -> Result<RawResponse<T>, ApiError>
where
    D: FnOnce(Bytes) -> Result<Option<T>, ApiError>,
{
    let metadata = RequestMetadata::new(request.method.as_str(), &request.url)
        .with_body_size(request.body.as_ref().and_then(RequestBody::len));
    metadata.log_request();
    let timer = RequestTimer::start();

    let fail = |status: Option<u16>, err: ApiError| {
        ResponseMetadata::new(status, timer.elapsed()).log_error(&metadata, &err);
        err
    };

    let response = match ctx.run(transport.send(request)).await {
        Ok(Ok(response)) => response,
        Ok(Err(err)) => return Err(fail(None, ApiError::from_transport(&err))),
        Err(err) => return Err(fail(None, ApiError::from_context(err))),
    };

    let status = response.status();
    let headers = response.headers().clone();

    // `bytes` consumes the response; the entity is gone after this point.
    let body = match ctx.run(response.bytes()).await {
        Ok(Ok(body)) => body,
        Ok(Err(err)) => {
            return Err(fail(Some(status.as_u16()), ApiError::from_read_failure(&err)));
        }
        Err(ContextError::DeadlineExceeded) => {
            return Err(fail(Some(status.as_u16()), ApiError::timeout()));
        }
        Err(err @ ContextError::Cancelled) => {
            return Err(fail(Some(status.as_u16()), ApiError::read(err)));
        }
    };

    let outcome = ResponseMetadata::new(Some(status.as_u16()), timer.elapsed())
        .with_body_size(body.len());

    if !status.is_success() {
        let err = ApiError::from_response(status, &body);
        outcome.log_error(&metadata, &err);
        return Err(err);
    }

    match decode(body) {
        Ok(parsed) => {
            outcome.log_success(&metadata);
            Ok(RawResponse::new(parsed, status, headers, outcome.elapsed))
        }
        Err(err) => {
            outcome.log_error(&metadata, &err);
            Err(err)
        }
    }
}
