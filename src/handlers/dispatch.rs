// Every endpoint is an async fn `(RequestContext, PathParams, I) -> HandlerResult<T>`.
// `handle_query` and `handle_mutation` wrap one into an actix route handler
// that races it against the request deadline and turns the outcome into a
// response. The endpoint future is polled in place, so cancelling drops it
// (and any open transaction) instead of leaving it running.
use std::collections::HashMap;
use std::future::Future;
use std::panic::AssertUnwindSafe;

use actix_web::http::StatusCode;
use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, ResponseError, web};
use futures::future::LocalBoxFuture;
use futures::{FutureExt, StreamExt};
use log::{error, warn};
use serde::Serialize;

use crate::errors::{ApiError, error_body};
use crate::middleware::recover_panic::panic_message;
use crate::middleware::{PathParams, RequestContext};

/// `Ok(None)` is the absence marker: the addressed row doesn't exist.
pub type HandlerResult<T> = Result<Option<T>, ApiError>;

/// Decoded query string of a read-style request.
pub type QueryParams = HashMap<String, String>;

/// An endpoint: (context, path params, input) to a tri-state result.
///
/// Implemented for every matching async fn, so endpoints are plain functions.
pub trait Handler<I>: Clone + 'static {
    type Output: Serialize;

    fn handle(
        &self,
        ctx: RequestContext,
        params: PathParams,
        input: I,
    ) -> LocalBoxFuture<'static, HandlerResult<Self::Output>>;
}

impl<F, Fut, I, T> Handler<I> for F
where
    F: Fn(RequestContext, PathParams, I) -> Fut + Clone + 'static,
    Fut: Future<Output = HandlerResult<T>> + 'static,
    T: Serialize,
{
    type Output = T;

    fn handle(
        &self,
        ctx: RequestContext,
        params: PathParams,
        input: I,
    ) -> LocalBoxFuture<'static, HandlerResult<T>> {
        Box::pin((self)(ctx, params, input))
    }
}

/// How one dispatched request ended.
#[derive(Debug)]
pub enum Outcome<T> {
    /// The request deadline passed first. The client is still connected, so
    /// it gets a 503; a client that hung up gets nothing, because actix drops
    /// the whole request future before an outcome exists.
    Cancelled,
    Failed(ApiError),
    Absent,
    Completed(T),
}

impl<T> From<HandlerResult<T>> for Outcome<T> {
    fn from(result: HandlerResult<T>) -> Self {
        match result {
            Ok(Some(value)) => Outcome::Completed(value),
            Ok(None) => Outcome::Absent,
            Err(err) => Outcome::Failed(err),
        }
    }
}

/// Polls `work` until it finishes or the context is cancelled, whichever is
/// first. The loser is dropped.
pub async fn race<T, W>(ctx: &RequestContext, work: W) -> Outcome<T>
where
    W: Future<Output = HandlerResult<T>>,
{
    tokio::select! {
        () = ctx.cancelled() => Outcome::Cancelled,
        result = work => Outcome::from(result),
    }
}

/// A panicking endpoint becomes an unclassified failure.
async fn guarded<T>(work: LocalBoxFuture<'static, HandlerResult<T>>) -> HandlerResult<T> {
    match AssertUnwindSafe(work).catch_unwind().await {
        Ok(result) => result,
        Err(payload) => Err(ApiError::internal(format!(
            "handler panicked: {}",
            panic_message(&*payload)
        ))),
    }
}

/// Maps an outcome to the response written to the client. `resource` names
/// the entity in the 404 message, e.g. "user does not exist".
pub fn respond<T: Serialize>(resource: &str, outcome: Outcome<T>) -> HttpResponse {
    match outcome {
        Outcome::Completed(value) => match serde_json::to_vec(&value) {
            Ok(body) => HttpResponse::Ok()
                .content_type(ContentType::json())
                .body(body),
            Err(e) => server_error(&ApiError::from(e)),
        },
        Outcome::Absent => error_body(StatusCode::NOT_FOUND, format!("{resource} does not exist")),
        Outcome::Failed(err) if err.is_classified() => err.error_response(),
        Outcome::Failed(err) => server_error(&err),
        Outcome::Cancelled => {
            warn!("{resource} request cancelled before the handler finished");
            error_body(StatusCode::SERVICE_UNAVAILABLE, "request cancelled")
        }
    }
}

fn server_error(err: &ApiError) -> HttpResponse {
    error!("{err}");
    err.error_response()
}

/// Reads the whole body, refusing anything over `limit` bytes. A body that
/// can't be read is the client's problem: 400 in the usual error envelope.
pub async fn read_body(mut payload: web::Payload, limit: usize) -> Result<web::Bytes, ApiError> {
    let mut body = web::BytesMut::new();
    while let Some(chunk) = payload.next().await {
        let chunk = chunk
            .map_err(|e| ApiError::bad_request(format!("failed to read request body: {e}")))?;
        if body.len() + chunk.len() > limit {
            return Err(ApiError::bad_request(format!(
                "request body exceeds {limit} bytes"
            )));
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body.freeze())
}

/// Route handler for requests whose input is the path and query string.
pub fn handle_query<H>(
    resource: &'static str,
    handler: H,
) -> impl Fn(RequestContext, PathParams, web::Query<QueryParams>) -> LocalBoxFuture<'static, HttpResponse>
       + Clone
       + 'static
where
    H: Handler<QueryParams>,
{
    move |ctx: RequestContext,
          params: PathParams,
          query: web::Query<QueryParams>|
          -> LocalBoxFuture<'static, HttpResponse> {
        let handler = handler.clone();
        Box::pin(async move {
            let work = guarded(handler.handle(ctx.clone(), params, query.into_inner()));
            respond(resource, race(&ctx, work).await)
        })
    }
}

/// Route handler for requests that carry a body. The body is read in full,
/// up to the configured limit, before the endpoint runs.
pub fn handle_mutation<H>(
    resource: &'static str,
    handler: H,
) -> impl Fn(RequestContext, PathParams, web::Payload) -> LocalBoxFuture<'static, HttpResponse>
       + Clone
       + 'static
where
    H: Handler<web::Bytes>,
{
    move |ctx: RequestContext,
          params: PathParams,
          payload: web::Payload|
          -> LocalBoxFuture<'static, HttpResponse> {
        let handler = handler.clone();
        Box::pin(async move {
            let work = async {
                let body = read_body(payload, ctx.body_limit()).await?;
                guarded(handler.handle(ctx.clone(), params, body)).await
            };
            respond(resource, race(&ctx, work).await)
        })
    }
}
