// Per-request handles given to every handler.
use std::collections::HashMap;

use actix_web::error::ErrorInternalServerError;
use actix_web::{Error, FromRequest, HttpRequest, dev::Payload, web};
use deadpool_postgres::Pool;
use futures::future::{Ready, ready};
use log::error;
use tokio::time::Instant;
use uuid::Uuid;

use crate::AppState;
use crate::config::DEFAULT_MAX_BODY_BYTES;
use crate::errors::ApiError;

/// What a handler gets to work with: the pool, the instant after which the
/// request counts as cancelled, and how large a body it may send.
#[derive(Clone)]
pub struct RequestContext {
    pool: Pool,
    deadline: Option<Instant>,
    body_limit: usize,
}

impl RequestContext {
    pub fn new(pool: Pool, deadline: Option<Instant>) -> Self {
        Self {
            pool,
            deadline,
            body_limit: DEFAULT_MAX_BODY_BYTES,
        }
    }

    pub fn with_body_limit(mut self, limit: usize) -> Self {
        self.body_limit = limit;
        self
    }

    pub fn body_limit(&self) -> usize {
        self.body_limit
    }

    pub fn pool(&self) -> &Pool {
        &self.pool
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Resolves once the deadline passes; never resolves without one.
    pub async fn cancelled(&self) {
        match self.deadline {
            Some(at) => tokio::time::sleep_until(at).await,
            None => std::future::pending::<()>().await,
        }
    }
}

impl FromRequest for RequestContext {
    type Error = Error;
    type Future = Ready<Result<RequestContext, Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = match req.app_data::<web::Data<AppState>>() {
            Some(state) => state,
            None => {
                error!("application state is not registered for {}", req.path());
                return ready(Err(ErrorInternalServerError("application state missing")));
            }
        };

        let deadline = state
            .config
            .request_timeout
            .map(|timeout| Instant::now() + timeout);

        ready(Ok(RequestContext::new(state.pg_pool.clone(), deadline)
            .with_body_limit(state.config.max_body_bytes)))
    }
}

/// Named segments of the matched route, e.g. `{id}` in `/api/users/{id}`.
#[derive(Debug, Clone, Default)]
pub struct PathParams(HashMap<String, String>);

impl PathParams {
    pub fn by_name(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Parses a segment as a UUID; a bad value is the caller's fault.
    pub fn uuid(&self, name: &str) -> Result<Uuid, ApiError> {
        let raw = self.by_name(name).unwrap_or_default();
        Uuid::parse_str(raw).map_err(|e| ApiError::bad_request(format!("invalid {name}: {e}")))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PathParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        PathParams(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl FromRequest for PathParams {
    type Error = Error;
    type Future = Ready<Result<PathParams, Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(req.match_info().iter().collect()))
    }
}
