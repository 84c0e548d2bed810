use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse};
use serde_json::{Value, json};

use crate::errors::error_body;
use crate::handlers::dispatch::{HandlerResult, QueryParams};
use crate::middleware::{PathParams, RequestContext};

/// GET /health
pub async fn health(
    _ctx: RequestContext,
    _params: PathParams,
    _query: QueryParams,
) -> HandlerResult<Value> {
    Ok(Some(json!({ "Status": "OK" })))
}

pub async fn not_found() -> HttpResponse {
    error_body(
        StatusCode::NOT_FOUND,
        "the requested resource could not be found",
    )
}

pub async fn method_not_allowed(req: HttpRequest) -> HttpResponse {
    error_body(
        StatusCode::METHOD_NOT_ALLOWED,
        format!("the {} method is not supported for this resource", req.method()),
    )
}
