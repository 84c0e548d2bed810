use std::any::Any;
use std::panic::AssertUnwindSafe;

use actix_web::Error;
use actix_web::body::MessageBody;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::middleware::Next;
use futures::FutureExt;
use log::error;

use crate::errors::ApiError;

/// Turns a panic anywhere below this middleware into a 500 for that request.
/// The worker keeps serving.
///
/// Routed endpoints already recover inside the dispatcher; this catches what
/// is left (extractors, plain actix handlers). The request must not be cloned
/// here: the router needs sole ownership of it to record the match.
pub async fn recover_panic<B: MessageBody + 'static>(
    req: ServiceRequest,
    next: Next<B>,
) -> Result<ServiceResponse<B>, Error> {
    let method = req.method().clone();
    let path = req.path().to_string();

    // `next.call` starts routing synchronously, so it runs inside the guard.
    match AssertUnwindSafe(async move { next.call(req).await })
        .catch_unwind()
        .await
    {
        Ok(res) => res,
        Err(payload) => {
            error!("panic while serving {} {}: {}", method, path, panic_message(&*payload));
            Err(ApiError::internal("request handler panicked").into())
        }
    }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "non-string panic payload"
    }
}
