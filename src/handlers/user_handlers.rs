use actix_web::web;

use crate::dtos::{UserInput, parse_json};
use crate::handlers::dispatch::{HandlerResult, QueryParams};
use crate::middleware::{PathParams, RequestContext};
use crate::models::User;
use crate::repositories::entity_repository as store;
use crate::services::{TxOptions, run_in_transaction};

/// GET /api/users
pub async fn list_users(
    ctx: RequestContext,
    _params: PathParams,
    _query: QueryParams,
) -> HandlerResult<Vec<User>> {
    let users = run_in_transaction(ctx.pool(), TxOptions::read_only(), |tx| {
        Box::pin(async move { store::get_all::<User>(tx).await })
    })
    .await?;
    Ok(Some(users))
}

/// GET /api/users/{id}
pub async fn get_user(
    ctx: RequestContext,
    params: PathParams,
    _query: QueryParams,
) -> HandlerResult<User> {
    let id = params.uuid("id")?;
    run_in_transaction(ctx.pool(), TxOptions::read_only(), move |tx| {
        Box::pin(async move { store::get_by_id::<User>(tx, id).await })
    })
    .await
}

/// POST /api/users
pub async fn create_user(
    ctx: RequestContext,
    _params: PathParams,
    body: web::Bytes,
) -> HandlerResult<User> {
    let input: UserInput = parse_json(&body)?;
    let user = run_in_transaction(ctx.pool(), TxOptions::read_write(), move |tx| {
        Box::pin(async move { store::create::<User>(tx, &input).await })
    })
    .await?;
    Ok(Some(user))
}

/// PUT /api/users/{id}
pub async fn update_user(
    ctx: RequestContext,
    params: PathParams,
    body: web::Bytes,
) -> HandlerResult<User> {
    let input: UserInput = parse_json(&body)?;
    let id = params.uuid("id")?;
    run_in_transaction(ctx.pool(), TxOptions::read_write(), move |tx| {
        Box::pin(async move { store::update::<User>(tx, id, &input).await })
    })
    .await
}

/// DELETE /api/users/{id}. The user's posts go with it (FK cascade).
pub async fn delete_user(
    ctx: RequestContext,
    params: PathParams,
    _query: QueryParams,
) -> HandlerResult<User> {
    let id = params.uuid("id")?;
    run_in_transaction(ctx.pool(), TxOptions::read_write(), move |tx| {
        Box::pin(async move { store::delete::<User>(tx, id).await })
    })
    .await
}
