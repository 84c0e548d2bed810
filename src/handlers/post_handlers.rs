// Posts CRUD; writes go through the user check.
use actix_web::web;

use crate::dtos::{PostInput, parse_json};
use crate::handlers::dispatch::{HandlerResult, QueryParams};
use crate::middleware::{PathParams, RequestContext};
use crate::models::Post;
use crate::repositories::entity_repository as store;
use crate::services::post_services;
use crate::services::{TxOptions, run_in_transaction};

/// GET /api/posts
pub async fn list_posts(
    ctx: RequestContext,
    _params: PathParams,
    _query: QueryParams,
) -> HandlerResult<Vec<Post>> {
    let posts = run_in_transaction(ctx.pool(), TxOptions::read_only(), |tx| {
        Box::pin(async move { store::get_all::<Post>(tx).await })
    })
    .await?;
    Ok(Some(posts))
}

/// GET /api/posts/{id}
pub async fn get_post(
    ctx: RequestContext,
    params: PathParams,
    _query: QueryParams,
) -> HandlerResult<Post> {
    let id = params.uuid("id")?;
    run_in_transaction(ctx.pool(), TxOptions::read_only(), move |tx| {
        Box::pin(async move { store::get_by_id::<Post>(tx, id).await })
    })
    .await
}

/// POST /api/posts. 400 when `user_id` names no user.
pub async fn create_post(
    ctx: RequestContext,
    _params: PathParams,
    body: web::Bytes,
) -> HandlerResult<Post> {
    let input: PostInput = parse_json(&body)?;
    let post = run_in_transaction(ctx.pool(), TxOptions::read_write(), move |tx| {
        Box::pin(async move { post_services::create_post(tx, &input).await })
    })
    .await?;
    Ok(Some(post))
}

/// PUT /api/posts/{id}
pub async fn update_post(
    ctx: RequestContext,
    params: PathParams,
    body: web::Bytes,
) -> HandlerResult<Post> {
    let input: PostInput = parse_json(&body)?;
    let id = params.uuid("id")?;
    run_in_transaction(ctx.pool(), TxOptions::read_write(), move |tx| {
        Box::pin(async move { post_services::update_post(tx, id, &input).await })
    })
    .await
}

/// DELETE /api/posts/{id}
pub async fn delete_post(
    ctx: RequestContext,
    params: PathParams,
    _query: QueryParams,
) -> HandlerResult<Post> {
    let id = params.uuid("id")?;
    run_in_transaction(ctx.pool(), TxOptions::read_write(), move |tx| {
        Box::pin(async move { store::delete::<Post>(tx, id).await })
    })
    .await
}
