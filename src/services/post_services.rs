// Writes that must reference an existing user.
use deadpool_postgres::Transaction;
use uuid::Uuid;

use crate::dtos::PostInput;
use crate::errors::ApiError;
use crate::models::{Post, User};
use crate::repositories::entity_repository as store;

/// Checked inside the writing transaction so the answer can't go stale before
/// the insert/update lands.
pub async fn ensure_user_exists(tx: &Transaction<'_>, user_id: Uuid) -> Result<(), ApiError> {
    match store::get_by_id::<User>(tx, user_id).await? {
        Some(_) => Ok(()),
        None => Err(ApiError::bad_request("user does not exist")),
    }
}

pub async fn create_post(tx: &Transaction<'_>, input: &PostInput) -> Result<Post, ApiError> {
    ensure_user_exists(tx, input.user_id).await?;
    store::create::<Post>(tx, input).await
}

/// `Ok(None)` when the post itself is missing.
pub async fn update_post(
    tx: &Transaction<'_>,
    id: Uuid,
    input: &PostInput,
) -> Result<Option<Post>, ApiError> {
    ensure_user_exists(tx, input.user_id).await?;
    store::update::<Post>(tx, id, input).await
}
