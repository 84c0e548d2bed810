use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Body of `POST /api/posts` and `PUT /api/posts/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostInput {
    pub title: String,
    pub content: String,
    pub user_id: Uuid,
}
