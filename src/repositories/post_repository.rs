use tokio_postgres::types::ToSql;
use tokio_postgres::{Error, Row};

use crate::dtos::PostInput;
use crate::models::Post;
use crate::repositories::entity_repository::Entity;

impl Entity for Post {
    type Input = PostInput;

    const TABLE: &'static str = "posts";
    const FIELDS: &'static str = "id, title, content, user_id, created_at, updated_at";
    const WRITABLE: &'static [&'static str] = &["title", "content", "user_id"];

    fn from_row(row: &Row) -> Result<Self, Error> {
        Ok(Post {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            content: row.try_get("content")?,
            user_id: row.try_get("user_id")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn params(input: &PostInput) -> Vec<&(dyn ToSql + Sync)> {
        vec![&input.title, &input.content, &input.user_id]
    }
}
