use tokio_postgres::types::ToSql;
use tokio_postgres::{Error, Row};

use crate::dtos::UserInput;
use crate::models::User;
use crate::repositories::entity_repository::Entity;

impl Entity for User {
    type Input = UserInput;

    const TABLE: &'static str = "users";
    const FIELDS: &'static str = "id, name, email, created_at, updated_at";
    const WRITABLE: &'static [&'static str] = &["name", "email"];

    fn from_row(row: &Row) -> Result<Self, Error> {
        Ok(User {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn params(input: &UserInput) -> Vec<&(dyn ToSql + Sync)> {
        vec![&input.name, &input.email]
    }
}
