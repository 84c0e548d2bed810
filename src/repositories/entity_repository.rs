// One CRUD template shared by every table.
use deadpool_postgres::Transaction;
use log::debug;
use tokio_postgres::types::ToSql;
use tokio_postgres::{Error, Row};
use uuid::Uuid;

use crate::errors::ApiError;

/// A table the store can address. Implementors describe their projection and
/// writable columns; the SQL is derived from those.
pub trait Entity: Sized {
    /// Body accepted by create and update.
    type Input;

    const TABLE: &'static str;
    /// Full projection, in the order `from_row` reads it.
    const FIELDS: &'static str;
    /// Columns written by create/update, in the order `params` yields values.
    const WRITABLE: &'static [&'static str];

    fn from_row(row: &Row) -> Result<Self, Error>;

    fn params(input: &Self::Input) -> Vec<&(dyn ToSql + Sync)>;
}

pub fn select_by_id_sql<E: Entity>() -> String {
    format!("SELECT {} FROM {} WHERE id = $1", E::FIELDS, E::TABLE)
}

pub fn select_all_sql<E: Entity>() -> String {
    format!(
        "SELECT {} FROM {} ORDER BY created_at DESC",
        E::FIELDS,
        E::TABLE
    )
}

pub fn insert_sql<E: Entity>() -> String {
    let placeholders = (1..=E::WRITABLE.len())
        .map(|i| format!("${i}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
        E::TABLE,
        E::WRITABLE.join(", "),
        placeholders,
        E::FIELDS
    )
}

/// The id is always the last parameter.
pub fn update_sql<E: Entity>() -> String {
    let assignments = E::WRITABLE
        .iter()
        .enumerate()
        .map(|(i, col)| format!("{col} = ${}", i + 1))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "UPDATE {} SET {}, updated_at = now() WHERE id = ${} RETURNING {}",
        E::TABLE,
        assignments,
        E::WRITABLE.len() + 1,
        E::FIELDS
    )
}

pub fn delete_sql<E: Entity>() -> String {
    format!(
        "DELETE FROM {} WHERE id = $1 RETURNING {}",
        E::TABLE,
        E::FIELDS
    )
}

async fn fetch_opt<E: Entity>(
    tx: &Transaction<'_>,
    sql: &str,
    params: &[&(dyn ToSql + Sync)],
) -> Result<Option<E>, ApiError> {
    debug!("{}: {}", E::TABLE, sql);
    let stmt = tx.prepare_cached(sql).await?;
    match tx.query_opt(&stmt, params).await? {
        Some(row) => Ok(Some(E::from_row(&row)?)),
        None => Ok(None),
    }
}

/// `Ok(None)` when no row has this id.
pub async fn get_by_id<E: Entity>(tx: &Transaction<'_>, id: Uuid) -> Result<Option<E>, ApiError> {
    fetch_opt(tx, &select_by_id_sql::<E>(), &[&id]).await
}

/// Newest first; empty when the table is.
pub async fn get_all<E: Entity>(tx: &Transaction<'_>) -> Result<Vec<E>, ApiError> {
    let sql = select_all_sql::<E>();
    debug!("{}: {}", E::TABLE, sql);
    let stmt = tx.prepare_cached(&sql).await?;
    let rows = tx.query(&stmt, &[]).await?;
    let entities = rows.iter().map(E::from_row).collect::<Result<Vec<_>, _>>()?;
    Ok(entities)
}

/// Constraint violations come back as `ApiError::Database`.
pub async fn create<E: Entity>(tx: &Transaction<'_>, input: &E::Input) -> Result<E, ApiError> {
    let sql = insert_sql::<E>();
    debug!("{}: {}", E::TABLE, sql);
    let stmt = tx.prepare_cached(&sql).await?;
    let row = tx.query_one(&stmt, &E::params(input)).await?;
    Ok(E::from_row(&row)?)
}

pub async fn update<E: Entity>(
    tx: &Transaction<'_>,
    id: Uuid,
    input: &E::Input,
) -> Result<Option<E>, ApiError> {
    let mut params = E::params(input);
    params.push(&id);
    fetch_opt(tx, &update_sql::<E>(), &params).await
}

/// Returns the row as it was before removal.
pub async fn delete<E: Entity>(tx: &Transaction<'_>, id: Uuid) -> Result<Option<E>, ApiError> {
    fetch_opt(tx, &delete_sql::<E>(), &[&id]).await
}
