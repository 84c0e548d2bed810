use deadpool_postgres::Pool;
use log::info;

use crate::errors::ApiError;

const INIT: &str = include_str!("../../migrations/0001_init.sql");

/// Applies the DDL. Every statement is idempotent, so this runs on each boot.
pub async fn migrate(pool: &Pool) -> Result<(), ApiError> {
    let client = pool.get().await?;
    client.batch_execute(INIT).await?;
    info!("database schema is up to date");
    Ok(())
}
