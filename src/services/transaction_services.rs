// One unit of work, one transaction.
use deadpool_postgres::{Pool, Transaction};
use futures::future::LocalBoxFuture;
use log::{debug, warn};
use tokio_postgres::IsolationLevel;

use crate::errors::ApiError;

/// Options passed to `BEGIN`. The default leaves isolation to the server.
#[derive(Debug, Clone, Copy, Default)]
pub struct TxOptions {
    pub isolation_level: Option<IsolationLevel>,
    pub read_only: bool,
}

impl TxOptions {
    pub fn read_only() -> Self {
        Self {
            isolation_level: None,
            read_only: true,
        }
    }

    pub fn read_write() -> Self {
        Self::default()
    }

    pub fn with_isolation(mut self, level: IsolationLevel) -> Self {
        self.isolation_level = Some(level);
        self
    }
}

/// Runs `unit_of_work` inside a fresh transaction on a pooled connection.
///
/// Nothing the unit of work does is durable unless it returns `Ok` and the
/// commit succeeds. On `Err` the transaction is rolled back and the error is
/// returned unchanged, so classified errors reach the dispatcher intact.
///
/// If the returned future is dropped mid-flight, the transaction handle is
/// dropped with it and the driver rolls it back.
pub async fn run_in_transaction<T, F>(
    pool: &Pool,
    options: TxOptions,
    unit_of_work: F,
) -> Result<T, ApiError>
where
    F: for<'c> FnOnce(&'c Transaction<'_>) -> LocalBoxFuture<'c, Result<T, ApiError>>,
{
    let mut client = pool.get().await?;

    let mut builder = client.build_transaction().read_only(options.read_only);
    if let Some(level) = options.isolation_level {
        builder = builder.isolation_level(level);
    }
    let tx = builder.start().await?;

    match unit_of_work(&tx).await {
        Ok(value) => {
            tx.commit().await?;
            debug!("transaction committed");
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback().await {
                warn!("rollback failed after `{}`: {}", err, rollback_err);
            }
            Err(err)
        }
    }
}
