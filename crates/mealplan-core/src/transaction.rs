use std::time::Duration;

use anyhow::{Context, Result};
use sqlx::{PgPool, Postgres, Transaction};
use tracing::warn;

use crate::failure::StoreFailure;
use crate::response::ServiceResponse;

/// How long a statement waits for a row lock before the operation is
/// reported as a write conflict.
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(5);

/// The pool a service was built with, plus the lock timeout applied to every
/// transaction it opens.
#[derive(Debug, Clone)]
pub(crate) struct TxScope {
    pool: PgPool,
    lock_timeout: Duration,
}

impl TxScope {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self {
            pool,
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
        }
    }

    pub(crate) fn set_lock_timeout(&mut self, lock_timeout: Duration) {
        self.lock_timeout = lock_timeout;
    }

    pub(crate) fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Open a transaction with `lock_timeout` set for its duration.
    ///
    /// Dropping the returned transaction without committing rolls it back.
    pub(crate) async fn begin(&self) -> Result<Transaction<'static, Postgres>> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("failed to begin transaction")?;

        // SET does not accept bind parameters; the value is an integer.
        let stmt = format!("SET LOCAL lock_timeout = {}", self.lock_timeout.as_millis().max(1));
        sqlx::query(&stmt)
            .execute(&mut *tx)
            .await
            .context("failed to set lock timeout")?;

        Ok(tx)
    }

    /// Open a read-only transaction in which every statement sees the same
    /// snapshot, taken at its first query.
    pub(crate) async fn snapshot(&self) -> Result<Transaction<'static, Postgres>> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("failed to begin transaction")?;

        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await
            .context("failed to set snapshot isolation")?;

        Ok(tx)
    }
}

/// Turn a write conflict into an [`ServiceStatus::Error`] response carrying
/// `message`. Every other failure is returned unchanged.
///
/// [`ServiceStatus::Error`]: crate::response::ServiceStatus::Error
pub(crate) fn report_conflict(
    result: Result<ServiceResponse>,
    message: &str,
) -> Result<ServiceResponse> {
    let err = match result {
        Ok(response) => return Ok(response),
        Err(err) => err,
    };
    match StoreFailure::classify(&err) {
        Some(failure) if failure.is_conflict() => {
            warn!(%failure, error = %format!("{err:#}"), "{message}");
            Ok(ServiceResponse::error(message))
        }
        _ => Err(err),
    }
}
