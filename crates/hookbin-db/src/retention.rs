//! Retention sweep
//!
//! Rows older than the horizon are deleted in a single statement, so a reader
//! sees each row either whole or not at all.

use std::time::Duration;

use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::entities::captured_request::{self, Column};
use crate::{Storage, StoreError};

/// Captured requests are kept for 24 hours
pub const RETENTION_HORIZON: Duration = Duration::from_secs(24 * 60 * 60);

/// Delete every row with `created_at < now - horizon`
///
/// Returns the number of rows removed; 0 when there was nothing to do.
pub async fn expire_older_than(storage: &Storage, horizon: Duration) -> Result<u64, StoreError> {
    let _guard = storage.lock_writes().await;

    let horizon_ms = i64::try_from(horizon.as_millis()).unwrap_or(i64::MAX);
    let cutoff = Storage::now_millis().saturating_sub(horizon_ms);

    let result = captured_request::Entity::delete_many()
        .filter(Column::CreatedAt.lt(cutoff))
        .exec(storage.db())
        .await?;

    if result.rows_affected > 0 {
        info!(
            "Retention sweep removed {} request(s) older than {}s",
            result.rows_affected,
            horizon.as_secs()
        );
    }

    Ok(result.rows_affected)
}

/// Sweep on a fixed interval in addition to the opportunistic sweeps
///
/// Bounds how long an expired row can linger when no traffic arrives. Errors
/// are logged and the task keeps going.
pub fn spawn_periodic_sweep(
    storage: Storage,
    horizon: Duration,
    interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            if let Err(e) = expire_older_than(&storage, horizon).await {
                warn!("Periodic retention sweep failed: {}", e);
            }
        }
    })
}
