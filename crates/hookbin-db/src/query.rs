//! Windowed, optionally UID-scoped reads

use std::time::Duration;

use sea_orm::{ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder};
use tracing::debug;

use crate::entities::captured_request::{self, Column};
use crate::{retention, CapturedRequest, Storage, StoreError, RETENTION_HORIZON};

/// Serves window reads and runs the retention sweep ahead of each one
#[derive(Debug, Clone)]
pub struct QueryEngine {
    storage: Storage,
    horizon: Duration,
}

impl QueryEngine {
    pub fn new(storage: Storage) -> Self {
        Self::with_horizon(storage, RETENTION_HORIZON)
    }

    pub fn with_horizon(storage: Storage, horizon: Duration) -> Self {
        Self { storage, horizon }
    }

    pub fn horizon(&self) -> Duration {
        self.horizon
    }

    /// Run the retention sweep at this engine's horizon
    pub async fn expire(&self) -> Result<u64, StoreError> {
        retention::expire_older_than(&self.storage, self.horizon).await
    }

    /// Requests created in the last `minutes_ago` minutes, newest first
    ///
    /// With `uid`, only that tenant's requests are returned. Rows sharing a
    /// timestamp come back in descending id order.
    pub async fn query(
        &self,
        minutes_ago: u32,
        uid: Option<&str>,
    ) -> Result<Vec<CapturedRequest>, StoreError> {
        self.expire().await?;

        let since = Storage::now_millis() - i64::from(minutes_ago) * 60_000;

        let mut condition = Condition::all().add(Column::CreatedAt.gte(since));
        if let Some(uid) = uid {
            condition = condition.add(Column::Uid.eq(uid));
        }

        let requests = captured_request::Entity::find()
            .filter(condition)
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(self.storage.db())
            .await?;

        debug!(
            "Window query ({} min, uid={:?}) returned {} request(s)",
            minutes_ago,
            uid,
            requests.len()
        );

        Ok(requests)
    }
}
