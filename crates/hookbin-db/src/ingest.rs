//! Ingest writer: appends captured requests

use sea_orm::{ActiveModelTrait, ActiveValue::NotSet, Set};
use tracing::debug;

use crate::entities::captured_request;
use crate::{Storage, StoreError, Uid};

/// A captured request before the store stamps it with an id and timestamp
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCapturedRequest {
    pub uid: Option<Uid>,
    pub method: String,
    pub url: String,
    /// Serialized header list, stored as-is
    pub headers: String,
    pub body: Option<String>,
    pub query: Option<String>,
    pub ip: Option<String>,
}

#[derive(Debug, Clone)]
pub struct IngestWriter {
    storage: Storage,
}

impl IngestWriter {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    /// Persist one request and return its store-assigned id
    ///
    /// Either the whole row is written or nothing is. Failures are returned
    /// once, without retrying.
    pub async fn record(&self, request: NewCapturedRequest) -> Result<i32, StoreError> {
        let mut last_stamp = self.storage.lock_writes().await;

        // Never hand out a timestamp older than the previous one, even if the
        // wall clock stepped backwards.
        let created_at = Storage::now_millis().max(*last_stamp);

        let row = captured_request::ActiveModel {
            id: NotSet,
            uid: Set(request.uid.map(Uid::into_inner)),
            method: Set(request.method),
            url: Set(request.url),
            headers: Set(request.headers),
            body: Set(request.body),
            query: Set(request.query),
            ip: Set(request.ip),
            created_at: Set(created_at),
        };

        let inserted = row.insert(self.storage.db()).await?;
        *last_stamp = created_at;

        debug!(
            "Recorded request {} ({} {}, uid={:?})",
            inserted.id, inserted.method, inserted.url, inserted.uid
        );

        Ok(inserted.id)
    }
}
