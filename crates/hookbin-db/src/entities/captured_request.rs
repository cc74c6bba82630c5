//! CapturedRequest entity: one row per inbound webhook

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "captured_requests")]
pub struct Model {
    /// Store-assigned, strictly increasing, never reused
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Tenant scope; `None` for captures on the tenant-agnostic path
    pub uid: Option<String>,

    pub method: String,

    #[sea_orm(column_type = "Text")]
    pub url: String,

    /// JSON-encoded headers: Vec<(String, String)>, grouped by name in first-seen name order, duplicates kept
    #[sea_orm(column_type = "Text")]
    pub headers: String,

    /// `None` when the request carried no body, `Some("")` for an empty one
    #[sea_orm(column_type = "Text", nullable)]
    pub body: Option<String>,

    /// Raw query string, not decoded
    #[sea_orm(column_type = "Text", nullable)]
    pub query: Option<String>,

    pub ip: Option<String>,

    /// Milliseconds since the Unix epoch
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
