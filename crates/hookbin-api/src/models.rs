use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Window used by `/api/logs` when `minutes` is missing or unusable
pub const DEFAULT_WINDOW_MINUTES: u32 = 30;

/// Successful capture
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CaptureResponse {
    /// Always `true`
    pub success: bool,
    pub message: String,
    /// Store-assigned request ID
    pub id: i32,
    /// Tenant UID, present for captures on `/api/webhook/{uid}`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
}

/// HTTP request captured by the store
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CapturedRequest {
    /// Unique request ID, increasing with insertion order
    pub id: i32,
    /// Tenant UID, if the request was captured on a scoped path
    pub uid: Option<String>,
    /// HTTP method as received
    pub method: String,
    /// Full request URL including query string
    pub url: String,
    /// Request headers grouped by name, names in first-seen order; repeated names are kept
    pub headers: Vec<(String, String)>,
    /// Request body; `null` when the request had none
    pub body: Option<String>,
    /// Raw query string
    pub query: Option<String>,
    /// Best-effort client address
    pub ip: Option<String>,
    /// Capture time in milliseconds since the Unix epoch
    pub created_at: i64,
}

impl From<hookbin_db::CapturedRequest> for CapturedRequest {
    fn from(req: hookbin_db::CapturedRequest) -> Self {
        let headers: Vec<(String, String)> = serde_json::from_str(&req.headers).unwrap_or_default();

        Self {
            id: req.id,
            uid: req.uid,
            method: req.method,
            url: req.url,
            headers,
            body: req.body,
            query: req.query,
            ip: req.ip,
            created_at: req.created_at,
        }
    }
}

/// Captured requests in a time window, newest first
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LogsResponse {
    /// Always `true`
    pub success: bool,
    pub data: Vec<CapturedRequest>,
    pub count: usize,
}

/// Query parameters for `/api/logs`
///
/// Kept as raw strings so that a malformed `minutes` falls back to the
/// default instead of rejecting the request.
#[derive(Debug, Clone, Default)]
pub struct LogsQuery {
    /// Lookback window in minutes (default: 30)
    pub minutes: Option<String>,
    /// Restrict results to this UID
    pub uid: Option<String>,
}

impl LogsQuery {
    /// Build from decoded query pairs; the first occurrence of a key wins
    /// and `minutesAgo` is read as `minutes`.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut query = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                "minutes" | "minutesAgo" if query.minutes.is_none() => {
                    query.minutes = Some(value)
                }
                "uid" if query.uid.is_none() => query.uid = Some(value),
                _ => {}
            }
        }
        query
    }

    pub fn window_minutes(&self) -> u32 {
        self.minutes
            .as_deref()
            .and_then(|m| m.trim().parse::<u32>().ok())
            .filter(|m| *m > 0)
            .unwrap_or(DEFAULT_WINDOW_MINUTES)
    }

    pub fn uid(&self) -> Option<&str> {
        self.uid.as_deref().filter(|u| !u.is_empty())
    }
}

/// Failure envelope; never carries internal error details
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Always `false`
    pub success: bool,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}
