use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Per-IP request counter for the current window.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct RateLimitRow {
    pub id: Uuid,
    pub user_ip: String,
    pub window_start: DateTime<Utc>,
    pub request_count: i32,
    pub last_request: DateTime<Utc>,
}
