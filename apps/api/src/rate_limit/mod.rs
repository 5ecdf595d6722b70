//! Per-IP submission limiter over a fixed-length window (one hour by default).
//!
//! The decision logic is pure (`RateLimitPolicy::evaluate`); `store` applies it
//! against the `rate_limits` table.

pub mod store;

use std::net::SocketAddr;

use axum::http::HeaderMap;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::models::rate_limit::RateLimitRow;

/// Headers consulted for the client address, in priority order.
const FORWARDED_HEADERS: &[&str] = &["x-forwarded-for", "x-real-ip", "client-ip"];
pub const UNKNOWN_IP: &str = "unknown";
/// Longest window accepted from config: one year.
pub const MAX_WINDOW_SECS: i64 = 365 * 24 * 60 * 60;

#[derive(Debug, Clone, Copy)]
pub struct RateLimitPolicy {
    pub max_requests: i32,
    pub window: Duration,
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self {
            max_requests: 5,
            window: Duration::hours(1),
        }
    }
}

/// What the store must do to record an allowed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowAction {
    /// No live window: start a new one with a count of 1.
    StartWindow,
    /// Bump the live window's count.
    Increment,
    /// Denied; nothing is recorded.
    None,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimitDecision {
    pub allowed: bool,
    /// Requests left in the window after this one.
    pub remaining: i32,
    pub reset_at: DateTime<Utc>,
    #[serde(skip)]
    pub action: WindowAction,
}

impl RateLimitDecision {
    pub fn retry_after_secs(&self, now: DateTime<Utc>) -> i64 {
        (self.reset_at - now).num_seconds().max(0)
    }
}

impl RateLimitPolicy {
    /// `window_secs` is clamped to `1..=MAX_WINDOW_SECS`.
    pub fn new(max_requests: i32, window_secs: i64) -> Self {
        Self {
            max_requests: max_requests.max(1),
            window: Duration::seconds(window_secs.clamp(1, MAX_WINDOW_SECS)),
        }
    }

    /// End of a window opened at `start`, saturating at the latest representable instant.
    pub fn window_end(&self, start: DateTime<Utc>) -> DateTime<Utc> {
        start
            .checked_add_signed(self.window)
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    /// A counter is live while `now` is strictly inside `[window_start, window_start + window)`.
    pub fn is_live(&self, counter: &RateLimitRow, now: DateTime<Utc>) -> bool {
        self.window_end(counter.window_start) > now
    }

    /// Decides an incoming request given the stored counter for its IP.
    pub fn evaluate(&self, counter: Option<&RateLimitRow>, now: DateTime<Utc>) -> RateLimitDecision {
        match counter.filter(|c| self.is_live(c, now)) {
            None => RateLimitDecision {
                allowed: true,
                remaining: self.max_requests - 1,
                reset_at: self.window_end(now),
                action: WindowAction::StartWindow,
            },
            Some(c) if c.request_count >= self.max_requests => RateLimitDecision {
                allowed: false,
                remaining: 0,
                reset_at: self.window_end(c.window_start),
                action: WindowAction::None,
            },
            Some(c) => RateLimitDecision {
                allowed: true,
                remaining: (self.max_requests - c.request_count - 1).max(0),
                reset_at: self.window_end(c.window_start),
                action: WindowAction::Increment,
            },
        }
    }

    /// Decision used when the store is unreachable: let the request through.
    pub fn fail_open(&self, now: DateTime<Utc>) -> RateLimitDecision {
        RateLimitDecision {
            allowed: true,
            remaining: self.max_requests - 1,
            reset_at: self.window_end(now),
            action: WindowAction::None,
        }
    }
}

/// Resolves the submitter's address from proxy headers, then the socket peer.
pub fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    for name in FORWARDED_HEADERS {
        let value = headers
            .get(*name)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty());
        if let Some(ip) = value {
            return ip.to_string();
        }
    }
    peer.map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| UNKNOWN_IP.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use uuid::Uuid;

    fn counter(window_start: DateTime<Utc>, request_count: i32) -> RateLimitRow {
        RateLimitRow {
            id: Uuid::new_v4(),
            user_ip: "198.51.100.4".into(),
            window_start,
            request_count,
            last_request: window_start,
        }
    }

    #[test]
    fn test_first_request_starts_window() {
        let now = Utc::now();
        let d = RateLimitPolicy::default().evaluate(None, now);
        assert!(d.allowed);
        assert_eq!(d.remaining, 4);
        assert_eq!(d.action, WindowAction::StartWindow);
        assert_eq!(d.reset_at, now + Duration::hours(1));
    }

    #[test]
    fn test_allows_up_to_max_then_denies() {
        let policy = RateLimitPolicy::default();
        let start = Utc::now();
        let now = start + Duration::minutes(10);

        // Counts 1..=4 stored: the 2nd..5th requests are allowed.
        for stored in 1..5 {
            let d = policy.evaluate(Some(&counter(start, stored)), now);
            assert!(d.allowed, "request {} should pass", stored + 1);
            assert_eq!(d.remaining, 5 - stored - 1);
            assert_eq!(d.action, WindowAction::Increment);
        }

        // Five already recorded: the sixth is denied.
        let d = policy.evaluate(Some(&counter(start, 5)), now);
        assert!(!d.allowed);
        assert_eq!(d.remaining, 0);
        assert_eq!(d.action, WindowAction::None);
        assert_eq!(d.retry_after_secs(now), 50 * 60);
    }

    #[test]
    fn test_window_resets_after_an_hour() {
        let policy = RateLimitPolicy::default();
        let start = Utc::now();
        let exhausted = counter(start, 5);

        let just_before = start + Duration::minutes(59);
        assert!(!policy.evaluate(Some(&exhausted), just_before).allowed);

        let at_boundary = start + Duration::hours(1);
        let d = policy.evaluate(Some(&exhausted), at_boundary);
        assert!(d.allowed);
        assert_eq!(d.action, WindowAction::StartWindow);
        assert_eq!(d.remaining, 4);
    }

    #[test]
    fn test_custom_policy_ceiling() {
        let policy = RateLimitPolicy::new(2, 60);
        let start = Utc::now();
        assert!(policy.evaluate(Some(&counter(start, 1)), start).allowed);
        assert!(!policy.evaluate(Some(&counter(start, 2)), start).allowed);
    }

    #[test]
    fn test_policy_floors_degenerate_config() {
        let policy = RateLimitPolicy::new(0, 0);
        assert_eq!(policy.max_requests, 1);
        assert_eq!(policy.window, Duration::seconds(1));
    }

    #[test]
    fn test_huge_window_is_clamped_and_never_overflows() {
        let policy = RateLimitPolicy::new(5, i64::MAX);
        assert_eq!(policy.window, Duration::seconds(MAX_WINDOW_SECS));

        let d = policy.evaluate(None, Utc::now());
        assert!(d.allowed);

        let late = DateTime::<Utc>::MAX_UTC - Duration::days(1);
        assert_eq!(policy.window_end(late), DateTime::<Utc>::MAX_UTC);
        assert!(policy.evaluate(Some(&counter(late, 5)), late).retry_after_secs(late) > 0);
    }

    #[test]
    fn test_fail_open_records_nothing() {
        let d = RateLimitPolicy::default().fail_open(Utc::now());
        assert!(d.allowed);
        assert_eq!(d.action, WindowAction::None);
    }

    #[test]
    fn test_client_ip_prefers_first_forwarded_for() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.9, 10.0.0.1"),
        );
        headers.insert("x-real-ip", HeaderValue::from_static("10.0.0.2"));
        assert_eq!(client_ip(&headers, None), "203.0.113.9");
    }

    #[test]
    fn test_client_ip_falls_through_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("  "));
        headers.insert("client-ip", HeaderValue::from_static("192.0.2.33"));
        assert_eq!(client_ip(&headers, None), "192.0.2.33");
    }

    #[test]
    fn test_client_ip_uses_peer_then_unknown() {
        let headers = HeaderMap::new();
        let peer: SocketAddr = "192.0.2.1:54321".parse().unwrap();
        assert_eq!(client_ip(&headers, Some(peer)), "192.0.2.1");
        assert_eq!(client_ip(&headers, None), UNKNOWN_IP);
    }
}
