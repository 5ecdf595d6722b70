use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::models::rate_limit::RateLimitRow;
use crate::rate_limit::{RateLimitDecision, RateLimitPolicy, WindowAction};

/// Applies a `RateLimitPolicy` against the `rate_limits` table.
#[derive(Clone)]
pub struct PgRateLimiter {
    pool: PgPool,
    policy: RateLimitPolicy,
}

impl PgRateLimiter {
    pub fn new(pool: PgPool, policy: RateLimitPolicy) -> Self {
        Self { pool, policy }
    }

    pub fn policy(&self) -> RateLimitPolicy {
        self.policy
    }

    /// Checks the caller's window and, if allowed, records the request.
    ///
    /// Store errors are logged and the request is let through.
    pub async fn check_and_record(&self, user_ip: &str, now: DateTime<Utc>) -> RateLimitDecision {
        match self.try_check_and_record(user_ip, now).await {
            Ok(decision) => decision,
            Err(e) => {
                warn!(user_ip, error = %e, "Rate limit store unavailable, allowing request");
                self.policy.fail_open(now)
            }
        }
    }

    async fn try_check_and_record(
        &self,
        user_ip: &str,
        now: DateTime<Utc>,
    ) -> Result<RateLimitDecision, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        // Seed an idle counter so the row lock below exists even for a first request.
        sqlx::query(
            r#"
            INSERT INTO rate_limits (id, user_ip, window_start, request_count, last_request)
            VALUES ($1, $2, $3, 0, $3)
            ON CONFLICT (user_ip) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_ip)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        // Every request for this IP serializes on the row lock from here to commit.
        let counter: RateLimitRow =
            sqlx::query_as("SELECT * FROM rate_limits WHERE user_ip = $1 FOR UPDATE")
                .bind(user_ip)
                .fetch_one(&mut *tx)
                .await?;

        let decision = self.policy.evaluate(Some(&counter), now);

        match decision.action {
            WindowAction::StartWindow => {
                sqlx::query(
                    "UPDATE rate_limits SET window_start = $2, request_count = 1, last_request = $2 WHERE user_ip = $1",
                )
                .bind(user_ip)
                .bind(now)
                .execute(&mut *tx)
                .await?;
            }
            WindowAction::Increment => {
                sqlx::query(
                    "UPDATE rate_limits SET request_count = request_count + 1, last_request = $2 WHERE user_ip = $1",
                )
                .bind(user_ip)
                .bind(now)
                .execute(&mut *tx)
                .await?;
            }
            WindowAction::None => {}
        }

        tx.commit().await?;

        debug!(
            user_ip,
            allowed = decision.allowed,
            remaining = decision.remaining,
            "Rate limit evaluated"
        );
        Ok(decision)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::db::testing::database_pool;

    fn unique_ip() -> String {
        format!("test-{}", Uuid::new_v4())
    }

    async fn stored_count(pool: &PgPool, user_ip: &str) -> i32 {
        sqlx::query_scalar("SELECT request_count FROM rate_limits WHERE user_ip = $1")
            .bind(user_ip)
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_parallel_first_requests_respect_ceiling() {
        let Some(pool) = database_pool().await else {
            return;
        };
        let limiter = PgRateLimiter::new(pool.clone(), RateLimitPolicy::default());
        let ip = unique_ip();
        let now = Utc::now();

        let handles: Vec<_> = (0..40)
            .map(|_| {
                let limiter = limiter.clone();
                let ip = ip.clone();
                tokio::spawn(async move { limiter.try_check_and_record(&ip, now).await })
            })
            .collect();

        let mut allowed = 0;
        for handle in handles {
            if handle.await.unwrap().unwrap().allowed {
                allowed += 1;
            }
        }

        assert_eq!(allowed, 5);
        assert_eq!(stored_count(&pool, &ip).await, 5);
    }

    #[tokio::test]
    async fn test_denied_requests_are_not_counted() {
        let Some(pool) = database_pool().await else {
            return;
        };
        let limiter = PgRateLimiter::new(pool.clone(), RateLimitPolicy::new(2, 3600));
        let ip = unique_ip();
        let now = Utc::now();

        let first = limiter.try_check_and_record(&ip, now).await.unwrap();
        assert!(first.allowed);
        assert_eq!(first.remaining, 1);
        assert!(limiter.try_check_and_record(&ip, now).await.unwrap().allowed);

        for _ in 0..3 {
            let denied = limiter.try_check_and_record(&ip, now).await.unwrap();
            assert!(!denied.allowed);
            assert_eq!(denied.retry_after_secs(now), 3600);
        }
        assert_eq!(stored_count(&pool, &ip).await, 2);
    }

    #[tokio::test]
    async fn test_expired_window_starts_over() {
        let Some(pool) = database_pool().await else {
            return;
        };
        let limiter = PgRateLimiter::new(pool.clone(), RateLimitPolicy::new(1, 3600));
        let ip = unique_ip();
        let start = Utc::now();

        assert!(limiter.try_check_and_record(&ip, start).await.unwrap().allowed);
        assert!(!limiter.try_check_and_record(&ip, start).await.unwrap().allowed);

        let later = start + Duration::hours(1);
        let reopened = limiter.try_check_and_record(&ip, later).await.unwrap();
        assert!(reopened.allowed);
        assert_eq!(reopened.reset_at, later + Duration::hours(1));
        assert_eq!(stored_count(&pool, &ip).await, 1);
    }
}
