//! Per-caller daily quota gate.
//!
//! A trivial per-key counter with a trust boundary at UTC day rollover.
//! Read-modify-write on a key happens under one mutex so concurrent callers
//! sharing a key never lose an increment.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use tokio::sync::Mutex;

#[derive(Debug, Clone, Copy)]
struct DayWindow {
    day: NaiveDate,
    used: u32,
}

#[derive(Clone)]
pub struct QuotaGate {
    limit: u32,
    state: Arc<Mutex<HashMap<String, DayWindow>>>,
}

impl QuotaGate {
    #[must_use]
    pub fn new(limit: u32) -> Self {
        Self {
            limit,
            state: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Whether `key` still has quota left today.
    pub async fn admit(&self, key: &str) -> bool {
        self.admit_at(key, Utc::now().date_naive()).await
    }

    /// Count one use against `key`.
    pub async fn record_use(&self, key: &str) {
        self.record_use_at(key, Utc::now().date_naive()).await;
    }

    /// Uses left for `key` today.
    pub async fn remaining(&self, key: &str) -> u32 {
        self.remaining_at(key, Utc::now().date_naive()).await
    }

    /// When the counter next resets: the upcoming UTC midnight.
    #[must_use]
    pub fn reset_time(&self) -> DateTime<Utc> {
        let tomorrow = Utc::now().date_naive() + TimeDelta::days(1);
        tomorrow
            .and_hms_opt(0, 0, 0)
            .expect("midnight is always a valid time")
            .and_utc()
    }

    async fn admit_at(&self, key: &str, today: NaiveDate) -> bool {
        self.remaining_at(key, today).await > 0
    }

    async fn record_use_at(&self, key: &str, today: NaiveDate) {
        let mut state = self.state.lock().await;
        let window = state
            .entry(key.to_owned())
            .or_insert(DayWindow { day: today, used: 0 });
        if window.day != today {
            window.day = today;
            window.used = 0;
        }
        window.used += 1;
    }

    async fn remaining_at(&self, key: &str, today: NaiveDate) -> u32 {
        let state = self.state.lock().await;
        let used = state
            .get(key)
            .filter(|w| w.day == today)
            .map_or(0, |w| w.used);
        self.limit.saturating_sub(used)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(n: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, n).expect("valid date")
    }

    #[tokio::test]
    async fn fresh_key_has_the_full_limit() {
        let gate = QuotaGate::new(3);
        assert!(gate.admit_at("a", day(1)).await);
        assert_eq!(gate.remaining_at("a", day(1)).await, 3);
    }

    #[tokio::test]
    async fn uses_are_counted_down() {
        let gate = QuotaGate::new(2);
        gate.record_use_at("a", day(1)).await;
        assert_eq!(gate.remaining_at("a", day(1)).await, 1);
        gate.record_use_at("a", day(1)).await;
        assert_eq!(gate.remaining_at("a", day(1)).await, 0);
        assert!(!gate.admit_at("a", day(1)).await);
    }

    #[tokio::test]
    async fn keys_are_independent() {
        let gate = QuotaGate::new(1);
        gate.record_use_at("a", day(1)).await;
        assert!(!gate.admit_at("a", day(1)).await);
        assert!(gate.admit_at("b", day(1)).await);
    }

    #[tokio::test]
    async fn day_rollover_resets_the_counter() {
        let gate = QuotaGate::new(1);
        gate.record_use_at("a", day(1)).await;
        assert!(!gate.admit_at("a", day(1)).await);
        // Next day: the stale window no longer counts.
        assert!(gate.admit_at("a", day(2)).await);
        assert_eq!(gate.remaining_at("a", day(2)).await, 1);
        gate.record_use_at("a", day(2)).await;
        assert!(!gate.admit_at("a", day(2)).await);
    }

    #[tokio::test]
    async fn zero_limit_admits_nobody() {
        let gate = QuotaGate::new(0);
        assert!(!gate.admit_at("a", day(1)).await);
        assert_eq!(gate.remaining_at("a", day(1)).await, 0);
    }

    #[test]
    fn reset_time_is_a_future_midnight() {
        let gate = QuotaGate::new(3);
        let reset = gate.reset_time();
        assert!(reset > Utc::now());
        assert_eq!(reset.time(), chrono::NaiveTime::MIN);
    }
}
