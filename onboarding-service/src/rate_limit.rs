//! Declarative throttling table handed to the external rate limiter.
//!
//! Nothing here enforces limits; the limiter reads the table (as JSON or
//! through [`RateLimitRule::quota`]) and applies it.

use governor::Quota;
use serde::Serialize;
use std::collections::BTreeMap;
use std::num::NonZeroU32;
use std::time::Duration;

use crate::routes::{SIGN_IN_EMAIL_PATH, SIGN_UP_EMAIL_PATH};

/// Where the limiter keeps its counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RateLimitStorage {
    Memory,
    /// Counters survive restarts and are shared between instances.
    Database,
}

/// At most `max` requests per `window` seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RateLimitRule {
    pub window: u64,
    pub max: u32,
}

impl RateLimitRule {
    pub const fn new(window: u64, max: u32) -> Self {
        Self { window, max }
    }

    /// The rule as a `governor` quota: a burst of `max` that refills evenly
    /// over `window`. `None` when the rule admits nothing.
    pub fn quota(&self) -> Option<Quota> {
        let burst = NonZeroU32::new(self.max)?;
        let period = Duration::from_millis(self.window.saturating_mul(1000) / self.max as u64);
        Some(Quota::with_period(period)?.allow_burst(burst))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimitPolicy {
    pub storage: RateLimitStorage,
    pub window: u64,
    pub max: u32,
    pub custom_rules: BTreeMap<String, RateLimitRule>,
}

const GLOBAL_RULE: RateLimitRule = RateLimitRule::new(60, 60);
const SIGN_UP_RULE: RateLimitRule = RateLimitRule::new(900, 3);
const SIGN_IN_RULE: RateLimitRule = RateLimitRule::new(300, 5);

/// The throttling table for the auth routes.
pub fn rate_limit_policy() -> RateLimitPolicy {
    let custom_rules = [
        (SIGN_UP_EMAIL_PATH.to_string(), SIGN_UP_RULE),
        (SIGN_IN_EMAIL_PATH.to_string(), SIGN_IN_RULE),
    ]
    .into_iter()
    .collect();

    RateLimitPolicy {
        storage: RateLimitStorage::Database,
        window: GLOBAL_RULE.window,
        max: GLOBAL_RULE.max,
        custom_rules,
    }
}

impl RateLimitPolicy {
    /// Rule applying to `path`: its custom rule, else the global one.
    pub fn rule_for(&self, path: &str) -> RateLimitRule {
        self.custom_rules
            .get(path)
            .copied()
            .unwrap_or(RateLimitRule::new(self.window, self.max))
    }
}
