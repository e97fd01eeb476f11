//! Client-side sliding-window rate limiting.
//!
//! Gates outgoing requests per (user, action category) before they reach the
//! backend, so a client never burns a quota the server would reject anyway.
//! A sliding window is used rather than fixed buckets to avoid
//! burst-at-boundary artifacts.
//!
//! No internal threads or timers: stale timestamps are pruned lazily, on the
//! access that needs an exact answer. A permit is consumed the moment
//! [`RateLimiter::can_make_request`] allows it; it is not refunded if the
//! network call that follows fails.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::now_ms;

/// Quota-bound action categories. Closed set: adding a category means adding
/// a limit in [`ActionCategory::limit`], the compiler enforces the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionCategory {
    /// AI content generation requests
    GenerationRequest,
    /// Content previews
    Preview,
    /// Saving generated or edited content
    ContentSave,
    /// Creating new templates
    TemplateCreation,
}

impl ActionCategory {
    pub const ALL: [ActionCategory; 4] = [
        ActionCategory::GenerationRequest,
        ActionCategory::Preview,
        ActionCategory::ContentSave,
        ActionCategory::TemplateCreation,
    ];

    /// Cap and window for this category. Relaxed mode lifts every cap.
    pub fn limit(&self, relaxed: bool) -> CategoryLimit {
        if relaxed {
            return CategoryLimit {
                max: u32::MAX,
                window_ms: 60_000,
            };
        }
        match self {
            ActionCategory::GenerationRequest => CategoryLimit {
                max: 10,
                window_ms: 60_000,
            },
            ActionCategory::Preview => CategoryLimit {
                max: 30,
                window_ms: 60_000,
            },
            ActionCategory::ContentSave => CategoryLimit {
                max: 20,
                window_ms: 60_000,
            },
            ActionCategory::TemplateCreation => CategoryLimit {
                max: 5,
                window_ms: 300_000,
            },
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionCategory::GenerationRequest => "generation_request",
            ActionCategory::Preview => "preview",
            ActionCategory::ContentSave => "content_save",
            ActionCategory::TemplateCreation => "template_creation",
        }
    }
}

impl std::str::FromStr for ActionCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "generation_request" => Ok(ActionCategory::GenerationRequest),
            "preview" => Ok(ActionCategory::Preview),
            "content_save" => Ok(ActionCategory::ContentSave),
            "template_creation" => Ok(ActionCategory::TemplateCreation),
            other => Err(format!("unknown action category: {other}")),
        }
    }
}

/// Per-category quota configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryLimit {
    /// Maximum requests inside one window.
    pub max: u32,
    /// Window length in milliseconds.
    pub window_ms: u64,
}

/// Aggregated quota view for one category, as reported to the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitInfo {
    /// Requests still allowed inside the current window.
    pub remaining: u32,
    /// Milliseconds until the oldest recorded request leaves the window.
    pub reset_ms: u64,
    /// The category cap.
    pub limit: u32,
}

type RateKey = (String, ActionCategory);

/// In-memory sliding-window request counter.
///
/// The relaxed flag is decided once at construction and never re-read; in
/// relaxed mode every check passes and no bookkeeping is done.
#[derive(Debug)]
pub struct RateLimiter {
    relaxed: bool,
    requests: HashMap<RateKey, Vec<u64>>,
}

impl RateLimiter {
    pub fn new(relaxed: bool) -> Self {
        Self {
            relaxed,
            requests: HashMap::new(),
        }
    }

    pub fn relaxed(&self) -> bool {
        self.relaxed
    }

    // ── Decision ─────────────────────────────────────────────────────

    /// Decide whether `user_id` may perform another `category` action now.
    ///
    /// Allowing records the request immediately; the permit is consumed even
    /// if the caller's network request later fails. Denying mutates nothing.
    pub fn can_make_request(&mut self, category: ActionCategory, user_id: &str) -> bool {
        self.can_make_request_at(category, user_id, now_ms())
    }

    pub(crate) fn can_make_request_at(
        &mut self,
        category: ActionCategory,
        user_id: &str,
        now: u64,
    ) -> bool {
        if self.relaxed {
            return true;
        }
        let limit = category.limit(false);
        let stamps = self
            .requests
            .entry((user_id.to_string(), category))
            .or_default();
        stamps.retain(|&t| now.saturating_sub(t) < limit.window_ms);
        if (stamps.len() as u32) < limit.max {
            stamps.push(now);
            true
        } else {
            debug!(
                user = user_id,
                category = category.as_str(),
                "rate limit reached"
            );
            false
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// Requests still allowed in the current window. Pure read.
    pub fn remaining_requests(&self, category: ActionCategory, user_id: &str) -> u32 {
        self.remaining_requests_at(category, user_id, now_ms())
    }

    pub(crate) fn remaining_requests_at(
        &self,
        category: ActionCategory,
        user_id: &str,
        now: u64,
    ) -> u32 {
        let limit = category.limit(self.relaxed);
        let in_window = self.count_in_window(category, user_id, now, limit.window_ms);
        limit.max.saturating_sub(in_window)
    }

    /// Milliseconds until the oldest recorded request leaves the window.
    /// Zero when nothing is recorded. Pure read.
    pub fn time_until_reset(&self, category: ActionCategory, user_id: &str) -> u64 {
        self.time_until_reset_at(category, user_id, now_ms())
    }

    pub(crate) fn time_until_reset_at(
        &self,
        category: ActionCategory,
        user_id: &str,
        now: u64,
    ) -> u64 {
        let limit = category.limit(self.relaxed);
        let oldest = self
            .requests
            .get(&(user_id.to_string(), category))
            .and_then(|stamps| stamps.first().copied());
        match oldest {
            Some(t) => (t + limit.window_ms).saturating_sub(now),
            None => 0,
        }
    }

    /// Quota view for every category, keyed for stable display order.
    pub fn rate_limit_info(&self, user_id: &str) -> BTreeMap<ActionCategory, RateLimitInfo> {
        let now = now_ms();
        ActionCategory::ALL
            .iter()
            .map(|&category| {
                let limit = category.limit(self.relaxed);
                let info = RateLimitInfo {
                    remaining: self.remaining_requests_at(category, user_id, now),
                    reset_ms: self.time_until_reset_at(category, user_id, now),
                    limit: limit.max,
                };
                (category, info)
            })
            .collect()
    }

    // ── Maintenance ──────────────────────────────────────────────────

    /// Drop everything recorded for `user_id`, e.g. on logout. Other users'
    /// windows are untouched.
    pub fn clear_user(&mut self, user_id: &str) {
        self.requests.retain(|(user, _), _| user != user_id);
    }

    /// Development helper: wipe all recorded requests. Refused (with a
    /// warning) outside relaxed mode.
    pub fn clear_all(&mut self) {
        if !self.relaxed {
            warn!("clear_all is a development-only operation; ignored in strict mode");
            return;
        }
        self.requests.clear();
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn count_in_window(
        &self,
        category: ActionCategory,
        user_id: &str,
        now: u64,
        window_ms: u64,
    ) -> u32 {
        self.requests
            .get(&(user_id.to_string(), category))
            .map(|stamps| {
                stamps
                    .iter()
                    .filter(|&&t| now.saturating_sub(t) < window_ms)
                    .count() as u32
            })
            .unwrap_or(0)
    }
}
