//! Streak coordinator: cached status, polling, optimistic completion.
//!
//! The coordinator is a wall-clock state machine in the same mold as a
//! tick-driven timer engine: it owns no threads and arms no timers. The host
//! activates it, then calls `tick()` periodically; backend calls are the only
//! suspension points.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Loading -> (Ready | Error)
//! ```
//!
//! `Ready` and `Error` both re-enter `Loading` on refresh or a due tick.
//! `complete_task` is available from either terminal state -- it needs a
//! resolved user, not a prior successful load.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::api::{user_message, StreakBackend};
use super::status::{StreakStatus, TaskCompletion, TaskType};
use crate::error::StreakError;
use crate::now_ms;

/// Fixed error message recorded when no user session is resolved.
pub const SIGNED_OUT_MESSAGE: &str = "You need to be signed in to track your study streak.";

/// Default auto-refresh interval.
const DEFAULT_REFRESH_INTERVAL_MS: u64 = 30_000;

/// Coordinator lifecycle state, derived from the cached fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadState {
    Idle,
    Loading,
    Ready,
    Error,
}

/// Every observable change produces an event. The host polls for them via
/// [`StreakCoordinator::drain_events`]; nothing re-renders implicitly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum StreakEvent {
    LoadStarted {
        at: DateTime<Utc>,
    },
    StatusLoaded {
        streak_count: u32,
        freezing_count: u32,
        has_completed_today: bool,
        at: DateTime<Utc>,
    },
    LoadFailed {
        message: String,
        at: DateTime<Utc>,
    },
    TaskCompleted {
        task_type: TaskType,
        streak_count: u32,
        at: DateTime<Utc>,
    },
    CompletionFailed {
        message: String,
        at: DateTime<Utc>,
    },
}

/// Locally cached view of a user's streak, kept fresh by polling.
pub struct StreakCoordinator<B> {
    backend: B,
    user_id: Option<String>,
    status: Option<StreakStatus>,
    loading: bool,
    error: Option<String>,
    active: bool,
    refresh_interval_ms: u64,
    /// Epoch ms of the last finished load; ticks measure from here.
    last_load_epoch_ms: Option<u64>,
    events: VecDeque<StreakEvent>,
}

impl<B: StreakBackend> StreakCoordinator<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            user_id: None,
            status: None,
            loading: false,
            error: None,
            active: false,
            refresh_interval_ms: DEFAULT_REFRESH_INTERVAL_MS,
            last_load_epoch_ms: None,
            events: VecDeque::new(),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> LoadState {
        if self.loading {
            LoadState::Loading
        } else if self.error.is_some() {
            LoadState::Error
        } else if self.status.is_some() {
            LoadState::Ready
        } else {
            LoadState::Idle
        }
    }

    pub fn status(&self) -> Option<&StreakStatus> {
        self.status.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Take everything that happened since the last drain, oldest first.
    pub fn drain_events(&mut self) -> Vec<StreakEvent> {
        self.events.drain(..).collect()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    // ── Session ──────────────────────────────────────────────────────

    pub fn set_user(&mut self, user_id: Option<String>) {
        self.user_id = user_id;
    }

    pub fn set_refresh_interval_ms(&mut self, interval_ms: u64) {
        self.refresh_interval_ms = interval_ms;
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Fetch the streak status and replace the cache with the result.
    ///
    /// Without a resolved user this records [`SIGNED_OUT_MESSAGE`] and makes
    /// no backend call; the loading flag never goes up. On a backend failure
    /// the cache is cleared so stale data is never shown alongside an error.
    /// The loading flag comes down on every exit path.
    pub async fn load_streak_data(&mut self) {
        let Some(user_id) = self.user_id.clone() else {
            self.error = Some(SIGNED_OUT_MESSAGE.to_string());
            self.push(StreakEvent::LoadFailed {
                message: SIGNED_OUT_MESSAGE.to_string(),
                at: Utc::now(),
            });
            return;
        };

        self.loading = true;
        self.push(StreakEvent::LoadStarted { at: Utc::now() });

        match self.backend.fetch_status(&user_id).await {
            Ok(status) => {
                self.error = None;
                self.push(StreakEvent::StatusLoaded {
                    streak_count: status.streak_count,
                    freezing_count: status.freezing_count,
                    has_completed_today: status.has_completed_today,
                    at: Utc::now(),
                });
                self.status = Some(status);
            }
            Err(err) => {
                let message = user_message(&err);
                warn!(user = %user_id, error = %err, "streak load failed");
                self.error = Some(message.to_string());
                self.status = None;
                self.push(StreakEvent::LoadFailed {
                    message: message.to_string(),
                    at: Utc::now(),
                });
            }
        }

        self.loading = false;
        self.last_load_epoch_ms = Some(now_ms());
    }

    /// Alias kept for call sites that read better as an explicit refresh.
    pub async fn refresh_streak(&mut self) {
        self.load_streak_data().await;
    }

    /// Record a completed task and optimistically merge the result into the
    /// cached status.
    ///
    /// Only `streak_count`, `freezing_count`, `has_completed_today` and
    /// `last_activity_time` are written; other cached fields keep their
    /// values. There is no version guard against the refresh cycle: the last
    /// write to the cache wins, so a poll response landing after this merge
    /// overwrites it.
    ///
    /// Failures are recorded in the error slot AND returned, so an action
    /// handler can react (e.g. revert its own optimistic UI change).
    pub async fn complete_task(
        &mut self,
        task_type: TaskType,
        content_id: &str,
        metadata: Option<serde_json::Value>,
    ) -> Result<TaskCompletion, StreakError> {
        let Some(user_id) = self.user_id.clone() else {
            self.error = Some(SIGNED_OUT_MESSAGE.to_string());
            self.push(StreakEvent::CompletionFailed {
                message: SIGNED_OUT_MESSAGE.to_string(),
                at: Utc::now(),
            });
            return Err(StreakError::MissingUser);
        };

        match self
            .backend
            .complete_task(&user_id, task_type, content_id, metadata)
            .await
        {
            Ok(completion) => {
                let status = self.status.get_or_insert_with(StreakStatus::default);
                status.streak_count = completion.streak_count;
                status.freezing_count = completion.freezing_count;
                status.has_completed_today = true;
                status.last_activity_time = Some(completion.last_activity_time);
                debug!(
                    user = %user_id,
                    streak = completion.streak_count,
                    "task completion merged"
                );
                self.push(StreakEvent::TaskCompleted {
                    task_type,
                    streak_count: completion.streak_count,
                    at: Utc::now(),
                });
                Ok(completion)
            }
            Err(err) => {
                let message = user_message(&err);
                warn!(user = %user_id, error = %err, "task completion failed");
                self.error = Some(message.to_string());
                self.push(StreakEvent::CompletionFailed {
                    message: message.to_string(),
                    at: Utc::now(),
                });
                Err(StreakError::Backend(err))
            }
        }
    }

    // ── Auto-refresh ─────────────────────────────────────────────────

    /// Start the refresh cycle: loads immediately, then `tick()` takes over.
    pub async fn activate(&mut self) {
        self.active = true;
        self.load_streak_data().await;
    }

    /// Stop future ticks from loading. An in-flight backend call is not
    /// cancelled; only upcoming ticks are affected.
    pub fn deactivate(&mut self) {
        self.active = false;
    }

    /// Call periodically. Re-loads when active, the interval has elapsed and
    /// no load is in flight -- an overlapping poll is skipped, not queued.
    pub async fn tick(&mut self) {
        self.tick_at(now_ms()).await;
    }

    pub(crate) async fn tick_at(&mut self, now: u64) {
        if !self.active || self.loading {
            return;
        }
        let due = match self.last_load_epoch_ms {
            Some(last) => now.saturating_sub(last) >= self.refresh_interval_ms,
            None => true,
        };
        if due {
            self.load_streak_data().await;
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn push(&mut self, event: StreakEvent) {
        self.events.push_back(event);
    }
}
