//! Streak notifications: milestone/warning emitters and the active list.
//!
//! The emitters are stateless; each call builds one notification with the
//! copy and display duration for that situation. [`NotificationCenter`] owns
//! the active list and expires entries on `tick()` -- the display layer polls
//! it, no internal threads.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::now_ms;

/// Notification severity/category, mapped to styling by the display layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Success,
    Warning,
    Error,
    Info,
    Streak,
}

/// A transient user-facing notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreakNotification {
    /// Unique per instance; dismissal and expiry are keyed by it.
    pub id: Uuid,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    /// Streak count the notification refers to, when relevant.
    pub streak_count: Option<u32>,
    /// Milliseconds until auto-dismiss; 0 keeps the entry until dismissed.
    pub duration_ms: u64,
}

fn notification(
    kind: NotificationKind,
    title: &str,
    message: String,
    streak_count: Option<u32>,
    duration_ms: u64,
) -> StreakNotification {
    StreakNotification {
        id: Uuid::new_v4(),
        kind,
        title: title.to_string(),
        message,
        streak_count,
        duration_ms,
    }
}

// ── Emitters ─────────────────────────────────────────────────────────

/// Notification for a completed task that advanced the streak.
///
/// Branches are ordered; the first match wins. 30 beats 7 (a 30-day streak is
/// the month milestone, not a week one), and both beat the generic tiers.
pub fn streak_updated(streak_count: u32) -> StreakNotification {
    if streak_count == 1 {
        return notification(
            NotificationKind::Streak,
            "First day!",
            "You started your study streak. Come back tomorrow to keep it going!".to_string(),
            Some(streak_count),
            6_000,
        );
    }
    if streak_count > 0 && streak_count % 30 == 0 {
        return notification(
            NotificationKind::Streak,
            "Incredible achievement!",
            format!("{streak_count} days straight. That's a whole month's rhythm!"),
            Some(streak_count),
            8_000,
        );
    }
    if streak_count > 0 && streak_count % 7 == 0 {
        return notification(
            NotificationKind::Streak,
            "Amazing milestone!",
            format!("A full {streak_count}-day streak. Keep the momentum!"),
            Some(streak_count),
            7_000,
        );
    }
    if streak_count >= 10 {
        return notification(
            NotificationKind::Streak,
            "Streak updated",
            format!("{streak_count} days and counting. Impressive!"),
            Some(streak_count),
            5_000,
        );
    }
    let days = if streak_count == 1 {
        "1 day".to_string()
    } else {
        format!("{streak_count} days")
    };
    notification(
        NotificationKind::Streak,
        "Streak updated",
        format!("You're at {days}. Keep going!"),
        Some(streak_count),
        4_000,
    )
}

/// Explicit fixed-milestone check used by call sites that only announce the
/// big moments. Deliberately separate from [`streak_updated`], which fires on
/// every completion.
pub fn fixed_milestone(streak_count: u32) -> Option<StreakNotification> {
    let (title, duration_ms) = match streak_count {
        5 => ("5-day milestone!", 6_000),
        10 => ("10-day milestone!", 6_000),
        30 => ("30 days strong!", 8_000),
        100 => ("100 days. Legendary!", 10_000),
        _ => return None,
    };
    Some(notification(
        NotificationKind::Streak,
        title,
        format!("You've studied {streak_count} days in a row."),
        Some(streak_count),
        duration_ms,
    ))
}

/// Warning when missed days are eating into the streak. Nothing is emitted
/// while the streak is intact.
pub fn freeze_warning(freezing_count: u32) -> Option<StreakNotification> {
    if freezing_count >= 2 {
        Some(notification(
            NotificationKind::Error,
            "Your streak is about to reset!",
            format!(
                "You've missed {freezing_count} days. Complete a task today to save your streak."
            ),
            None,
            8_000,
        ))
    } else if freezing_count == 1 {
        Some(notification(
            NotificationKind::Info,
            "Don't lose your streak",
            "You missed yesterday. Complete a task today to stay on track.".to_string(),
            None,
            6_000,
        ))
    } else {
        None
    }
}

/// Emitted once the backend has reset a streak to zero.
pub fn streak_reset() -> StreakNotification {
    notification(
        NotificationKind::Warning,
        "Streak reset",
        "Your streak has been reset. Today is a good day to start a new one.".to_string(),
        None,
        7_000,
    )
}

// ── Active list ──────────────────────────────────────────────────────

#[derive(Debug, Clone)]
struct ActiveNotification {
    notification: StreakNotification,
    /// Epoch ms at which the entry auto-expires; None for sticky entries.
    expires_at_ms: Option<u64>,
}

/// Holds the notifications currently on screen, newest appended last.
///
/// Expiry deadlines live with their entries, so dismissing an entry removes
/// its deadline in the same operation -- a stale expiry can never fire against
/// a reused slot.
#[derive(Debug, Default)]
pub struct NotificationCenter {
    active: Vec<ActiveNotification>,
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a notification; returns its id for later dismissal.
    pub fn push(&mut self, notification: StreakNotification) -> Uuid {
        self.push_at(notification, now_ms())
    }

    fn push_at(&mut self, notification: StreakNotification, now: u64) -> Uuid {
        let id = notification.id;
        let expires_at_ms = (notification.duration_ms > 0).then(|| now + notification.duration_ms);
        self.active.push(ActiveNotification {
            notification,
            expires_at_ms,
        });
        id
    }

    /// Remove one notification early. Returns false when the id is unknown
    /// (already expired or dismissed).
    pub fn dismiss(&mut self, id: Uuid) -> bool {
        let before = self.active.len();
        self.active.retain(|entry| entry.notification.id != id);
        self.active.len() != before
    }

    /// Drop everything at once.
    pub fn clear(&mut self) {
        self.active.clear();
    }

    /// Call periodically. Removes entries whose display time has elapsed and
    /// returns them so the host can animate the removal.
    pub fn tick(&mut self) -> Vec<StreakNotification> {
        self.tick_at(now_ms())
    }

    fn tick_at(&mut self, now: u64) -> Vec<StreakNotification> {
        let mut expired = Vec::new();
        self.active.retain(|entry| match entry.expires_at_ms {
            Some(deadline) if deadline <= now => {
                expired.push(entry.notification.clone());
                false
            }
            _ => true,
        });
        expired
    }

    /// The notifications currently on screen, in display order.
    pub fn active(&self) -> Vec<&StreakNotification> {
        self.active.iter().map(|entry| &entry.notification).collect()
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}
