//! Streak tracking layer.
//!
//! Backend client, the polling coordinator that caches a user's streak
//! status, and the notification emitters/center that translate streak changes
//! into user-facing messages.

pub mod api;
pub mod coordinator;
pub mod notifications;
pub mod status;

#[cfg(test)]
mod coordinator_tests;

pub use api::{user_message, ApiError, HttpBackend, StreakBackend};
pub use coordinator::{LoadState, StreakCoordinator, StreakEvent, SIGNED_OUT_MESSAGE};
pub use notifications::{
    fixed_milestone, freeze_warning, streak_reset, streak_updated, NotificationCenter,
    NotificationKind, StreakNotification,
};
pub use status::{StreakStatus, TaskCompletion, TaskType};
