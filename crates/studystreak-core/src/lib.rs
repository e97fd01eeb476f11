//! # Studystreak Core Library
//!
//! This library provides the client-side core logic for the Studystreak
//! learning app. The GUI is a thin layer over this crate; everything here is
//! driveable from a standalone CLI binary as well.
//!
//! ## Architecture
//!
//! - **Rate Limiter**: an in-memory sliding-window request gate, consulted
//!   before any quota-bound backend call is made
//! - **Streak Coordinator**: a wall-clock, tick-driven state machine that
//!   caches the user's study streak and keeps it fresh by polling
//! - **Notifications**: streak milestone/warning emitters plus a center that
//!   auto-expires entries; the host polls for changes, no internal threads
//! - **Config**: TOML-based configuration, injected at construction
//!
//! ## Key Components
//!
//! - [`RateLimiter`]: per-(user, category) sliding-window counter
//! - [`StreakCoordinator`]: cached streak view with auto-refresh
//! - [`NotificationCenter`]: active notification list with timed expiry
//! - [`CoreConfig`]: application configuration

pub mod config;
pub mod error;
pub mod rate_limit;
pub mod streak;

pub use config::CoreConfig;
pub use error::{ConfigError, CoreError, StreakError};
pub use rate_limit::{ActionCategory, CategoryLimit, RateLimitInfo, RateLimiter};
pub use streak::{
    ApiError, HttpBackend, LoadState, NotificationCenter, NotificationKind, StreakBackend,
    StreakCoordinator, StreakEvent, StreakNotification, StreakStatus, TaskCompletion, TaskType,
};

/// Milliseconds since the Unix epoch.
pub(crate) fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
