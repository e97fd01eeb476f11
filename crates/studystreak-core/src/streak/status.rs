//! Streak domain types shared between the backend client and the coordinator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user's current streak standing, as reported by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StreakStatus {
    /// Consecutive qualifying days of activity.
    pub streak_count: u32,

    /// Consecutive missed days before the streak resets.
    pub freezing_count: u32,

    /// Whether today's qualifying task is already done.
    pub has_completed_today: bool,

    /// Timestamp of the last qualifying activity.
    pub last_activity_time: Option<DateTime<Utc>>,

    /// Longest streak the backend has on record for this user.
    #[serde(default)]
    pub longest_streak: Option<u32>,
}

/// The kinds of tasks that count toward a streak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    /// Creating study content (manual or AI-assisted)
    ContentCreation,
    /// Completing an interactive study session
    InteractiveMode,
}

impl TaskType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskType::ContentCreation => "content_creation",
            TaskType::InteractiveMode => "interactive_mode",
        }
    }
}

impl std::str::FromStr for TaskType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "content_creation" => Ok(TaskType::ContentCreation),
            "interactive_mode" => Ok(TaskType::InteractiveMode),
            other => Err(format!("unknown task type: {other}")),
        }
    }
}

/// Backend response to a task completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskCompletion {
    pub streak_count: u32,
    pub freezing_count: u32,
    pub last_activity_time: DateTime<Utc>,
}
