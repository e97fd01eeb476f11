use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

use chrono::{TimeZone, Utc};

use super::api::{
    ApiError, StreakBackend, GENERIC_MESSAGE, NETWORK_MESSAGE, PERMISSION_MESSAGE,
};
use super::coordinator::{LoadState, StreakCoordinator, StreakEvent, SIGNED_OUT_MESSAGE};
use super::status::{StreakStatus, TaskCompletion, TaskType};
use crate::error::StreakError;

/// Backend that replays scripted results and counts calls.
#[derive(Default)]
struct ScriptedBackend {
    status_results: RefCell<VecDeque<Result<StreakStatus, ApiError>>>,
    completion_results: RefCell<VecDeque<Result<TaskCompletion, ApiError>>>,
    status_calls: Cell<usize>,
    completion_calls: Cell<usize>,
}

impl ScriptedBackend {
    fn with_status(self, result: Result<StreakStatus, ApiError>) -> Self {
        self.status_results.borrow_mut().push_back(result);
        self
    }

    fn with_completion(self, result: Result<TaskCompletion, ApiError>) -> Self {
        self.completion_results.borrow_mut().push_back(result);
        self
    }
}

impl StreakBackend for ScriptedBackend {
    async fn fetch_status(&self, _user_id: &str) -> Result<StreakStatus, ApiError> {
        self.status_calls.set(self.status_calls.get() + 1);
        self.status_results
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::Backend("unscripted fetch".to_string())))
    }

    async fn complete_task(
        &self,
        _user_id: &str,
        _task_type: TaskType,
        _content_id: &str,
        _metadata: Option<serde_json::Value>,
    ) -> Result<TaskCompletion, ApiError> {
        self.completion_calls.set(self.completion_calls.get() + 1);
        self.completion_results
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::Backend("unscripted completion".to_string())))
    }
}

fn sample_status() -> StreakStatus {
    StreakStatus {
        streak_count: 11,
        freezing_count: 0,
        has_completed_today: false,
        last_activity_time: Some(Utc.with_ymd_and_hms(2026, 8, 29, 9, 0, 0).unwrap()),
        longest_streak: Some(40),
    }
}

fn sample_completion(streak_count: u32) -> TaskCompletion {
    TaskCompletion {
        streak_count,
        freezing_count: 0,
        last_activity_time: Utc.with_ymd_and_hms(2026, 8, 30, 10, 30, 0).unwrap(),
    }
}

#[tokio::test]
async fn load_without_user_sets_fixed_error_and_skips_backend() {
    let backend = ScriptedBackend::default();
    let mut coordinator = StreakCoordinator::new(backend);

    coordinator.load_streak_data().await;

    assert_eq!(coordinator.error(), Some(SIGNED_OUT_MESSAGE));
    assert!(!coordinator.is_loading());
    assert_eq!(coordinator.backend().status_calls.get(), 0);
    assert_eq!(coordinator.state(), LoadState::Error);
}

#[tokio::test]
async fn successful_load_caches_status_and_clears_error() {
    let backend = ScriptedBackend::default()
        .with_status(Err(ApiError::Backend("HTTP 500".to_string())))
        .with_status(Ok(sample_status()));
    let mut coordinator = StreakCoordinator::new(backend);
    coordinator.set_user(Some("u1".to_string()));

    coordinator.load_streak_data().await;
    assert_eq!(coordinator.error(), Some(GENERIC_MESSAGE));
    assert_eq!(coordinator.state(), LoadState::Error);

    coordinator.load_streak_data().await;
    assert_eq!(coordinator.error(), None);
    assert_eq!(coordinator.status().unwrap().streak_count, 11);
    assert_eq!(coordinator.state(), LoadState::Ready);
}

#[tokio::test]
async fn network_failure_sets_connectivity_message_and_clears_cache() {
    let backend = ScriptedBackend::default()
        .with_status(Ok(sample_status()))
        .with_status(Err(ApiError::Backend(
            "Network error: connection refused".to_string(),
        )));
    let mut coordinator = StreakCoordinator::new(backend);
    coordinator.set_user(Some("u1".to_string()));

    coordinator.load_streak_data().await;
    assert!(coordinator.status().is_some());

    coordinator.load_streak_data().await;
    assert_eq!(coordinator.error(), Some(NETWORK_MESSAGE));
    assert!(coordinator.status().is_none());
    assert!(!coordinator.is_loading());
}

#[tokio::test]
async fn permission_failure_maps_to_permission_message() {
    let backend = ScriptedBackend::default()
        .with_status(Err(ApiError::Backend("Access denied".to_string())));
    let mut coordinator = StreakCoordinator::new(backend);
    coordinator.set_user(Some("u1".to_string()));

    coordinator.load_streak_data().await;

    assert_eq!(coordinator.error(), Some(PERMISSION_MESSAGE));
}

#[tokio::test]
async fn completion_merges_shallowly_into_cached_status() {
    let backend = ScriptedBackend::default()
        .with_status(Ok(sample_status()))
        .with_completion(Ok(sample_completion(12)));
    let mut coordinator = StreakCoordinator::new(backend);
    coordinator.set_user(Some("u1".to_string()));

    coordinator.load_streak_data().await;
    let completion = coordinator
        .complete_task(TaskType::ContentCreation, "deck-9", None)
        .await
        .unwrap();
    assert_eq!(completion.streak_count, 12);

    let status = coordinator.status().unwrap();
    assert_eq!(status.streak_count, 12);
    assert!(status.has_completed_today);
    assert_eq!(
        status.last_activity_time,
        Some(sample_completion(12).last_activity_time)
    );
    // Fields outside the merge keep their cached values.
    assert_eq!(status.longest_streak, Some(40));
}

#[tokio::test]
async fn completion_works_without_a_prior_load() {
    let backend = ScriptedBackend::default().with_completion(Ok(sample_completion(1)));
    let mut coordinator = StreakCoordinator::new(backend);
    coordinator.set_user(Some("u1".to_string()));

    coordinator
        .complete_task(TaskType::InteractiveMode, "quiz-1", None)
        .await
        .unwrap();

    let status = coordinator.status().unwrap();
    assert_eq!(status.streak_count, 1);
    assert!(status.has_completed_today);
}

#[tokio::test]
async fn completion_without_user_fails_without_backend_call() {
    let backend = ScriptedBackend::default();
    let mut coordinator = StreakCoordinator::new(backend);

    let err = coordinator
        .complete_task(TaskType::ContentCreation, "deck-9", None)
        .await
        .unwrap_err();

    assert!(matches!(err, StreakError::MissingUser));
    assert_eq!(coordinator.error(), Some(SIGNED_OUT_MESSAGE));
    assert_eq!(coordinator.backend().completion_calls.get(), 0);
}

#[tokio::test]
async fn completion_failure_records_error_and_propagates() {
    let backend = ScriptedBackend::default()
        .with_completion(Err(ApiError::Backend("Access denied".to_string())));
    let mut coordinator = StreakCoordinator::new(backend);
    coordinator.set_user(Some("u1".to_string()));

    let err = coordinator
        .complete_task(TaskType::ContentCreation, "deck-9", None)
        .await
        .unwrap_err();

    assert!(matches!(err, StreakError::Backend(_)));
    assert_eq!(coordinator.error(), Some(PERMISSION_MESSAGE));
}

#[tokio::test]
async fn stale_poll_overwrites_optimistic_merge() {
    // Last write wins: a refresh that resolves after a completion replaces
    // the merged values wholesale.
    let backend = ScriptedBackend::default()
        .with_completion(Ok(sample_completion(12)))
        .with_status(Ok(sample_status())); // streak_count 11
    let mut coordinator = StreakCoordinator::new(backend);
    coordinator.set_user(Some("u1".to_string()));

    coordinator
        .complete_task(TaskType::ContentCreation, "deck-9", None)
        .await
        .unwrap();
    assert_eq!(coordinator.status().unwrap().streak_count, 12);

    coordinator.refresh_streak().await;
    assert_eq!(coordinator.status().unwrap().streak_count, 11);
}

#[tokio::test]
async fn activate_loads_immediately_and_tick_respects_interval() {
    let backend = ScriptedBackend::default()
        .with_status(Ok(sample_status()))
        .with_status(Ok(sample_status()));
    let mut coordinator = StreakCoordinator::new(backend);
    coordinator.set_user(Some("u1".to_string()));
    coordinator.set_refresh_interval_ms(30_000);

    coordinator.activate().await;
    assert!(coordinator.is_active());
    assert_eq!(coordinator.backend().status_calls.get(), 1);

    let now = crate::now_ms();
    coordinator.tick_at(now + 1_000).await;
    assert_eq!(coordinator.backend().status_calls.get(), 1);

    coordinator.tick_at(now + 31_000).await;
    assert_eq!(coordinator.backend().status_calls.get(), 2);
}

#[tokio::test]
async fn deactivate_stops_future_ticks() {
    let backend = ScriptedBackend::default().with_status(Ok(sample_status()));
    let mut coordinator = StreakCoordinator::new(backend);
    coordinator.set_user(Some("u1".to_string()));

    coordinator.activate().await;
    coordinator.deactivate();
    assert!(!coordinator.is_active());

    coordinator.tick_at(u64::MAX).await;
    assert_eq!(coordinator.backend().status_calls.get(), 1);
}

#[tokio::test]
async fn events_record_the_load_and_completion_lifecycle() {
    let backend = ScriptedBackend::default()
        .with_status(Ok(sample_status()))
        .with_completion(Ok(sample_completion(12)));
    let mut coordinator = StreakCoordinator::new(backend);
    coordinator.set_user(Some("u1".to_string()));

    coordinator.load_streak_data().await;
    coordinator
        .complete_task(TaskType::ContentCreation, "deck-9", None)
        .await
        .unwrap();

    let events = coordinator.drain_events();
    assert!(matches!(events[0], StreakEvent::LoadStarted { .. }));
    assert!(matches!(
        events[1],
        StreakEvent::StatusLoaded {
            streak_count: 11,
            ..
        }
    ));
    assert!(matches!(
        events[2],
        StreakEvent::TaskCompleted {
            streak_count: 12,
            ..
        }
    ));
    // Drained means drained.
    assert!(coordinator.drain_events().is_empty());
}
