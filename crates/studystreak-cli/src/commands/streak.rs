use clap::Subcommand;
use studystreak_core::streak::notifications;
use studystreak_core::{CoreConfig, HttpBackend, StreakCoordinator, StreakEvent, TaskType};

#[derive(Subcommand)]
pub enum StreakAction {
    /// Print the current streak status as JSON
    Status {
        #[arg(long)]
        user: String,
    },
    /// Record a completed task
    Complete {
        #[arg(long)]
        user: String,
        /// Task type (content_creation or interactive_mode)
        #[arg(long, default_value = "content_creation")]
        task_type: String,
        /// Content the task relates to
        #[arg(long)]
        content_id: String,
    },
    /// Poll streak status on the configured interval, printing notifications
    Watch {
        #[arg(long)]
        user: String,
    },
}

pub fn run(action: StreakAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = CoreConfig::load(&crate::common::config_path())?;
    let rt = tokio::runtime::Runtime::new()?;

    rt.block_on(async move {
        let backend = HttpBackend::new(config.api_base_url.clone());
        let mut coordinator = StreakCoordinator::new(backend);
        coordinator.set_refresh_interval_ms(config.refresh_interval_ms());

        match action {
            StreakAction::Status { user } => {
                coordinator.set_user(Some(user));
                coordinator.load_streak_data().await;
                match coordinator.status() {
                    Some(status) => println!("{}", serde_json::to_string_pretty(status)?),
                    None => {
                        let message = coordinator.error().unwrap_or("unknown error").to_string();
                        return Err(message.into());
                    }
                }
                Ok(())
            }
            StreakAction::Complete {
                user,
                task_type,
                content_id,
            } => {
                let task_type: TaskType = task_type.parse()?;
                coordinator.set_user(Some(user));
                let completion = coordinator
                    .complete_task(task_type, &content_id, None)
                    .await?;

                println!("{}", serde_json::to_string_pretty(&completion)?);
                let notification = notifications::streak_updated(completion.streak_count);
                println!("{}: {}", notification.title, notification.message);
                if let Some(warning) = notifications::freeze_warning(completion.freezing_count) {
                    println!("{}: {}", warning.title, warning.message);
                }
                Ok(())
            }
            StreakAction::Watch { user } => watch(coordinator, user).await,
        }
    })
}

/// Drive the coordinator's activation/tick cycle, rendering events and
/// notifications to stdout until interrupted.
async fn watch(
    mut coordinator: StreakCoordinator<HttpBackend>,
    user: String,
) -> Result<(), Box<dyn std::error::Error>> {
    coordinator.set_user(Some(user));
    let mut center = notifications::NotificationCenter::new();
    let mut last_freezing: Option<u32> = None;

    coordinator.activate().await;
    loop {
        for event in coordinator.drain_events() {
            println!("{}", serde_json::to_string(&event)?);
            if let StreakEvent::StatusLoaded { freezing_count, .. } = event {
                // Only warn when the freeze level changes, not on every poll.
                if last_freezing != Some(freezing_count) {
                    last_freezing = Some(freezing_count);
                    if let Some(warning) = notifications::freeze_warning(freezing_count) {
                        println!("{}: {}", warning.title, warning.message);
                        center.push(warning);
                    }
                }
            }
        }
        for expired in center.tick() {
            println!("dismissed: {}", expired.title);
        }

        tokio::time::sleep(std::time::Duration::from_secs(1)).await;
        coordinator.tick().await;
    }
}
