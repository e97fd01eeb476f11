use clap::Subcommand;
use studystreak_core::{ActionCategory, CoreConfig, RateLimiter};

#[derive(Subcommand)]
pub enum LimitsAction {
    /// Simulate a burst of requests against one category
    Check {
        /// Action category (generation_request, preview, content_save, template_creation)
        #[arg(long)]
        category: String,
        /// User identifier
        #[arg(long, default_value = "local")]
        user: String,
        /// Number of requests to attempt
        #[arg(long, default_value = "1")]
        count: u32,
    },
    /// Print remaining quota for every category as JSON
    Info {
        #[arg(long, default_value = "local")]
        user: String,
    },
    /// Drop recorded requests for a user (the logout path)
    Clear {
        #[arg(long, default_value = "local")]
        user: String,
    },
}

pub fn run(action: LimitsAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = CoreConfig::load(&crate::common::config_path())?;
    let mut limiter = RateLimiter::new(config.relaxed_limits);

    match action {
        LimitsAction::Check {
            category,
            user,
            count,
        } => {
            let category: ActionCategory = category.parse()?;
            for i in 1..=count {
                let allowed = limiter.can_make_request(category, &user);
                println!(
                    "request {i}: {}",
                    if allowed { "allowed" } else { "limited" }
                );
            }
            let remaining = limiter.remaining_requests(category, &user);
            println!("remaining: {remaining}");
        }
        LimitsAction::Info { user } => {
            let info = limiter.rate_limit_info(&user);
            println!("{}", serde_json::to_string_pretty(&info)?);
        }
        LimitsAction::Clear { user } => {
            limiter.clear_user(&user);
            println!("cleared rate state for {user}");
        }
    }

    Ok(())
}
