use clap::Subcommand;
use studystreak_core::CoreConfig;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the active configuration as TOML
    Show,
    /// Set a configuration value
    Set {
        /// Key (relaxed_limits, refresh_interval_secs, api_base_url)
        key: String,
        value: String,
    },
    /// Print the configuration file path
    Path,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    let path = crate::common::config_path();

    match action {
        ConfigAction::Show => {
            let config = CoreConfig::load(&path)?;
            print!("{}", toml::to_string_pretty(&config)?);
        }
        ConfigAction::Set { key, value } => {
            let mut config = CoreConfig::load(&path)?;
            match key.as_str() {
                "relaxed_limits" => config.relaxed_limits = value.parse()?,
                "refresh_interval_secs" => config.refresh_interval_secs = value.parse()?,
                "api_base_url" => config.api_base_url = value,
                other => return Err(format!("unknown configuration key: {other}").into()),
            }
            config.save(&path)?;
            println!("saved {}", path.display());
        }
        ConfigAction::Path => {
            println!("{}", path.display());
        }
    }

    Ok(())
}
