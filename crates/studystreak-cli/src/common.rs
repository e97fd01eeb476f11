use std::path::PathBuf;

/// Resolve the configuration file path (`~/.config/studystreak/config.toml`).
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("studystreak")
        .join("config.toml")
}
