pub mod chat;
pub mod doctor;
pub mod onboard;
pub mod search;
pub mod serve;
pub mod tool;

use aocook_config::AppConfig;

/// Load `~/.aocook/config.toml` with environment overrides applied.
pub fn load_config() -> Result<AppConfig, Box<dyn std::error::Error>> {
    Ok(AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?)
}
