use dashboard_client::shared::api_utils::ApiConfig;
use serde::Deserialize;

/// Environment variable overriding `api.base_url`
pub const API_URL_ENV: &str = "DASHBOARD_API_URL";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub api: ApiConfig,
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[api]
base_url = "http://localhost:8001"
"#;

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Next to the executable
/// 2. Falls back to embedded default config
///
/// `DASHBOARD_API_URL`, when set, replaces the API address from either source.
pub fn load_config() -> anyhow::Result<Config> {
    let config = read_config_file()?;
    Ok(apply_env_override(config, std::env::var(API_URL_ENV).ok()))
}

fn read_config_file() -> anyhow::Result<Config> {
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let config_path = exe_dir.join("config.toml");

            if config_path.exists() {
                tracing::info!("Loading config from: {}", config_path.display());
                let contents = std::fs::read_to_string(&config_path)?;
                let config: Config = toml::from_str(&contents)?;
                return Ok(config);
            } else {
                tracing::debug!("config.toml not found at: {}", config_path.display());
            }
        }
    }

    tracing::debug!("Using default embedded configuration");
    let config: Config = toml::from_str(DEFAULT_CONFIG)?;
    Ok(config)
}

fn apply_env_override(mut config: Config, api_url: Option<String>) -> Config {
    if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
        tracing::info!("API address overridden by {}: {}", API_URL_ENV, url);
        config.api.base_url = url;
    }
    config
}
