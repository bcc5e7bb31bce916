use std::env;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";
pub const DEMO_KEY: &str = "DEMO_KEY";

fn var_or(name: &str, default: &str) -> String {
    env::var(name).ok().filter(|v| !v.trim().is_empty()).unwrap_or_else(|| default.to_string())
}

fn port_or(default: u16) -> u16 {
    env::var("PORT").ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

/// Settings for the console server.
#[derive(Debug, Clone)]
pub struct ConsoleSettings {
    pub api_base_url: String,
    pub port: u16,
    /// Idle time after which a browser session is dropped.
    pub session_ttl_secs: i64,
}

impl ConsoleSettings {
    pub fn from_env() -> Self {
        Self {
            api_base_url: var_or("API_BASE_URL", DEFAULT_API_BASE_URL),
            port: port_or(8080),
            session_ttl_secs: env::var("SESSION_TTL_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(60 * 60),
        }
    }
}

/// Settings for the generation service.
#[derive(Debug, Clone)]
pub struct ServiceSettings {
    pub anthropic_api_key: String,
    pub anthropic_api_base: String,
    pub anthropic_model: String,
    pub app_name: String,
    pub app_version: String,
    pub port: u16,
}

impl ServiceSettings {
    pub fn from_env() -> Self {
        Self {
            anthropic_api_key: var_or("ANTHROPIC_API_KEY", DEMO_KEY),
            anthropic_api_base: var_or("ANTHROPIC_API_BASE", "https://api.anthropic.com"),
            anthropic_model: var_or("ANTHROPIC_MODEL", "claude-3-5-sonnet-20241022"),
            app_name: var_or("APP_NAME", "Ad Copy Generation API"),
            app_version: var_or("APP_VERSION", env!("CARGO_PKG_VERSION")),
            port: port_or(8000),
        }
    }

    pub fn demo_mode(&self) -> bool { self.anthropic_api_key == DEMO_KEY }

    /// Key prefix safe to print at startup.
    pub fn masked_key(&self) -> String {
        let key = &self.anthropic_api_key;
        let shown: String = key.chars().take(10).collect();
        if shown.len() < key.len() { format!("{}...", shown) } else { shown }
    }
}
