use std::env;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub backend_url: String,
    pub request_timeout_secs: u64,
    pub search_debounce_ms: u64,
    pub auto_dismiss_secs: u64,
    pub session_idle_secs: u64,
    pub cors_origin: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let number = |key: &str, default: u64| {
            get(key).and_then(|v| v.parse().ok()).unwrap_or(default)
        };
        Self {
            port: get("PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(8080),
            backend_url: get("BACKEND_URL")
                .unwrap_or_else(|| "http://localhost:3000/api".to_string()),
            request_timeout_secs: number("REQUEST_TIMEOUT_SECS", 120),
            search_debounce_ms: number("SEARCH_DEBOUNCE_MS", 500),
            auto_dismiss_secs: number("AUTO_DISMISS_SECS", 5),
            session_idle_secs: number("SESSION_IDLE_SECS", 1800),
            cors_origin: get("CORS_ORIGIN").filter(|v| !v.is_empty()),
        }
    }
}
