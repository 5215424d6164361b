use std::env;

/// AppConfig
///
/// Holds the site's entire configuration state. Immutable once loaded and shared
/// with every handler through `FromRef`, so the guard, the session cookie and the
/// backend client all agree on the same values.
#[derive(Clone, Debug)]
pub struct AppConfig {
    // Runtime environment marker. Controls log format and cookie hardening.
    pub env: Env,
    // Base URL of the REST backend that owns all content.
    pub api_base_url: String,
    // Whether to call the backend over HTTP or serve the built-in sample data.
    pub api_mode: ApiMode,
    // Socket address the HTTP server binds to.
    pub bind_addr: String,
    // Name of the cookie holding the backend bearer token.
    pub auth_cookie_name: String,
    // Lifetime of the session cookie, in seconds.
    pub session_max_age_secs: u64,
    // Per-request timeout applied to every backend call.
    pub api_timeout_secs: u64,
    // Shown in the page title and the site header.
    pub site_title: String,
}

/// Env
///
/// Defines the runtime context. `Local` gets pretty logs and plain cookies,
/// `Production` gets JSON logs and `Secure` cookies.
#[derive(Clone, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

/// ApiMode
///
/// Selects the `PortfolioApi` implementation wired into the application state.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ApiMode {
    Http,
    Mock,
}

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_COOKIE_NAME: &str = "auth_token";
pub const DEFAULT_SESSION_MAX_AGE_SECS: u64 = 60 * 60 * 24 * 7;

impl Default for AppConfig {
    /// default
    ///
    /// Safe, non-panicking configuration for tests. Uses the mock backend so
    /// nothing leaves the process.
    fn default() -> Self {
        Self {
            env: Env::Local,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            api_mode: ApiMode::Mock,
            bind_addr: "127.0.0.1:0".to_string(),
            auth_cookie_name: DEFAULT_COOKIE_NAME.to_string(),
            session_max_age_secs: DEFAULT_SESSION_MAX_AGE_SECS,
            api_timeout_secs: 10,
            site_title: "Portfolio".to_string(),
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// Reads the configuration from environment variables.
    ///
    /// # Panics
    /// Panics in production when `API_BASE_URL` is missing, so the site never
    /// starts pointing at a localhost backend.
    pub fn load() -> Self {
        let env_str = env::var("APP_ENV").unwrap_or_else(|_| "local".to_string());
        let env = match env_str.as_str() {
            "production" => Env::Production,
            _ => Env::Local,
        };

        let configured_url = env::var("API_BASE_URL").ok().filter(|url| !url.is_empty());

        let (api_base_url, api_mode) = match env {
            Env::Production => {
                let url = configured_url.expect("FATAL: API_BASE_URL must be set in production.");
                (url, ApiMode::Http)
            }
            Env::Local => {
                // Without a backend URL the local site falls back to sample data.
                let default_mode = if configured_url.is_some() {
                    ApiMode::Http
                } else {
                    ApiMode::Mock
                };
                let mode = match env::var("API_MODE").ok().as_deref() {
                    Some("mock") => ApiMode::Mock,
                    Some("http") => ApiMode::Http,
                    _ => default_mode,
                };
                (
                    configured_url.unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
                    mode,
                )
            }
        };

        Self {
            env,
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            api_mode,
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            auth_cookie_name: env::var("AUTH_COOKIE_NAME")
                .ok()
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| DEFAULT_COOKIE_NAME.to_string()),
            session_max_age_secs: parse_var("SESSION_MAX_AGE_SECS", DEFAULT_SESSION_MAX_AGE_SECS),
            api_timeout_secs: parse_var("API_TIMEOUT_SECS", 10),
            site_title: env::var("SITE_TITLE").unwrap_or_else(|_| "Portfolio".to_string()),
        }
    }

    /// Cookies only carry `Secure` when served over HTTPS in production.
    pub fn secure_cookies(&self) -> bool {
        self.env == Env::Production
    }
}

fn parse_var(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}
