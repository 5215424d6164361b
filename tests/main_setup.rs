use folio_site::{
    AppConfig,
    config::{ApiMode, DEFAULT_API_BASE_URL, DEFAULT_COOKIE_NAME, Env},
};
use serial_test::serial;
use std::{env, panic};

const CONFIG_VARS: [&str; 8] = [
    "APP_ENV",
    "API_BASE_URL",
    "API_MODE",
    "BIND_ADDR",
    "AUTH_COOKIE_NAME",
    "SESSION_MAX_AGE_SECS",
    "API_TIMEOUT_SECS",
    "SITE_TITLE",
];

// --- Setup/Teardown Utilities ---

/// Runs `test` with only `vars` set among the configuration variables, then
/// restores the original environment.
fn run_with_env<T, R>(vars: &[(&str, &str)], test: T) -> R
where
    T: FnOnce() -> R + panic::UnwindSafe,
{
    let originals: Vec<(&str, Option<String>)> = CONFIG_VARS
        .iter()
        .map(|&var| (var, env::var(var).ok()))
        .collect();

    unsafe {
        for var in CONFIG_VARS {
            env::remove_var(var);
        }
        for (key, value) in vars {
            env::set_var(key, value);
        }
    }

    let result = panic::catch_unwind(test);

    for (key, original_value) in originals.into_iter().rev() {
        unsafe {
            match original_value {
                Some(val) => env::set_var(key, val),
                None => env::remove_var(key),
            }
        }
    }

    match result {
        Ok(value) => value,
        Err(e) => panic::resume_unwind(e),
    }
}

// --- Tests ---

#[test]
#[serial]
fn test_app_config_production_fail_fast() {
    let result = panic::catch_unwind(|| {
        run_with_env(&[("APP_ENV", "production")], AppConfig::load)
    });
    assert!(
        result.is_err(),
        "Production config loading should panic without API_BASE_URL"
    );
}

#[test]
#[serial]
fn test_app_config_production_uses_http_backend() {
    let config = run_with_env(
        &[
            ("APP_ENV", "production"),
            ("API_BASE_URL", "https://api.example.com/"),
            ("API_MODE", "mock"),
        ],
        AppConfig::load,
    );

    assert_eq!(config.env, Env::Production);
    assert_eq!(config.api_mode, ApiMode::Http);
    assert_eq!(config.api_base_url, "https://api.example.com");
    assert!(config.secure_cookies());
}

#[test]
#[serial]
fn test_app_config_local_env_defaults() {
    let config = run_with_env(&[("APP_ENV", "local")], AppConfig::load);

    assert_eq!(config.env, Env::Local);
    // Without a backend URL the local site serves sample data.
    assert_eq!(config.api_mode, ApiMode::Mock);
    assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
    assert_eq!(config.bind_addr, "0.0.0.0:3000");
    assert_eq!(config.auth_cookie_name, DEFAULT_COOKIE_NAME);
    assert_eq!(config.session_max_age_secs, 604_800);
    assert_eq!(config.api_timeout_secs, 10);
    assert_eq!(config.site_title, "Portfolio");
    assert!(!config.secure_cookies());
}

#[test]
#[serial]
fn test_app_config_local_with_backend_url() {
    let config = run_with_env(
        &[
            ("API_BASE_URL", "http://backend:8080"),
            ("AUTH_COOKIE_NAME", "session"),
            ("SESSION_MAX_AGE_SECS", "3600"),
            ("API_TIMEOUT_SECS", "not-a-number"),
            ("SITE_TITLE", "Ada Lovelace"),
        ],
        AppConfig::load,
    );

    assert_eq!(config.api_mode, ApiMode::Http);
    assert_eq!(config.api_base_url, "http://backend:8080");
    assert_eq!(config.auth_cookie_name, "session");
    assert_eq!(config.session_max_age_secs, 3600);
    // Unparseable numbers fall back to the default.
    assert_eq!(config.api_timeout_secs, 10);
    assert_eq!(config.site_title, "Ada Lovelace");
}

#[test]
#[serial]
fn test_app_config_api_mode_override() {
    let config = run_with_env(
        &[("API_BASE_URL", "http://backend:8080"), ("API_MODE", "mock")],
        AppConfig::load,
    );
    assert_eq!(config.api_mode, ApiMode::Mock);
}
