use std::env;
use std::time::Duration;

use crate::error::ConfigError;

/// Runtime settings, read from the environment (and `.env` through dotenvy).
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Base of the main REST API, e.g. `http://host/api`.
    pub api_base_url: String,
    /// Host serving `/api/get-staffs/*` and `/api/assign-machine`.
    pub assignment_api_url: String,
    pub jwt_secret: String,
    pub request_timeout: Duration,
    /// Delay between a successful login and the role redirect.
    pub login_redirect: Duration,
    /// A scanner left without events for this long is considered abandoned.
    pub scan_idle: Duration,
}

const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api";

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_base_url = env::var("API_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let assignment_api_url = match env::var("ASSIGNMENT_API_URL") {
            Ok(url) => url.trim_end_matches('/').to_string(),
            Err(_) => api_base_url.trim_end_matches("/api").to_string(),
        };

        let jwt_secret = env::var("JWT_SECRET").map_err(|_| ConfigError::Missing("JWT_SECRET"))?;
        if jwt_secret.is_empty() {
            return Err(ConfigError::Invalid("JWT_SECRET", "must not be empty".to_string()));
        }

        Ok(Self {
            port: parse_var("PORT", 3000)?,
            api_base_url,
            assignment_api_url,
            jwt_secret,
            request_timeout: Duration::from_secs(parse_var("REQUEST_TIMEOUT_SECS", 30)?),
            login_redirect: Duration::from_millis(parse_var("LOGIN_REDIRECT_MS", 800)?),
            scan_idle: Duration::from_secs(parse_var("SCAN_IDLE_SECS", 120)?),
        })
    }

    /// Settings pointing both API bases at one server. Used by tests and local runs.
    pub fn for_api(api_base_url: &str, jwt_secret: &str) -> Self {
        let api_base_url = api_base_url.trim_end_matches('/').to_string();
        Self {
            port: 3000,
            assignment_api_url: api_base_url.trim_end_matches("/api").to_string(),
            api_base_url,
            jwt_secret: jwt_secret.to_string(),
            request_timeout: Duration::from_secs(30),
            login_redirect: Duration::from_millis(800),
            scan_idle: Duration::from_secs(120),
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid(name, raw)),
        Err(_) => Ok(default),
    }
}
