/*
 * Responsibility
 * - Read settings from the environment (.env supported)
 * - Validate them (startup fails on bad values)
 */
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::middleware::http::HttpLimits;
use crate::services::auth::{KeySource, TokenPolicy};

const MAX_ACCESS_TOKEN_TTL_SECONDS: u64 = 30 * 24 * 60 * 60;
const MAX_ACCESS_TOKEN_LEEWAY_SECONDS: u64 = 60 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::to_ascii_lowercase).as_deref() {
            Some("production") | Some("prod") => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,
    // In-memory store when absent
    pub database_url: Option<String>,

    pub auth_issuer: String,
    pub auth_audience: Vec<String>,
    pub access_token_ttl_seconds: u64,
    pub access_token_leeway_seconds: u64,

    pub private_key: KeySource,
    pub public_key: KeySource,

    pub request_timeout_seconds: u64,
    pub request_body_limit_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key → value source (the process environment in production).
    pub fn from_lookup<F>(get: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = parse_or(&get, "PORT", 8080)?;
        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::parse(get("APP_ENV").as_deref());

        let database_url = get("DATABASE_URL").filter(|s| !s.trim().is_empty());

        let auth_issuer = get("AUTH_ISSUER").unwrap_or_else(|| "service project".to_string());
        if auth_issuer.trim().is_empty() {
            return Err(ConfigError::Invalid("AUTH_ISSUER"));
        }

        let auth_audience = get("AUTH_AUDIENCE")
            .unwrap_or_else(|| "students".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();
        if auth_audience.is_empty() {
            return Err(ConfigError::Invalid("AUTH_AUDIENCE"));
        }

        let access_token_ttl_seconds = parse_or(&get, "ACCESS_TOKEN_TTL_SECONDS", 3600)?;
        if !(1..=MAX_ACCESS_TOKEN_TTL_SECONDS).contains(&access_token_ttl_seconds) {
            return Err(ConfigError::Invalid("ACCESS_TOKEN_TTL_SECONDS"));
        }
        let access_token_leeway_seconds = parse_or(&get, "ACCESS_TOKEN_LEEWAY_SECONDS", 0)?;
        if access_token_leeway_seconds > MAX_ACCESS_TOKEN_LEEWAY_SECONDS {
            return Err(ConfigError::Invalid("ACCESS_TOKEN_LEEWAY_SECONDS"));
        }

        let private_key = key_source(&get, "AUTH_PRIVATE_KEY_PEM", "AUTH_PRIVATE_KEY_PATH", "private.pem");
        let public_key = key_source(&get, "AUTH_PUBLIC_KEY_PEM", "AUTH_PUBLIC_KEY_PATH", "pubkey.pem");

        let request_timeout_seconds = parse_or(&get, "REQUEST_TIMEOUT_SECONDS", 30)?;
        let request_body_limit_bytes = parse_or(&get, "REQUEST_BODY_LIMIT_BYTES", 1024 * 1024)?;

        Ok(Self {
            addr,
            app_env,
            database_url,
            auth_issuer,
            auth_audience,
            access_token_ttl_seconds,
            access_token_leeway_seconds,
            private_key,
            public_key,
            request_timeout_seconds,
            request_body_limit_bytes,
        })
    }

    // TTL and leeway are bounded in `from_lookup`, so the conversions cannot wrap.
    pub fn token_policy(&self) -> TokenPolicy {
        TokenPolicy {
            issuer: self.auth_issuer.clone(),
            audience: self.auth_audience.clone(),
            ttl: chrono::Duration::seconds(seconds(self.access_token_ttl_seconds)),
            leeway: chrono::Duration::seconds(seconds(self.access_token_leeway_seconds)),
        }
    }

    pub fn http_limits(&self) -> HttpLimits {
        HttpLimits {
            timeout: Duration::from_secs(self.request_timeout_seconds),
            body_limit_bytes: self.request_body_limit_bytes,
        }
    }
}

fn seconds(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

// Unset → default; set but unparsable → Invalid.
fn parse_or<F, T>(get: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match get(key) {
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid(key)),
        None => Ok(default),
    }
}

// Inline PEM wins over a path.
fn key_source<F>(get: &F, pem_key: &str, path_key: &str, default_path: &str) -> KeySource
where
    F: Fn(&str) -> Option<String>,
{
    match get(pem_key).filter(|s| !s.trim().is_empty()) {
        Some(pem) => KeySource::Pem(pem.replace("\\n", "\n")),
        None => KeySource::File(PathBuf::from(
            get(path_key).unwrap_or_else(|| default_path.to_string()),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_match_the_classic_setup() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.addr.port(), 8080);
        assert_eq!(cfg.app_env, AppEnv::Development);
        assert!(cfg.database_url.is_none());
        assert_eq!(cfg.auth_issuer, "service project");
        assert_eq!(cfg.auth_audience, vec!["students".to_string()]);
        assert_eq!(cfg.access_token_ttl_seconds, 3600);
        assert_eq!(cfg.access_token_leeway_seconds, 0);
        assert_eq!(cfg.private_key, KeySource::File("private.pem".into()));
        assert_eq!(cfg.public_key, KeySource::File("pubkey.pem".into()));
    }

    #[test]
    fn inline_pem_wins_and_is_unescaped() {
        let cfg = config(&[
            ("AUTH_PRIVATE_KEY_PEM", "-----BEGIN-----\\nabc"),
            ("AUTH_PRIVATE_KEY_PATH", "/ignored.pem"),
        ])
        .unwrap();
        assert_eq!(cfg.private_key, KeySource::Pem("-----BEGIN-----\nabc".into()));
    }

    #[test]
    fn audience_is_comma_separated() {
        let cfg = config(&[("AUTH_AUDIENCE", "students, staff ,")]).unwrap();
        assert_eq!(cfg.auth_audience, vec!["students", "staff"]);
    }

    #[test]
    fn bad_numbers_are_invalid_not_defaulted() {
        assert!(matches!(
            config(&[("PORT", "eighty")]),
            Err(ConfigError::Invalid("PORT"))
        ));
        assert!(matches!(
            config(&[("ACCESS_TOKEN_TTL_SECONDS", "0")]),
            Err(ConfigError::Invalid("ACCESS_TOKEN_TTL_SECONDS"))
        ));
    }

    #[test]
    fn token_lifetimes_outside_their_bounds_are_invalid() {
        for ttl in ["9000000000000", "18446744073709551615", "2592001"] {
            assert!(
                matches!(
                    config(&[("ACCESS_TOKEN_TTL_SECONDS", ttl)]),
                    Err(ConfigError::Invalid("ACCESS_TOKEN_TTL_SECONDS"))
                ),
                "{ttl}"
            );
        }
        for leeway in ["9000000000000", "18446744073709551615", "3601"] {
            assert!(
                matches!(
                    config(&[("ACCESS_TOKEN_LEEWAY_SECONDS", leeway)]),
                    Err(ConfigError::Invalid("ACCESS_TOKEN_LEEWAY_SECONDS"))
                ),
                "{leeway}"
            );
        }
        assert!(matches!(
            config(&[("ACCESS_TOKEN_TTL_SECONDS", "-1")]),
            Err(ConfigError::Invalid("ACCESS_TOKEN_TTL_SECONDS"))
        ));
    }

    #[test]
    fn largest_accepted_lifetimes_build_a_positive_policy() {
        let cfg = config(&[
            ("ACCESS_TOKEN_TTL_SECONDS", "2592000"),
            ("ACCESS_TOKEN_LEEWAY_SECONDS", "3600"),
        ])
        .unwrap();
        let policy = cfg.token_policy();
        assert_eq!(policy.ttl, chrono::Duration::days(30));
        assert_eq!(policy.leeway, chrono::Duration::hours(1));
    }

    #[test]
    fn production_env_is_recognised() {
        let cfg = config(&[("APP_ENV", "PROD")]).unwrap();
        assert!(cfg.app_env.is_production());
    }
}
