use crate::auth::challenge::{DEFAULT_NONCE_BYTES, MIN_NONCE_BYTES};
use std::env;
use std::net::SocketAddr;

/// Upper bound on `NONCE_BYTES`; keeps challenge messages a sane size.
const MAX_NONCE_BYTES: usize = 1024;

#[derive(Debug, Clone)]
pub struct Config {
    // Server
    pub bind_addr: SocketAddr,

    // TTLs (in seconds)
    pub session_ttl_secs: u64,
    pub challenge_ttl_secs: u64,

    // Challenges
    pub nonce_bytes: usize,
    pub max_pending_challenges: usize,

    // Background sweep (0 = off)
    pub cleanup_interval_secs: u64,

    // Session cookie
    pub cookie_name: String,
    pub cookie_secure: bool,

    // Browser origin allowed to call the API with credentials
    pub cors_origin: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),

    #[error("Failed to parse {0}: {1}")]
    ParseError(String, String),
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        // Attempt to load .env file, but don't fail if it doesn't exist
        // (env vars may be set directly in production)
        let _ = dotenvy::dotenv();

        // Server
        let bind_addr_str = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3001".to_string());
        let bind_addr = bind_addr_str
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::ParseError("BIND_ADDR".to_string(), e.to_string()))?;

        // TTLs
        let session_ttl_secs = parse_env_or_default("SESSION_TTL_SECS", 86_400)?;
        if session_ttl_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "SESSION_TTL_SECS".to_string(),
                "must be greater than 0".to_string(),
            ));
        }
        let challenge_ttl_secs = parse_env_or_default("CHALLENGE_TTL_SECS", 300)?;

        // Challenges
        let nonce_bytes = parse_env_or_default("NONCE_BYTES", DEFAULT_NONCE_BYTES)?;
        if !(MIN_NONCE_BYTES..=MAX_NONCE_BYTES).contains(&nonce_bytes) {
            return Err(ConfigError::InvalidValue(
                "NONCE_BYTES".to_string(),
                format!("must be between {} and {}", MIN_NONCE_BYTES, MAX_NONCE_BYTES),
            ));
        }
        let max_pending_challenges = parse_env_or_default("MAX_PENDING_CHALLENGES", 100_000)?;
        if max_pending_challenges == 0 {
            return Err(ConfigError::InvalidValue(
                "MAX_PENDING_CHALLENGES".to_string(),
                "must be greater than 0".to_string(),
            ));
        }

        let cleanup_interval_secs = parse_env_or_default("CLEANUP_INTERVAL_SECS", 60)?;

        // Session cookie
        let cookie_name = env::var("COOKIE_NAME").unwrap_or_else(|_| "sid".to_string());
        if cookie_name.is_empty()
            || !cookie_name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(ConfigError::InvalidValue(
                "COOKIE_NAME".to_string(),
                "must be non-empty and contain only alphanumeric characters, hyphens, and underscores"
                    .to_string(),
            ));
        }
        let cookie_secure = parse_env_or_default("COOKIE_SECURE", false)?;

        // CORS
        let cors_origin = match env::var("CORS_ORIGIN") {
            Ok(origin) if !origin.trim().is_empty() => {
                let origin = origin.trim().to_string();
                axum::http::HeaderValue::from_str(&origin).map_err(|e| {
                    ConfigError::InvalidValue("CORS_ORIGIN".to_string(), e.to_string())
                })?;
                Some(origin)
            }
            _ => None,
        };

        Ok(Config {
            bind_addr,
            session_ttl_secs,
            challenge_ttl_secs,
            nonce_bytes,
            max_pending_challenges,
            cleanup_interval_secs,
            cookie_name,
            cookie_secure,
            cors_origin,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3001)),
            session_ttl_secs: 86_400,
            challenge_ttl_secs: 300,
            nonce_bytes: DEFAULT_NONCE_BYTES,
            max_pending_challenges: 100_000,
            cleanup_interval_secs: 60,
            cookie_name: "sid".to_string(),
            cookie_secure: false,
            cors_origin: None,
        }
    }
}

/// Helper function to parse environment variable with a default value
fn parse_env_or_default<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(val) => val
            .parse::<T>()
            .map_err(|e| ConfigError::ParseError(key.to_string(), format!("{}: {}", e, val))),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Use a mutex to ensure tests run serially since they modify global env vars.
    // unwrap_or_else handles poison from prior panics.
    static TEST_MUTEX: Mutex<()> = Mutex::new(());

    fn lock_test() -> std::sync::MutexGuard<'static, ()> {
        TEST_MUTEX.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn clear_test_env() {
        env::remove_var("BIND_ADDR");
        env::remove_var("SESSION_TTL_SECS");
        env::remove_var("CHALLENGE_TTL_SECS");
        env::remove_var("NONCE_BYTES");
        env::remove_var("MAX_PENDING_CHALLENGES");
        env::remove_var("CLEANUP_INTERVAL_SECS");
        env::remove_var("COOKIE_NAME");
        env::remove_var("COOKIE_SECURE");
        env::remove_var("CORS_ORIGIN");
    }

    #[test]
    fn test_parse_env_or_default() {
        let _guard = lock_test();

        env::set_var("TEST_U64", "12345");
        let result: Result<u64, ConfigError> = parse_env_or_default("TEST_U64", 100);
        assert_eq!(result.unwrap(), 12345);

        env::remove_var("TEST_U64");
        let result: Result<u64, ConfigError> = parse_env_or_default("TEST_U64", 100);
        assert_eq!(result.unwrap(), 100);
    }

    #[test]
    fn test_invalid_socket_addr() {
        let _guard = lock_test();
        clear_test_env();

        env::set_var("BIND_ADDR", "invalid_address");

        let result = Config::from_env();
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), ConfigError::ParseError(_, _)));

        clear_test_env();
    }

    #[test]
    fn test_zero_session_ttl_rejected() {
        let _guard = lock_test();
        clear_test_env();

        env::set_var("SESSION_TTL_SECS", "0");

        let result = Config::from_env();
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::InvalidValue(ref s, _) if s == "SESSION_TTL_SECS"
        ));

        clear_test_env();
    }

    #[test]
    fn test_nonce_bytes_too_small() {
        let _guard = lock_test();
        clear_test_env();

        env::set_var("NONCE_BYTES", "16");

        let result = Config::from_env();
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::InvalidValue(ref s, _) if s == "NONCE_BYTES"
        ));

        clear_test_env();
    }

    #[test]
    fn test_nonce_bytes_not_a_number() {
        let _guard = lock_test();
        clear_test_env();

        env::set_var("NONCE_BYTES", "lots");

        let result = Config::from_env();
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::ParseError(ref s, _) if s == "NONCE_BYTES"
        ));

        clear_test_env();
    }

    #[test]
    fn test_zero_max_pending_challenges_rejected() {
        let _guard = lock_test();
        clear_test_env();

        env::set_var("MAX_PENDING_CHALLENGES", "0");

        let result = Config::from_env();
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::InvalidValue(ref s, _) if s == "MAX_PENDING_CHALLENGES"
        ));

        clear_test_env();
    }

    #[test]
    fn test_invalid_cookie_name() {
        let _guard = lock_test();
        clear_test_env();

        env::set_var("COOKIE_NAME", "my cookie;");

        let result = Config::from_env();
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::InvalidValue(ref s, _) if s == "COOKIE_NAME"
        ));

        clear_test_env();
    }

    #[test]
    fn test_cookie_secure_parsing() {
        let _guard = lock_test();
        clear_test_env();

        env::set_var("COOKIE_SECURE", "true");
        assert!(Config::from_env().unwrap().cookie_secure);

        env::set_var("COOKIE_SECURE", "yes");
        assert!(matches!(
            Config::from_env().unwrap_err(),
            ConfigError::ParseError(ref s, _) if s == "COOKIE_SECURE"
        ));

        clear_test_env();
    }

    #[test]
    fn test_cors_origin() {
        let _guard = lock_test();
        clear_test_env();

        env::set_var("CORS_ORIGIN", " http://localhost:5173 ");
        let config = Config::from_env().unwrap();
        assert_eq!(config.cors_origin.as_deref(), Some("http://localhost:5173"));

        env::set_var("CORS_ORIGIN", "");
        assert!(Config::from_env().unwrap().cors_origin.is_none());

        clear_test_env();
    }

    #[test]
    fn test_config_defaults() {
        let _guard = lock_test();
        clear_test_env();

        // Override any .env values to ensure predictable defaults
        env::set_var("BIND_ADDR", "0.0.0.0:3001");

        let config = Config::from_env().unwrap();

        assert_eq!(config.bind_addr.to_string(), "0.0.0.0:3001");
        assert_eq!(config.session_ttl_secs, 86_400);
        assert_eq!(config.challenge_ttl_secs, 300);
        assert_eq!(config.nonce_bytes, 32);
        assert_eq!(config.max_pending_challenges, 100_000);
        assert_eq!(config.cleanup_interval_secs, 60);
        assert_eq!(config.cookie_name, "sid");
        assert!(!config.cookie_secure);
        assert!(config.cors_origin.is_none());

        let fallback = Config::default();
        assert_eq!(fallback.bind_addr, config.bind_addr);
        assert_eq!(fallback.session_ttl_secs, config.session_ttl_secs);

        clear_test_env();
    }
    #[test]
    fn test_no_variable_is_required() {
        let _guard = lock_test();
        clear_test_env();

        let config = Config::from_env().unwrap();
        assert_eq!(config.session_ttl_secs, 86_400);
        assert_eq!(config.cookie_name, "sid");

        clear_test_env();
    }
}
