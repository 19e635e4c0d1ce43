//! Card store configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Server (read once at startup)
//! - `STORE_HOST` - Bind address (default: 127.0.0.1)
//! - `STORE_PORT` - Listen port (default: 8888)
//! - `STORE_BACKEND` - `netlify` or `memory` (default: netlify)
//! - `NETLIFY_BLOBS_API` - Blobs API base URL (default: <https://api.netlify.com/api/v1/blobs>)
//! - `STORE_TIMEOUT_SECS` - Timeout for each blob store request (default: 10)
//! - `LOG_FORMAT` - `json` for structured logs, anything else for text
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_TRACES_SAMPLE_RATE` - Fraction of requests traced (default: 0.0)
//!
//! ## Blob store credentials (read on every request)
//! - `SITE_ID` - Netlify site id owning the blob store
//! - `NETLIFY_API_TOKEN` - Personal access token for the Blobs API
//!
//! Credentials are not part of [`StoreConfig`]. They are resolved per request
//! so a missing value surfaces as `500 Server config missing` on the request
//! that needed it rather than preventing startup.

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Namespace every card blob lives under.
pub const CARDS_STORE_NAME: &str = "cards";

const DEFAULT_BLOBS_API: &str = "https://api.netlify.com/api/v1/blobs";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Which blob store implementation serves requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// Netlify Blobs over its HTTP API.
    Netlify,
    /// Process-local map; contents are lost on restart.
    Memory,
}

/// Card store application configuration.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Blob store implementation
    pub backend: BackendKind,
    /// Netlify Blobs API settings
    pub netlify: NetlifyConfig,
    /// Emit JSON log lines instead of text
    pub json_logs: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Sentry performance tracing sample rate
    pub sentry_traces_sample_rate: f32,
}

/// Netlify Blobs API settings that do not include credentials.
#[derive(Debug, Clone)]
pub struct NetlifyConfig {
    /// Base URL of the Blobs API
    pub api_base: Url,
    /// Blob store namespace
    pub store_name: String,
    /// Timeout for each request to the API
    pub timeout: Duration,
}

/// Credentials for the Netlify Blobs API.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone)]
pub struct NetlifyCredentials {
    /// Netlify site id
    pub site_id: String,
    /// API access token
    pub token: SecretString,
}

impl std::fmt::Debug for NetlifyCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NetlifyCredentials")
            .field("site_id", &self.site_id)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

impl NetlifyCredentials {
    /// Resolve credentials through `lookup`.
    ///
    /// Empty values count as missing.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` naming the first absent variable.
    pub fn from_lookup(lookup: &dyn Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let site_id = get_required(lookup, "SITE_ID")?;
        let token = get_required(lookup, "NETLIFY_API_TOKEN")?;
        Ok(Self {
            site_id,
            token: SecretString::from(token),
        })
    }
}

impl StoreConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(&env_lookup)
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but cannot be parsed.
    pub fn from_lookup(lookup: &dyn Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = parse_or_default::<IpAddr>(lookup, "STORE_HOST", "127.0.0.1")?;
        let port = parse_or_default::<u16>(lookup, "STORE_PORT", "8888")?;
        let backend = match get_or_default(lookup, "STORE_BACKEND", "netlify").as_str() {
            "netlify" => BackendKind::Netlify,
            "memory" => BackendKind::Memory,
            other => {
                return Err(ConfigError::InvalidEnvVar(
                    "STORE_BACKEND".to_string(),
                    format!("expected 'netlify' or 'memory', got '{other}'"),
                ));
            }
        };
        let api_base = parse_or_default::<Url>(lookup, "NETLIFY_BLOBS_API", DEFAULT_BLOBS_API)?;
        let timeout_secs = parse_or_default::<u64>(lookup, "STORE_TIMEOUT_SECS", "10")?;
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "STORE_TIMEOUT_SECS".to_string(),
                "must be at least 1".to_string(),
            ));
        }
        let sentry_traces_sample_rate =
            parse_or_default::<f32>(lookup, "SENTRY_TRACES_SAMPLE_RATE", "0.0")?;

        Ok(Self {
            host,
            port,
            backend,
            netlify: NetlifyConfig {
                api_base,
                store_name: CARDS_STORE_NAME.to_string(),
                timeout: Duration::from_secs(timeout_secs),
            },
            json_logs: lookup("LOG_FORMAT").is_some_and(|v| v.eq_ignore_ascii_case("json")),
            sentry_dsn: get_optional(lookup, "SENTRY_DSN"),
            sentry_environment: get_optional(lookup, "SENTRY_ENVIRONMENT"),
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Read a variable from the process environment.
pub fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get a required, non-empty variable.
fn get_required(lookup: &dyn Fn(&str) -> Option<String>, key: &str) -> Result<String, ConfigError> {
    get_optional(lookup, key).ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional variable, treating empty values as absent.
fn get_optional(lookup: &dyn Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key).filter(|v| !v.trim().is_empty())
}

/// Get a variable with a default value.
fn get_or_default(lookup: &dyn Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    get_optional(lookup, key).unwrap_or_else(|| default.to_string())
}

/// Parse a variable, falling back to `default` when unset.
fn parse_or_default<T>(
    lookup: &dyn Fn(&str) -> Option<String>,
    key: &str,
    default: &str,
) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    get_or_default(lookup, key, default)
        .trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use secrecy::ExposeSecret;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = StoreConfig::from_lookup(&lookup_from(&[])).unwrap();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:8888");
        assert_eq!(config.backend, BackendKind::Netlify);
        assert_eq!(
            config.netlify.api_base.as_str(),
            "https://api.netlify.com/api/v1/blobs"
        );
        assert_eq!(config.netlify.store_name, "cards");
        assert_eq!(config.netlify.timeout, Duration::from_secs(10));
        assert!(!config.json_logs);
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = StoreConfig::from_lookup(&lookup_from(&[
            ("STORE_HOST", "0.0.0.0"),
            ("STORE_PORT", "9000"),
            ("STORE_BACKEND", "memory"),
            ("NETLIFY_BLOBS_API", "http://localhost:4000/blobs"),
            ("STORE_TIMEOUT_SECS", "3"),
            ("LOG_FORMAT", "JSON"),
            ("SENTRY_DSN", "https://key@sentry.example/1"),
        ]))
        .unwrap();

        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:9000");
        assert_eq!(config.backend, BackendKind::Memory);
        assert_eq!(config.netlify.api_base.host_str(), Some("localhost"));
        assert_eq!(config.netlify.timeout, Duration::from_secs(3));
        assert!(config.json_logs);
        assert!(config.sentry_dsn.is_some());
    }

    #[test]
    fn test_invalid_port() {
        let err = StoreConfig::from_lookup(&lookup_from(&[("STORE_PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "STORE_PORT"));
    }

    #[test]
    fn test_invalid_backend() {
        let err = StoreConfig::from_lookup(&lookup_from(&[("STORE_BACKEND", "s3")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "STORE_BACKEND"));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let err =
            StoreConfig::from_lookup(&lookup_from(&[("STORE_TIMEOUT_SECS", "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));
    }

    #[test]
    fn test_credentials_missing() {
        let err = NetlifyCredentials::from_lookup(&lookup_from(&[("SITE_ID", "site-1")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(key) if key == "NETLIFY_API_TOKEN"));

        let err = NetlifyCredentials::from_lookup(&lookup_from(&[
            ("SITE_ID", ""),
            ("NETLIFY_API_TOKEN", "tok"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(key) if key == "SITE_ID"));
    }

    #[test]
    fn test_credentials_debug_redacts_token() {
        let creds = NetlifyCredentials::from_lookup(&lookup_from(&[
            ("SITE_ID", "site-123"),
            ("NETLIFY_API_TOKEN", "nfp_super_secret_token"),
        ]))
        .unwrap();

        assert_eq!(creds.token.expose_secret(), "nfp_super_secret_token");

        let debug_output = format!("{creds:?}");
        assert!(debug_output.contains("site-123"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("nfp_super_secret_token"));
    }
}
