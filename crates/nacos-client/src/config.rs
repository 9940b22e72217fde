//! Environment-driven connection parameters for the Nacos client.
//!
//! Connection settings are read once, at application startup, and passed into
//! the client explicitly. Nothing in this module touches ambient global state
//! after construction; the iterator-based constructor exists so tests can
//! supply a synthetic environment.

use std::collections::HashMap;
use std::env;
use std::time::Duration;

/// Environment variable carrying the Nacos access key.
const ENV_ACCESS_KEY: &str = "NACOS_ACCESS_KEY";
/// Environment variable carrying the Nacos secret key.
const ENV_SECRET_KEY: &str = "NACOS_SECRET_KEY";
/// Environment variable pointing at the Nacos server (`host:port`).
const ENV_SERVER_ADDR: &str = "NACOS_SERVER_ADDR";
/// Environment variable selecting the Nacos namespace (tenant).
const ENV_NAMESPACE: &str = "NACOS_NAMESPACE";
/// Environment variable overriding the request timeout, in milliseconds.
const ENV_TIMEOUT_MS: &str = "NACOS_TIMEOUT_MS";
/// Environment variable selecting the configuration document's data-id.
const ENV_DATA_ID: &str = "NACOS_DATA_ID";
/// Environment variable selecting the configuration document's group.
const ENV_GROUP: &str = "NACOS_GROUP";

/// Server address used when none is supplied.
const DEFAULT_SERVER_ADDR: &str = "localhost:8848";
/// Request timeout used when none is supplied (matches the upstream client's
/// 5000 ms RPC timeout).
const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5000);
/// Group assigned by the Nacos server when a publisher specifies none.
const DEFAULT_GROUP: &str = "DEFAULT_GROUP";
/// Fallback data-id kept for compatibility with unconfigured deployments.
const FALLBACK_DATA_ID: &str = "com.alibaba.nacos.test.config";

/// Connection parameters for a [`crate::NacosClient`].
///
/// Built once and treated as read-only for the life of the process.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Optional access key used to sign requests.
    pub access_key: Option<String>,
    /// Optional secret key used to sign requests.
    pub secret_key: Option<String>,
    /// Server address, either `host:port` or a full `http(s)://` URL.
    pub server_addr: String,
    /// Optional namespace (tenant) scoping all document lookups.
    pub namespace: Option<String>,
    /// Timeout applied to every request.
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            access_key: None,
            secret_key: None,
            server_addr: DEFAULT_SERVER_ADDR.to_string(),
            namespace: None,
            request_timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientConfig {
    /// Builds settings from the current process environment.
    ///
    /// Side-effect free apart from reading `std::env::vars`.
    pub fn from_os_env() -> Self {
        Self::from_env_iter(env::vars())
    }

    /// Builds settings from an iterator of key/value pairs (typically for tests).
    pub fn from_env_iter<I, K, V>(iter: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map: HashMap<String, String> = iter
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();

        let access_key = map
            .get(ENV_ACCESS_KEY)
            .and_then(|value| sanitize_non_empty(value));
        let secret_key = map
            .get(ENV_SECRET_KEY)
            .and_then(|value| sanitize_non_empty(value));
        let server_addr = map
            .get(ENV_SERVER_ADDR)
            .and_then(|value| sanitize_non_empty(value))
            .unwrap_or_else(|| DEFAULT_SERVER_ADDR.to_string());
        let namespace = map
            .get(ENV_NAMESPACE)
            .and_then(|value| sanitize_non_empty(value));
        let request_timeout = map
            .get(ENV_TIMEOUT_MS)
            .and_then(|value| value.trim().parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_TIMEOUT);

        Self {
            access_key,
            secret_key,
            server_addr,
            namespace,
            request_timeout,
        }
    }

    /// Builds the base URL for open-api requests.
    ///
    /// A bare `host:port` address gets an `http://` scheme (the open-api
    /// listens on the plain HTTP port by default); addresses that already
    /// carry a scheme are used as-is.
    pub fn base_url(&self) -> String {
        let addr = self.server_addr.trim_end_matches('/');
        if addr.starts_with("http://") || addr.starts_with("https://") {
            addr.to_string()
        } else {
            format!("http://{addr}")
        }
    }
}

/// Coordinates of a configuration document on the server.
///
/// The observed upstream source hard-coded the data-id and group; they are
/// configurable here, with the old literals surviving only as fallback
/// defaults so an unconfigured deployment keeps fetching the same document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigKey {
    /// Document identifier within the group.
    pub data_id: String,
    /// Group the document belongs to.
    pub group: String,
}

impl ConfigKey {
    /// Creates a key from explicit coordinates.
    pub fn new(data_id: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            data_id: data_id.into(),
            group: group.into(),
        }
    }

    /// Reads the key from the current process environment.
    pub fn from_os_env() -> Self {
        Self::from_env_iter(env::vars())
    }

    /// Reads the key from an iterator of key/value pairs (typically for tests).
    pub fn from_env_iter<I, K, V>(iter: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map: HashMap<String, String> = iter
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();

        let data_id = map
            .get(ENV_DATA_ID)
            .and_then(|value| sanitize_non_empty(value))
            .unwrap_or_else(|| FALLBACK_DATA_ID.to_string());
        let group = map
            .get(ENV_GROUP)
            .and_then(|value| sanitize_non_empty(value))
            .unwrap_or_else(|| DEFAULT_GROUP.to_string());

        Self { data_id, group }
    }
}

/// Helper trimming whitespace and discarding empty values.
fn sanitize_non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Ensures defaults match the expected address, timeout, and key settings.
    #[test]
    fn client_config_defaults() {
        let config = ClientConfig::from_env_iter::<Vec<(String, String)>, _, _>(vec![]);
        assert_eq!(config.server_addr, DEFAULT_SERVER_ADDR);
        assert_eq!(config.base_url(), "http://localhost:8848");
        assert_eq!(config.request_timeout, DEFAULT_TIMEOUT);
        assert!(config.access_key.is_none());
        assert!(config.secret_key.is_none());
        assert!(config.namespace.is_none());
    }

    /// Confirms environment-derived settings respect overrides.
    #[test]
    fn client_config_honours_overrides() {
        let config = ClientConfig::from_env_iter([
            (ENV_ACCESS_KEY, "  ak "),
            (ENV_SECRET_KEY, "sk"),
            (ENV_SERVER_ADDR, "nacos.internal:8848"),
            (ENV_NAMESPACE, "staging"),
            (ENV_TIMEOUT_MS, "2500"),
        ]);
        assert_eq!(config.access_key.as_deref(), Some("ak"));
        assert_eq!(config.secret_key.as_deref(), Some("sk"));
        assert_eq!(config.server_addr, "nacos.internal:8848");
        assert_eq!(config.namespace.as_deref(), Some("staging"));
        assert_eq!(config.request_timeout, Duration::from_millis(2500));
        assert_eq!(config.base_url(), "http://nacos.internal:8848");
    }

    /// Blank and unparsable values fall back to defaults instead of erroring.
    #[test]
    fn client_config_ignores_blank_and_invalid_values() {
        let config = ClientConfig::from_env_iter([
            (ENV_ACCESS_KEY, "   "),
            (ENV_SERVER_ADDR, ""),
            (ENV_TIMEOUT_MS, "soon"),
        ]);
        assert!(config.access_key.is_none());
        assert_eq!(config.server_addr, DEFAULT_SERVER_ADDR);
        assert_eq!(config.request_timeout, DEFAULT_TIMEOUT);
    }

    /// Addresses with an explicit scheme are passed through untouched.
    #[test]
    fn base_url_keeps_explicit_scheme() {
        let config = ClientConfig {
            server_addr: "https://nacos.example.com/".to_string(),
            ..Default::default()
        };
        assert_eq!(config.base_url(), "https://nacos.example.com");
    }

    /// The document key falls back to the compatibility literals.
    #[test]
    fn config_key_defaults_to_compat_literals() {
        let key = ConfigKey::from_env_iter::<Vec<(String, String)>, _, _>(vec![]);
        assert_eq!(key.data_id, FALLBACK_DATA_ID);
        assert_eq!(key.group, DEFAULT_GROUP);
    }

    /// Environment overrides take precedence over the fallback key.
    #[test]
    fn config_key_honours_environment() {
        let key = ConfigKey::from_env_iter([(ENV_DATA_ID, "app.yaml"), (ENV_GROUP, "PROD")]);
        assert_eq!(key, ConfigKey::new("app.yaml", "PROD"));
    }
}
