//! HTTP client for the Nacos open-api.
//!
//! This module handles URL and header construction, Spas request signing,
//! and HTTP error classification. Only the two calls a settings source needs
//! are exposed: the readiness probe and the single-document fetch.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use hmac::{Hmac, Mac};
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, StatusCode};
use sha1::Sha1;
use thiserror::Error;

use crate::config::{ClientConfig, ConfigKey};

/// Endpoint answering readiness probes.
const HEALTH_ENDPOINT: &str = "/nacos/v1/console/health/readiness";
/// Endpoint serving configuration documents.
const CONFIG_ENDPOINT: &str = "/nacos/v1/cs/configs";

/// Error taxonomy for open-api calls.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Credentials were rejected by the server.
    #[error("unauthorized - invalid or missing Nacos credentials")]
    Unauthorized,
    /// The server answered with an unexpected status code.
    #[error("unexpected response status {0}")]
    Status(u16),
    /// Transport-level issue (DNS, TLS, socket, timeout).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    /// Request signing failed (malformed key material).
    #[error("request signing error: {0}")]
    Signature(String),
}

/// Client for a single Nacos server, reusable across requests.
#[derive(Debug, Clone)]
pub struct NacosClient {
    /// Underlying HTTP client with the configured timeout.
    client: Client,
    /// Open-api base URL (scheme + host + port).
    base_url: String,
    /// Namespace (tenant) scoping document lookups.
    namespace: Option<String>,
    /// Access key for Spas signing.
    access_key: Option<String>,
    /// Secret key for Spas signing.
    secret_key: Option<String>,
}

impl NacosClient {
    /// Builds a client from the provided connection configuration.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(ClientError::Transport)?;
        Ok(Self {
            client,
            base_url: config.base_url(),
            namespace: config.namespace.clone(),
            access_key: config.access_key.clone(),
            secret_key: config.secret_key.clone(),
        })
    }

    /// Returns the base URL currently configured for the client.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Probes the server's readiness endpoint.
    ///
    /// `Ok(true)` means the server accepted the probe, `Ok(false)` means it
    /// answered but reported itself unready (5xx). Transport failures and
    /// credential rejections surface as errors.
    pub async fn server_health(&self) -> Result<bool, ClientError> {
        let url = format!("{}{}", self.base_url, HEALTH_ENDPOINT);
        tracing::debug!(url = %url, "nacos readiness probe");
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        tracing::debug!(url = %url, status = %status, "nacos readiness response");
        if status.is_success() {
            return Ok(true);
        }
        if status.is_server_error() {
            // The server is reachable but not ready to serve configuration.
            return Ok(false);
        }
        classify_status(status)?;
        Ok(false)
    }

    /// Fetches one configuration document.
    ///
    /// `Ok(None)` signals that no document exists under the given key; the
    /// caller decides whether that is an error.
    pub async fn get_config(&self, key: &ConfigKey) -> Result<Option<String>, ClientError> {
        let url = format!("{}{}", self.base_url, CONFIG_ENDPOINT);
        let mut query: Vec<(&str, &str)> =
            vec![("dataId", key.data_id.as_str()), ("group", key.group.as_str())];
        if let Some(tenant) = &self.namespace {
            query.push(("tenant", tenant.as_str()));
        }
        let headers = self.signed_headers(&key.group)?;

        tracing::debug!(
            url = %url,
            data_id = %key.data_id,
            group = %key.group,
            tenant = self.namespace.as_deref().unwrap_or(""),
            signed = headers.contains_key("Spas-AccessKey"),
            "nacos config fetch"
        );
        let response = self
            .client
            .get(&url)
            .query(&query)
            .headers(headers)
            .send()
            .await?;
        let status = response.status();
        tracing::debug!(url = %url, status = %status, "nacos config response");

        if status == StatusCode::NOT_FOUND {
            // Absent documents are a normal outcome, not a failure.
            return Ok(None);
        }
        classify_status(status)?;
        let content = response.text().await?;
        Ok(Some(content))
    }

    /// Builds Spas signature headers when key material is configured.
    ///
    /// The signature covers `tenant+group+timestamp` (or `group+timestamp`
    /// without a namespace), HMAC-SHA1 under the secret key, base64-encoded.
    fn signed_headers(&self, group: &str) -> Result<HeaderMap, ClientError> {
        let mut headers = HeaderMap::new();
        let (Some(access_key), Some(secret_key)) = (&self.access_key, &self.secret_key) else {
            return Ok(headers);
        };

        let timestamp = unix_millis().to_string();
        let signing_input = match &self.namespace {
            Some(tenant) => format!("{tenant}+{group}+{timestamp}"),
            None => format!("{group}+{timestamp}"),
        };
        let mut mac = Hmac::<Sha1>::new_from_slice(secret_key.as_bytes())
            .map_err(|e| ClientError::Signature(e.to_string()))?;
        mac.update(signing_input.as_bytes());
        let signature = BASE64.encode(mac.finalize().into_bytes());

        headers.insert(
            "Spas-AccessKey",
            HeaderValue::from_str(access_key)
                .map_err(|e| ClientError::Signature(e.to_string()))?,
        );
        headers.insert(
            "timeStamp",
            HeaderValue::from_str(&timestamp)
                .map_err(|e| ClientError::Signature(e.to_string()))?,
        );
        headers.insert(
            "Spas-Signature",
            HeaderValue::from_str(&signature)
                .map_err(|e| ClientError::Signature(e.to_string()))?,
        );
        Ok(headers)
    }
}

/// Maps HTTP status codes to the client error taxonomy.
fn classify_status(status: StatusCode) -> Result<(), ClientError> {
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        // Credential failure: retrying without new key material cannot help.
        return Err(ClientError::Unauthorized);
    }
    if !status.is_success() {
        return Err(ClientError::Status(status.as_u16()));
    }
    Ok(())
}

/// Milliseconds since the Unix epoch, saturating at zero on clock skew.
fn unix_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_millis()
}
