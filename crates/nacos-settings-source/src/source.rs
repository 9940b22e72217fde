//! The Nacos-backed settings source.
//!
//! Initialization is a single pass: build the client, probe readiness, fetch
//! the configured document, parse it, and store the result as an immutable
//! snapshot. Every failure along that path is fatal to construction; after
//! construction the source is read-only and safe to share across threads.

use std::collections::HashMap;

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, trace};

use nacos_client::{ClientConfig, ClientError, ConfigKey, NacosClient};

use crate::fields::{FieldSpec, FieldValue, SettingsSource};
use crate::parse::{parse_content, ParseError};

/// Name this source reports to the settings framework.
const SOURCE_NAME: &str = "nacos";

/// Errors raised while constructing or querying the source.
///
/// A closed set of kinds, each carrying the originating message, so callers
/// get a human-readable diagnosis without the upstream error's type.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The client could not be built or the server could not be reached.
    #[error("failed to connect to nacos: {0}")]
    Connectivity(ClientError),
    /// The server answered the readiness probe but reported itself unready.
    #[error("nacos server is not healthy")]
    Unhealthy,
    /// The document fetch itself failed.
    #[error("failed to get config from nacos: {0}")]
    Fetch(ClientError),
    /// The document content could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// The stored snapshot is not a mapping; queries cannot be answered.
    #[error("remote configs is not a mapping, but {found}")]
    InvalidSnapshot { found: &'static str },
    /// The dedicated runtime driving blocking construction failed to start.
    #[error("failed to start runtime for settings source init: {0}")]
    Runtime(#[from] std::io::Error),
}

/// Settings source resolving fields from one Nacos configuration document.
#[derive(Debug)]
pub struct NacosSettingsSource {
    /// Settings already known to the framework when this source was built.
    /// Held for interface compatibility; connection parameters come from
    /// [`ClientConfig`], never from here.
    initial_settings: HashMap<String, Value>,
    /// Client handle owned by this instance.
    client: NacosClient,
    /// Parsed configuration snapshot, written once during initialization.
    snapshot: Value,
}

impl NacosSettingsSource {
    /// Builds the source, blocking until initialization completes.
    ///
    /// The network-bound sequence runs on a dedicated current-thread runtime
    /// so the constructor either yields a fully initialized source or fails.
    /// Must not be called from within an async context; use [`Self::connect`]
    /// there instead.
    pub fn new(
        initial_settings: HashMap<String, Value>,
        client_config: &ClientConfig,
        key: &ConfigKey,
    ) -> Result<Self, SourceError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        runtime.block_on(Self::connect(initial_settings, client_config, key))
    }

    /// Runs the initialization sequence: client, readiness probe, fetch, parse.
    pub async fn connect(
        initial_settings: HashMap<String, Value>,
        client_config: &ClientConfig,
        key: &ConfigKey,
    ) -> Result<Self, SourceError> {
        let client = NacosClient::new(client_config).map_err(SourceError::Connectivity)?;
        debug!(server = client.base_url(), "connecting to nacos");

        let healthy = client
            .server_health()
            .await
            .map_err(SourceError::Connectivity)?;
        if !healthy {
            return Err(SourceError::Unhealthy);
        }

        let content = client.get_config(key).await.map_err(SourceError::Fetch)?;
        // An absent document is a valid, empty snapshot.
        let snapshot = parse_content(content.as_deref().unwrap_or(""))?;
        info!(
            data_id = %key.data_id,
            group = %key.group,
            fields = snapshot.as_object().map(|map| map.len()).unwrap_or(0),
            "loaded nacos configuration snapshot"
        );

        Ok(Self {
            initial_settings,
            client,
            snapshot,
        })
    }

    /// The settings mapping supplied at construction time.
    pub fn initial_settings(&self) -> &HashMap<String, Value> {
        &self.initial_settings
    }

    /// The client handle owned by this source.
    pub fn client(&self) -> &NacosClient {
        &self.client
    }

    #[cfg(test)]
    fn from_snapshot(snapshot: Value) -> Self {
        Self {
            initial_settings: HashMap::new(),
            client: NacosClient::new(&ClientConfig::default()).expect("client builds offline"),
            snapshot,
        }
    }
}

impl SettingsSource for NacosSettingsSource {
    /// Looks up a field in the snapshot.
    ///
    /// The snapshot must be a mapping; anything else is an invariant
    /// violation surfaced as [`SourceError::InvalidSnapshot`]. A missing key
    /// and a key stored as null are both normal unresolved results, so the
    /// framework can fall through to lower-precedence sources. Other values
    /// are returned exactly as stored, with no coercion towards the field's
    /// type hint.
    fn get_field_value(
        &self,
        field: &FieldSpec,
        field_name: &str,
    ) -> Result<FieldValue, SourceError> {
        let Value::Object(map) = &self.snapshot else {
            return Err(SourceError::InvalidSnapshot {
                found: value_kind(&self.snapshot),
            });
        };

        trace!(
            field = field_name,
            type_hint = field.type_hint.as_deref().unwrap_or("any"),
            "nacos field lookup"
        );
        match map.get(field_name) {
            None | Some(Value::Null) => Ok(FieldValue::unresolved(field_name)),
            Some(value) => Ok(FieldValue::resolved(field_name, value.clone())),
        }
    }

    fn name(&self) -> &str {
        SOURCE_NAME
    }
}

/// Human-readable kind of a JSON value, for diagnostics.
fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "a mapping",
    }
}
