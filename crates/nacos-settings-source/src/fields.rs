//! The seam between this adapter and the settings-loading framework.

use serde_json::Value;

use crate::source::SourceError;

/// A source of individual setting values.
///
/// Implementations answer point queries against whatever backing store they
/// hold; the framework merges results across sources by precedence.
pub trait SettingsSource {
    /// Looks up one field. A missing field is reported as an unresolved
    /// [`FieldValue`], not an error.
    fn get_field_value(
        &self,
        field: &FieldSpec,
        field_name: &str,
    ) -> Result<FieldValue, SourceError>;

    /// Human-readable source name, for logging.
    fn name(&self) -> &str;
}

/// Metadata describing the field being resolved.
///
/// The type hint is tracing context only; sources never coerce values to it.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    /// Name of the field as declared by the settings model.
    pub name: String,
    /// Optional expected-type annotation (e.g. `u64`).
    pub type_hint: Option<String>,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_hint: None,
        }
    }

    pub fn with_type_hint(mut self, hint: impl Into<String>) -> Self {
        self.type_hint = Some(hint.into());
        self
    }
}

/// Outcome of a field lookup: the raw value (if any), the queried key echoed
/// back for tracing, and whether the value is a structured type.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldValue {
    /// The stored value, unmodified; `None` when the source cannot resolve
    /// the field.
    pub value: Option<Value>,
    /// The field name the lookup was performed with.
    pub key: String,
    /// Whether the value needs structural post-processing by the framework.
    pub is_complex: bool,
}

impl FieldValue {
    /// A lookup that found the field; values are handed back uncoerced.
    pub fn resolved(key: impl Into<String>, value: Value) -> Self {
        Self {
            value: Some(value),
            key: key.into(),
            is_complex: false,
        }
    }

    /// A lookup this source could not answer.
    pub fn unresolved(key: impl Into<String>) -> Self {
        Self {
            value: None,
            key: key.into(),
            is_complex: false,
        }
    }

    /// Whether the source produced a value for the field.
    pub fn is_resolved(&self) -> bool {
        self.value.is_some()
    }
}
