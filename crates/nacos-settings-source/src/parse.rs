//! Parsing of raw document text into a configuration mapping.

use serde_json::{Map, Value};
use thiserror::Error;

/// Error raised when document content cannot be parsed.
///
/// The delegate's message survives verbatim; its structured type does not.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to parse config: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Parses document text into a JSON value.
///
/// Documents are read as YAML, which also accepts JSON payloads. Empty or
/// whitespace-only content parses to an empty mapping rather than an error,
/// so an absent document yields a usable (empty) snapshot. The top-level
/// shape is not validated here; the mapping invariant is enforced at query
/// time.
pub fn parse_content(content: &str) -> Result<Value, ParseError> {
    if content.trim().is_empty() {
        return Ok(Value::Object(Map::new()));
    }
    Ok(serde_yaml::from_str(content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// The documented example document parses into the expected mapping.
    #[test]
    fn parses_scalar_mapping() {
        let value = parse_content("timeout: 30\nretries: 3").expect("valid document");
        assert_eq!(value, json!({"timeout": 30, "retries": 3}));
    }

    /// JSON payloads are accepted through the YAML reader.
    #[test]
    fn parses_json_documents() {
        let value = parse_content(r#"{"feature": true, "limits": {"rps": 100}}"#)
            .expect("valid document");
        assert_eq!(value, json!({"feature": true, "limits": {"rps": 100}}));
    }

    /// Empty and whitespace-only content become an empty mapping.
    #[test]
    fn empty_content_is_empty_mapping() {
        assert_eq!(parse_content("").unwrap(), json!({}));
        assert_eq!(parse_content("  \n\t").unwrap(), json!({}));
    }

    /// Malformed content fails with the delegate's message preserved.
    #[test]
    fn malformed_content_keeps_delegate_message() {
        let err = parse_content("a: [1, 2").expect_err("unterminated sequence");
        assert!(err.to_string().starts_with("failed to parse config: "));
        assert!(err.to_string().len() > "failed to parse config: ".len());
    }

    /// A non-mapping top level parses successfully; shape is checked later.
    #[test]
    fn non_mapping_top_level_is_deferred() {
        assert_eq!(parse_content("just a string").unwrap(), json!("just a string"));
        assert_eq!(parse_content("- 1\n- 2").unwrap(), json!([1, 2]));
    }
}
