//! Settings source backed by a Nacos configuration document.
//!
//! The adapter fetches one document at construction time, parses it into an
//! immutable snapshot, and answers point queries from a settings-loading
//! framework. Construction blocks until the snapshot is ready or fails
//! outright; there is no refresh, watch, or retry machinery.

pub mod fields;
pub mod parse;
pub mod source;

pub use fields::{FieldSpec, FieldValue, SettingsSource};
pub use parse::{parse_content, ParseError};
pub use source::{NacosSettingsSource, SourceError};
