//! Minimal client for the Nacos configuration service.
//!
//! The crate covers exactly the surface a settings source needs: building
//! connection parameters from the environment, probing server readiness, and
//! fetching a single configuration document by data-id and group. The wire
//! format is the Nacos HTTP open-api; change subscriptions and service
//! discovery are out of scope.

pub mod config;
pub mod http;

pub use config::{ClientConfig, ConfigKey};
pub use http::{ClientError, NacosClient};
