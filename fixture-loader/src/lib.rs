pub mod cache;
pub mod config;
pub mod dom;
pub mod error;
pub mod fetch;
pub mod loader;
pub mod presentation;
pub mod sniff;
pub mod xml;

// Behaviour tests against the fixture files in src/tests/fixtures
#[cfg(test)]
pub mod tests;

// Re-export key types and functions for easier access
pub use crate::cache::FixtureCache;
pub use crate::config::{Config, SetupOptions, DEFAULT_BASE_PATH, DEFAULT_CONTAINER_ID};
pub use crate::dom::{Dom, MemoryDom, StyleNodeId};
pub use crate::error::{failure, FixtureError, Result};
pub use crate::fetch::{is_success, FileFetcher, Fetcher, HttpFetcher, Response};
pub use crate::loader::{FixturePaths, FixtureScope, Fixtures};
pub use crate::presentation::StyleRegistry;
pub use crate::sniff::{classify, is_json, is_json_value, Payload};
pub use crate::xml::{XmlDocument, XmlElement, XmlNode};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
