use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{FixtureError, Result};

pub const DEFAULT_BASE_PATH: &str = "fixtures/";
pub const DEFAULT_CONTAINER_ID: &str = "jasmine-fixtures";

/// Where fixtures are fetched from and where HTML fixtures are injected.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Prefix for every fixture path. Always ends with "/".
    pub base_path: String,
    /// `id` attribute of the element that receives HTML fixtures.
    pub container_id: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            base_path: DEFAULT_BASE_PATH.to_string(),
            container_id: DEFAULT_CONTAINER_ID.to_string(),
        }
    }
}

impl Config {
    /// Merge the keys present in `options`, leaving the others untouched.
    pub fn merge(&mut self, options: SetupOptions) {
        if let Some(container_id) = options.container_id {
            self.container_id = container_id;
        }
        if let Some(base_path) = options.base_path {
            self.base_path = base_path;
        }
        if !self.base_path.ends_with('/') {
            self.base_path.push('/');
        }
    }

    /// Absolute fixture URL for `path`. Plain concatenation, no normalization.
    pub fn resolve(&self, path: &str) -> String {
        format!("{}{}", self.base_path, path)
    }
}

/// Partial configuration update. Absent keys keep their current value.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SetupOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_id: Option<String>,
}

impl SetupOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = Some(base_path.into());
        self
    }

    pub fn container_id(mut self, container_id: impl Into<String>) -> Self {
        self.container_id = Some(container_id.into());
        self
    }

    /// Load options from a JSON file such as `{"basePath": "spec/fixtures"}`.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        let config_error = |reason: String| FixtureError::Config {
            path: path_ref.display().to_string(),
            reason,
        };

        let content = fs::read_to_string(path_ref).map_err(|e| config_error(e.to_string()))?;
        serde_json::from_str(&content).map_err(|e| config_error(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.base_path, "fixtures/");
        assert_eq!(config.container_id, "jasmine-fixtures");
    }

    #[test]
    fn test_merge_is_partial() {
        let mut config = Config::default();
        config.merge(SetupOptions::new().container_id("newId"));
        assert_eq!(config.container_id, "newId");
        assert_eq!(config.base_path, "fixtures/");

        config.merge(SetupOptions::new().base_path("newPath/"));
        assert_eq!(config.container_id, "newId");
        assert_eq!(config.base_path, "newPath/");
    }

    #[test]
    fn test_trailing_slash_is_added() {
        let mut config = Config::default();
        config.merge(SetupOptions::new().base_path("newPath"));
        assert_eq!(config.base_path, "newPath/");
    }

    #[test]
    fn test_empty_base_path_becomes_root() {
        let mut config = Config::default();
        config.merge(SetupOptions::new().base_path(""));
        assert_eq!(config.base_path, "/");
    }

    #[test]
    fn test_resolve_does_not_normalize() {
        let mut config = Config::default();
        config.merge(SetupOptions::new().base_path("a//b/../"));
        assert_eq!(config.resolve("f.htm"), "a//b/../f.htm");
    }

    #[test]
    fn test_options_use_camel_case_keys() {
        let options: SetupOptions =
            serde_json::from_str(r#"{"basePath": "spec/fixtures"}"#).unwrap();
        assert_eq!(options.base_path.as_deref(), Some("spec/fixtures"));
        assert_eq!(options.container_id, None);
    }

    #[test]
    fn test_options_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fixtures.json");
        fs::write(&path, r#"{"containerId": "sandbox"}"#).unwrap();

        let options = SetupOptions::from_json_file(&path).unwrap();
        assert_eq!(options, SetupOptions::new().container_id("sandbox"));
    }

    #[test]
    fn test_options_from_invalid_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fixtures.json");
        fs::write(&path, "basePath = nope").unwrap();

        let result = SetupOptions::from_json_file(&path);
        assert!(matches!(result, Err(FixtureError::Config { .. })));
    }
}
