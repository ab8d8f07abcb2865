//! # Settings
//!
//! User configuration, read from a TOML file. Every field has a default so
//! an empty or partial file is valid.
//!
//! ```toml
//! dataset_path = "/srv/tables/span-tables.json"
//! default_grade = "C24"
//! default_spacing = "600"
//! log_level = "info"
//! output = "json"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{SpanError, SpanResult};
use crate::file_io::DatasetSource;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Dataset file to use instead of the shipped one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dataset_path: Option<PathBuf>,
    /// Grade preselected in interactive mode
    pub default_grade: String,
    /// Spacing preselected in interactive mode
    pub default_spacing: String,
    /// Log filter used when no environment filter is set
    pub log_level: String,
    pub output: OutputFormat,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            dataset_path: None,
            default_grade: "C16".to_string(),
            default_spacing: "400".to_string(),
            log_level: "warn".to_string(),
            output: OutputFormat::Text,
        }
    }
}

/// How results are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl Settings {
    pub fn from_toml_str(contents: &str) -> SpanResult<Self> {
        toml::from_str(contents).map_err(|e| SpanError::config(format!("Invalid settings: {}", e)))
    }

    pub fn load(path: &Path) -> SpanResult<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| SpanError::file_error("read", path.display().to_string(), e.to_string()))?;
        Self::from_toml_str(&contents)
    }

    pub fn dataset_source(&self) -> DatasetSource {
        match &self.dataset_path {
            Some(path) => DatasetSource::File(path.clone()),
            None => DatasetSource::Embedded,
        }
    }
}
