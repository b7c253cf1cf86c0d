//! Configuration management for Lexigraph
//!
//! Store configuration is read once at start-up, before any concurrent
//! execution, and is immutable afterwards. The schema section decides
//! which serialiser encodes each property.

use crate::core::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Schema configuration: serialiser selection per property
    #[serde(default)]
    pub schema: SchemaConfig,

    /// Batch conversion behaviour
    #[serde(default)]
    pub batch: BatchConfig,
}

/// Schema configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaConfig {
    /// Per-property serialiser overrides: property name to serialiser name.
    /// Properties without an override use the default serialiser for their
    /// value kind.
    #[serde(default)]
    pub property_serialisers: BTreeMap<String, String>,
}

/// Batch conversion behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Skip elements whose properties cannot be encoded instead of
    /// aborting the batch; skips are reported in the batch summary
    pub skip_invalid_elements: bool,

    /// Maximum records per backend write; larger batches are written in
    /// chunks of this size
    pub max_batch_size: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            skip_invalid_elements: true,
            max_batch_size: 10_000,
        }
    }
}

impl StoreConfig {
    /// Load configuration from a TOML file
    pub fn from_toml(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents).map_err(|e| Error::config(e.to_string()))
    }

    /// Parse configuration from a TOML string
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| Error::config(e.to_string()))
    }
}
