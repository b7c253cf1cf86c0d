//! Core system types and foundations
//!
//! This module contains the fundamental building blocks of Lexigraph,
//! including type definitions, error handling and configuration.

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used items
pub use config::{BatchConfig, SchemaConfig, StoreConfig};
pub use error::{ConversionError, DispatchError, Error, Result, SerialisationError};
pub use types::{Group, Properties, PropertyKey, Value, ValueKind, Vertex};
