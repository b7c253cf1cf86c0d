//! Lexigraph - A Graph-Store Execution Core for Sorted Key-Value Backends
//!
//! Lexigraph dispatches typed graph operations to registered handlers and
//! persists graph elements into a sorted key-value store using byte-exact,
//! order-preserving encodings, so the backend's range scans iterate
//! elements in their logical order.
#![warn(missing_docs)]

// Core foundational modules
pub mod core;

// Main functional modules
pub mod element;
pub mod key;
pub mod ops;
pub mod serialisation;
pub mod store;

// Re-export commonly used items for convenience
pub use crate::core::{Error, Result, StoreConfig, Value};
pub use element::{Edge, Element, Entity};
pub use key::{BatchSummary, ElementKeyCodec, KeyValue};
pub use ops::{Context, OperationChain, User};
pub use store::{MemoryBackend, SortedBackend, Store, StoreBuilder};

/// Crate version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Initialize tracing for binaries and tests that want log output
pub fn init() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    tracing::info!("Initializing {} v{}", NAME, VERSION);
    Ok(())
}
