//! Error types and handling for Lexigraph
//!
//! This module defines all error types used throughout the system. A chain
//! execution aborts at the first stage failure and the error reaches the
//! caller fully typed; the only sanctioned partial-failure path is
//! per-element conversion during batch key generation, which is surfaced
//! as an explicit skip summary rather than an error.

use thiserror::Error;

/// Main result type used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for Lexigraph
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Operation dispatch errors
    #[error("Dispatch error: {0}")]
    Dispatch(#[from] DispatchError),

    /// Serialisation/deserialisation errors
    #[error("Serialisation error: {0}")]
    Serialisation(#[from] SerialisationError),

    /// Element-to-key conversion errors
    #[error("Conversion error: {0}")]
    Conversion(#[from] ConversionError),

    /// Backend storage errors
    #[error("Backend error: {0}")]
    Backend(String),

    /// I/O errors from std
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Dispatch-specific errors: invalid operations or chains, or an
/// operation type with no registered handler.
#[derive(Error, Debug)]
pub enum DispatchError {
    /// No handler is registered for the operation's concrete type
    #[error("No handler registered for operation: {operation}")]
    NoHandler {
        /// Name of the unhandled operation
        operation: &'static str,
    },

    /// A required operation input was not provided
    #[error("Operation {operation} requires an input")]
    MissingInput {
        /// Name of the operation missing its input
        operation: &'static str,
    },

    /// An operation input was present but unusable
    #[error("Invalid input for operation {operation}: {reason}")]
    InvalidInput {
        /// Name of the operation
        operation: &'static str,
        /// Why the input was rejected
        reason: String,
    },

    /// A chain was built with no stages
    #[error("Operation chain is empty")]
    EmptyChain,

    /// Adjacent chain stages have incompatible types, caught at build time
    #[error("Chain stage {stage} ({operation}) expects {expected} but the previous stage produces {actual}")]
    ChainTypeMismatch {
        /// 0-based index of the rejected stage
        stage: usize,
        /// Name of the rejected stage's operation
        operation: &'static str,
        /// Input payload type the rejected stage declares
        expected: &'static str,
        /// Output payload type the previous stage produces
        actual: &'static str,
    },

    /// A stage produced an output the next stage (or the caller) could not accept
    #[error("Unexpected output type from operation {operation}")]
    UnexpectedOutputType {
        /// Name of the operation whose output was rejected
        operation: &'static str,
    },
}

/// Serialisation errors: malformed or truncated bytes, or a value outside
/// a serialiser's domain.
#[derive(Error, Debug)]
pub enum SerialisationError {
    /// Input ended before the encoding was complete
    #[error("Truncated input: expected {expected} bytes, got {actual}")]
    Truncated {
        /// Bytes the encoding required
        expected: usize,
        /// Bytes actually available
        actual: usize,
    },

    /// Marker byte inconsistent with the remaining byte count
    #[error("Invalid marker byte {marker:#04x} for {remaining} remaining bytes")]
    InvalidMarker {
        /// The offending marker byte
        marker: u8,
        /// Bytes following the marker
        remaining: usize,
    },

    /// Payload was not valid UTF-8
    #[error("Invalid UTF-8 in serialised string: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// Value is outside the serialiser's domain
    #[error("Serialiser {serialiser} cannot handle {kind} values")]
    OutOfDomain {
        /// Name of the serialiser
        serialiser: &'static str,
        /// Kind of the rejected value
        kind: &'static str,
    },

    /// A composite encoding was structurally invalid
    #[error("Malformed encoding: {0}")]
    Malformed(String),
}

/// A specific element's property could not be encoded by its configured
/// serialiser. Identifies the offending element and property; never a
/// silent null key.
#[derive(Error, Debug)]
#[error("Cannot convert element in group '{group}': property '{property}' failed in serialiser {serialiser}: {source}")]
pub struct ConversionError {
    /// Group label of the failing element
    pub group: String,
    /// Name of the property that failed to encode
    pub property: String,
    /// Name of the serialiser that rejected it
    pub serialiser: &'static str,
    /// Underlying serialisation failure
    #[source]
    pub source: SerialisationError,
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a backend error
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }

    /// Check if this error originated in the dispatch engine rather than
    /// in a handler or the storage layer
    pub fn is_dispatch_error(&self) -> bool {
        matches!(self, Error::Dispatch(_))
    }
}
