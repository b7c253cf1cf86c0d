//! Serialiser traits
//!
//! A serialiser is a stateless bidirectional codec between a logical value
//! and its byte encoding. Serialisers declaring `preserves_order` promise
//! that unsigned lexicographic comparison of their output matches the
//! logical ordering of the encoded values; the key codec relies on this to
//! give the backend meaningful range scans.

use crate::core::error::SerialisationError;
use crate::core::types::{Value, ValueKind};

/// Typed bidirectional codec between `T` and bytes.
///
/// Laws every implementation must uphold:
/// - round trip: `deserialise(serialise(v)) == v` for all `v` in the domain
/// - order preservation (when declared): the sign of the logical comparison
///   of two values equals the sign of the unsigned byte comparison of their
///   encodings
pub trait Serialiser<T>: Send + Sync {
    /// Encode a value
    fn serialise(&self, value: &T) -> Result<Vec<u8>, SerialisationError>;

    /// Decode a value; fails on truncated input or an inconsistent marker
    fn deserialise(&self, bytes: &[u8]) -> Result<T, SerialisationError>;

    /// Whether byte order matches logical order
    fn preserves_order(&self) -> bool {
        false
    }
}

/// Object-safe serialiser over the `Value` enum, used by the registry.
///
/// Routing is by `can_handle`, never by probing `deserialise` and catching
/// failures.
pub trait ValueSerialiser: Send + Sync {
    /// Stable name used in configuration and error messages
    fn name(&self) -> &'static str;

    /// Whether this serialiser encodes values of the given kind
    fn can_handle(&self, kind: ValueKind) -> bool;

    /// Whether byte order matches logical order
    fn preserves_order(&self) -> bool;

    /// Encode a value; fails with `OutOfDomain` for kinds it cannot handle
    fn serialise_value(&self, value: &Value) -> Result<Vec<u8>, SerialisationError>;

    /// Decode a value of this serialiser's kind
    fn deserialise_value(&self, bytes: &[u8]) -> Result<Value, SerialisationError>;
}

/// Helper building the `OutOfDomain` error for a rejected value
pub(crate) fn out_of_domain(serialiser: &'static str, value: &Value) -> SerialisationError {
    SerialisationError::OutOfDomain {
        serialiser,
        kind: value.kind().name(),
    }
}
