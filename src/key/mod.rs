//! Composite key codec
//!
//! Turns graph elements into sorted storage Key/Value pairs built from
//! the order-preserving serialisers, and back again for range scans.

pub mod batch;
pub mod codec;
pub mod escape;

// Re-export main key codec types
pub use batch::{BatchSummary, SkippedElement};
pub use codec::{DecodedElement, ElementKeyCodec, EncodedElement, KeyValue};
