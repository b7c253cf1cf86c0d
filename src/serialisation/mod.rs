//! Order-preserving serialisation framework
//!
//! Per-type bidirectional codecs between logical values and byte
//! sequences. A subset are declared order-preserving: their output
//! compares under unsigned lexicographic order exactly as the encoded
//! values compare logically, which is what makes the backend's range
//! scans meaningful.

pub mod ordered;
pub mod registry;
pub mod serialiser;

// Re-export main serialisation types
pub use ordered::{
    BooleanSerialiser, BytesSerialiser, NullSerialiser, OrderedDoubleSerialiser,
    OrderedLongSerialiser, OrderedStringSerialiser, OrderedTimeSerialiser,
};
pub use registry::SerialiserRegistry;
pub use serialiser::{Serialiser, ValueSerialiser};
