//! Operation framework
//!
//! Typed request descriptors, the per-execution context, and ordered,
//! type-checked operation chains.

pub mod chain;
pub mod context;
pub mod impls;
pub mod operation;

// Re-export main operation types
pub use chain::{ChainBuilder, OperationChain};
pub use context::{Context, User};
pub use impls::{AddElements, ExtractItems, GetAllElements, Limit};
pub use operation::{Operation, OutputOperation, PayloadType};
