//! Store and dispatch engine
//!
//! The store holds a frozen registry mapping each concrete operation type
//! to exactly one handler and exposes the execution entry points for
//! single operations and chains.

pub mod backend;
pub mod handler;
pub mod handlers;
pub mod store;

// Re-export main store types
pub use backend::{MemoryBackend, SortedBackend};
pub use handler::OperationHandler;
pub use store::{Store, StoreBuilder};
