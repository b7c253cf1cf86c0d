//! Built-in operation handlers
//!
//! One handler per operation type; all stateless. Handlers receive the
//! store so they can reach the key codec and backend, or execute
//! sub-operations.

pub mod add_elements;
pub mod extract_items;
pub mod get_all_elements;
pub mod limit;

pub use add_elements::AddElementsHandler;
pub use extract_items::ExtractItemsHandler;
pub use get_all_elements::GetAllElementsHandler;
pub use limit::LimitHandler;
