//! Limit handler

use crate::core::error::{DispatchError, Result};
use crate::element::Element;
use crate::ops::context::Context;
use crate::ops::impls::Limit;
use crate::store::handler::OperationHandler;
use crate::store::store::Store;

/// Handler for `Limit`: truncates the input to at most `result_limit`
/// elements, preserving order
#[derive(Debug, Default, Clone, Copy)]
pub struct LimitHandler;

impl OperationHandler<Limit> for LimitHandler {
    fn handle(
        &self,
        operation: Limit,
        _context: &Context,
        _store: &Store,
    ) -> Result<Vec<Element>> {
        let mut elements = operation.input.ok_or(DispatchError::MissingInput {
            operation: "Limit",
        })?;
        elements.truncate(operation.result_limit);
        Ok(elements)
    }
}
