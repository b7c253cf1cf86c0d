//! ExtractItems handler
//!
//! For each inner sequence of the input, returns the value at the
//! operation's selection index, preserving outer order. Inputs are
//! in-memory vectors, so extraction is O(1) indexed access per inner
//! sequence. An inner sequence shorter than `selection + 1` fails the
//! operation; the selection is never clamped.

use crate::core::error::{DispatchError, Result};
use crate::core::types::Value;
use crate::ops::context::Context;
use crate::ops::impls::ExtractItems;
use crate::store::handler::OperationHandler;
use crate::store::store::Store;

/// Handler for `ExtractItems`
#[derive(Debug, Default, Clone, Copy)]
pub struct ExtractItemsHandler;

impl OperationHandler<ExtractItems> for ExtractItemsHandler {
    fn handle(
        &self,
        operation: ExtractItems,
        _context: &Context,
        _store: &Store,
    ) -> Result<Vec<Value>> {
        let input = operation.input.ok_or(DispatchError::MissingInput {
            operation: "ExtractItems",
        })?;
        let selection = operation.selection;

        input
            .into_iter()
            .enumerate()
            .map(|(index, mut inner)| {
                if selection >= inner.len() {
                    return Err(DispatchError::InvalidInput {
                        operation: "ExtractItems",
                        reason: format!(
                            "inner sequence {index} has length {} but selection is {selection}",
                            inner.len()
                        ),
                    }
                    .into());
                }
                Ok(inner.swap_remove(selection))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::Error;

    fn values(items: &[i64]) -> Vec<Value> {
        items.iter().map(|&i| Value::Long(i)).collect()
    }

    fn store() -> Store {
        Store::builder().with_default_handlers().build().unwrap()
    }

    #[test]
    fn extracts_the_selected_position_from_every_inner_sequence() {
        let op = ExtractItems::with_input(
            vec![values(&[1, 2, 3]), values(&[4, 5, 6])],
            1,
        );
        let extracted = store().execute(op, &Context::default()).unwrap();
        assert_eq!(extracted, values(&[2, 5]));
    }

    #[test]
    fn missing_input_fails() {
        let err = store()
            .execute(ExtractItems::selecting(0), &Context::default())
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Dispatch(DispatchError::MissingInput { operation: "ExtractItems" })
        ));
    }

    #[test]
    fn selection_beyond_an_inner_sequence_fails_not_clamps() {
        let op = ExtractItems::with_input(vec![values(&[1, 2, 3]), values(&[4])], 2);
        let err = store().execute(op, &Context::default()).unwrap_err();
        assert!(matches!(
            err,
            Error::Dispatch(DispatchError::InvalidInput { operation: "ExtractItems", .. })
        ));
    }

    #[test]
    fn empty_outer_sequence_yields_empty_output() {
        let op = ExtractItems::with_input(Vec::new(), 3);
        let extracted = store().execute(op, &Context::default()).unwrap();
        assert!(extracted.is_empty());
    }
}
