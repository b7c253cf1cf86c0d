//! AddElements handler
//!
//! Converts the input elements into sorted Key/Value pairs via the
//! store's key codec and writes them to the backend in batches of at
//! most the configured `max_batch_size` records. Skipped elements are
//! reported in the returned summary, never silently absorbed; the
//! operation's `skip_invalid_elements` overrides the configured policy
//! when set.

use crate::core::error::{DispatchError, Result};
use crate::key::BatchSummary;
use crate::ops::context::Context;
use crate::ops::impls::AddElements;
use crate::store::handler::OperationHandler;
use crate::store::store::Store;

/// Handler for `AddElements`
#[derive(Debug, Default, Clone, Copy)]
pub struct AddElementsHandler;

impl OperationHandler<AddElements> for AddElementsHandler {
    fn handle(
        &self,
        operation: AddElements,
        context: &Context,
        store: &Store,
    ) -> Result<BatchSummary> {
        let elements = operation.input.ok_or(DispatchError::MissingInput {
            operation: "AddElements",
        })?;

        let batch_config = &store.config().batch;
        let skip_invalid = operation
            .skip_invalid_elements
            .unwrap_or(batch_config.skip_invalid_elements);

        let summary = store.codec().encode_batch(elements, skip_invalid)?;
        for chunk in summary.pairs.chunks(batch_config.max_batch_size.max(1)) {
            store.backend().put(chunk)?;
        }

        tracing::debug!(
            job_id = %context.job_id(),
            converted = summary.converted,
            skipped = summary.skipped_count(),
            records = summary.pairs.len(),
            "added elements"
        );
        Ok(summary)
    }
}
