//! Handler traits
//!
//! A handler implements exactly one operation type's behaviour. Handlers
//! are stateless and receive the operation, the execution context and the
//! store itself, so they may execute sub-operations. The type-erased
//! adapter lets the store keep handlers for heterogeneous operation types
//! in one registry keyed by `TypeId`.

use crate::core::error::{DispatchError, Result};
use crate::ops::context::Context;
use crate::ops::operation::{Operation, OutputOperation};
use crate::store::store::Store;
use std::any::Any;
use std::marker::PhantomData;

/// Behaviour for one operation type
pub trait OperationHandler<O: OutputOperation>: Send + Sync {
    /// Execute the operation
    fn handle(&self, operation: O, context: &Context, store: &Store) -> Result<O::Output>;
}

/// Type-erased handler stored in the registry
pub(crate) trait ErasedHandler: Send + Sync {
    fn handle_erased(
        &self,
        operation: Box<dyn Operation>,
        context: &Context,
        store: &Store,
    ) -> Result<Box<dyn Any + Send>>;
}

/// Adapts a typed handler to the erased registry entry
pub(crate) struct HandlerAdapter<O, H> {
    handler: H,
    _operation: PhantomData<fn(O)>,
}

impl<O, H> HandlerAdapter<O, H> {
    pub(crate) fn new(handler: H) -> Self {
        Self {
            handler,
            _operation: PhantomData,
        }
    }
}

impl<O, H> ErasedHandler for HandlerAdapter<O, H>
where
    O: OutputOperation,
    H: OperationHandler<O>,
{
    fn handle_erased(
        &self,
        operation: Box<dyn Operation>,
        context: &Context,
        store: &Store,
    ) -> Result<Box<dyn Any + Send>> {
        let name = operation.name();
        let operation = operation.into_any().downcast::<O>().map_err(|_| {
            // Registry entries are keyed by TypeId, so this is unreachable
            // unless the registry was corrupted
            DispatchError::InvalidInput {
                operation: name,
                reason: "handler registered for a different operation type".into(),
            }
        })?;
        let output = self.handler.handle(*operation, context, store)?;
        Ok(Box::new(output))
    }
}
