//! Operation traits
//!
//! An operation is an immutable, typed request descriptor. Dispatch is by
//! the operation's exact concrete type; chains connect operations whose
//! declared input and output payload types line up, validated when the
//! chain is built.

use crate::core::error::DispatchError;
use std::any::{Any, TypeId};
use std::fmt;

/// A payload type as an operation declares it: the `TypeId` compared
/// during chain validation plus the type name for error messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayloadType {
    id: TypeId,
    name: &'static str,
}

impl PayloadType {
    /// The payload type for `T`
    pub fn of<T: Any>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// The `TypeId` of the payload
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Human-readable type name
    pub fn name(&self) -> &'static str {
        self.name
    }
}

/// A typed request describing one unit of graph work.
///
/// The object-safe surface the dispatch engine needs: a name for error
/// messages, declared input/output payload types for chain validation,
/// and input binding so a previous stage's output can flow in.
pub trait Operation: Any + Send + fmt::Debug {
    /// Operation name used in dispatch errors
    fn name(&self) -> &'static str;

    /// The input payload this operation consumes, `None` for source
    /// operations that take no input
    fn input_type(&self) -> Option<PayloadType> {
        None
    }

    /// The output payload this operation produces
    fn output_type(&self) -> PayloadType;

    /// Upcast for runtime type inspection
    fn as_any(&self) -> &dyn Any;

    /// Consume the boxed operation for handler dispatch
    fn into_any(self: Box<Self>) -> Box<dyn Any>;

    /// Bind the previous stage's output as this operation's input.
    /// Operations without an input reject the bind.
    fn bind_input(&mut self, input: Box<dyn Any + Send>) -> Result<(), DispatchError> {
        drop(input);
        Err(DispatchError::InvalidInput {
            operation: self.name(),
            reason: "operation does not accept an input".into(),
        })
    }
}

/// An operation with a statically known output payload type, enabling the
/// typed `Store::execute` entry point
pub trait OutputOperation: Operation + Sized {
    /// The payload this operation produces
    type Output: Any + Send;
}

/// Helper for `bind_input` implementations: downcast the carried payload
/// to the operation's input type
pub fn downcast_input<T: Any>(
    operation: &'static str,
    input: Box<dyn Any + Send>,
) -> Result<T, DispatchError> {
    match input.downcast::<T>() {
        Ok(value) => Ok(*value),
        Err(_) => Err(DispatchError::InvalidInput {
            operation,
            reason: "previous stage's output has the wrong type".into(),
        }),
    }
}
