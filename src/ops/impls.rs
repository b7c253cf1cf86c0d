//! Built-in operations
//!
//! Each operation is a plain descriptor struct; behaviour lives in the
//! handler registered for its type. Input fields are `Option` so a chain
//! can bind the previous stage's output in place of an explicit input.

use crate::core::error::DispatchError;
use crate::core::types::{Group, Value};
use crate::element::Element;
use crate::key::BatchSummary;
use crate::ops::operation::{downcast_input, Operation, OutputOperation, PayloadType};
use std::any::Any;

/// Write elements into the backend via the composite key codec
#[derive(Debug, Default)]
pub struct AddElements {
    /// Elements to write; bound by the chain when absent
    pub input: Option<Vec<Element>>,
    /// Whether to drop unencodable elements and report them in the
    /// summary instead of aborting. When unset the store's configured
    /// batch policy applies.
    pub skip_invalid_elements: Option<bool>,
}

/// Read every element from the backend, optionally one group only
#[derive(Debug, Default)]
pub struct GetAllElements {
    /// Restrict the scan to one group
    pub group: Option<Group>,
}

/// From a sequence of sequences, extract the value at a fixed 0-based
/// selection index from every inner sequence, preserving outer order
#[derive(Debug, Default)]
pub struct ExtractItems {
    /// The outer sequence; bound by the chain when absent
    pub input: Option<Vec<Vec<Value>>>,
    /// 0-based index to extract from each inner sequence
    pub selection: usize,
}

/// Truncate an element sequence to at most `result_limit` items
#[derive(Debug, Default)]
pub struct Limit {
    /// Elements to truncate; bound by the chain when absent
    pub input: Option<Vec<Element>>,
    /// Maximum number of elements to pass through
    pub result_limit: usize,
}

impl AddElements {
    /// Add the given elements under the store's configured batch policy
    pub fn new(elements: Vec<Element>) -> Self {
        Self {
            input: Some(elements),
            skip_invalid_elements: None,
        }
    }

    /// Abort the whole batch on the first unencodable element,
    /// regardless of the configured policy
    pub fn strict(mut self) -> Self {
        self.skip_invalid_elements = Some(false);
        self
    }

    /// Skip unencodable elements, regardless of the configured policy
    pub fn skipping_invalid(mut self) -> Self {
        self.skip_invalid_elements = Some(true);
        self
    }
}

impl GetAllElements {
    /// Scan every group
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan one group only
    pub fn in_group(group: impl Into<Group>) -> Self {
        Self {
            group: Some(group.into()),
        }
    }
}

impl ExtractItems {
    /// Extract `selection` from each inner sequence of `input`
    pub fn with_input(input: Vec<Vec<Value>>, selection: usize) -> Self {
        Self {
            input: Some(input),
            selection,
        }
    }

    /// Extract `selection` from an input bound later by the chain
    pub fn selecting(selection: usize) -> Self {
        Self {
            input: None,
            selection,
        }
    }
}

impl Limit {
    /// Pass through at most `result_limit` elements
    pub fn new(result_limit: usize) -> Self {
        Self {
            input: None,
            result_limit,
        }
    }
}

impl Operation for AddElements {
    fn name(&self) -> &'static str {
        "AddElements"
    }

    fn input_type(&self) -> Option<PayloadType> {
        Some(PayloadType::of::<Vec<Element>>())
    }

    fn output_type(&self) -> PayloadType {
        PayloadType::of::<BatchSummary>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }

    fn bind_input(&mut self, input: Box<dyn Any + Send>) -> Result<(), DispatchError> {
        self.input = Some(downcast_input(self.name(), input)?);
        Ok(())
    }
}

impl OutputOperation for AddElements {
    type Output = BatchSummary;
}

impl Operation for GetAllElements {
    fn name(&self) -> &'static str {
        "GetAllElements"
    }

    fn output_type(&self) -> PayloadType {
        PayloadType::of::<Vec<Element>>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

impl OutputOperation for GetAllElements {
    type Output = Vec<Element>;
}

impl Operation for ExtractItems {
    fn name(&self) -> &'static str {
        "ExtractItems"
    }

    fn input_type(&self) -> Option<PayloadType> {
        Some(PayloadType::of::<Vec<Vec<Value>>>())
    }

    fn output_type(&self) -> PayloadType {
        PayloadType::of::<Vec<Value>>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }

    fn bind_input(&mut self, input: Box<dyn Any + Send>) -> Result<(), DispatchError> {
        self.input = Some(downcast_input(self.name(), input)?);
        Ok(())
    }
}

impl OutputOperation for ExtractItems {
    type Output = Vec<Value>;
}

impl Operation for Limit {
    fn name(&self) -> &'static str {
        "Limit"
    }

    fn input_type(&self) -> Option<PayloadType> {
        Some(PayloadType::of::<Vec<Element>>())
    }

    fn output_type(&self) -> PayloadType {
        PayloadType::of::<Vec<Element>>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }

    fn bind_input(&mut self, input: Box<dyn Any + Send>) -> Result<(), DispatchError> {
        self.input = Some(downcast_input(self.name(), input)?);
        Ok(())
    }
}

impl OutputOperation for Limit {
    type Output = Vec<Element>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Entity;

    #[test]
    fn bind_input_accepts_the_declared_type() {
        let mut op = Limit::new(5);
        let elements: Vec<Element> = vec![Entity::new("g", "v").into()];
        op.bind_input(Box::new(elements)).unwrap();
        assert_eq!(op.input.as_ref().unwrap().len(), 1);
    }

    #[test]
    fn bind_input_rejects_other_types() {
        let mut op = Limit::new(5);
        let err = op.bind_input(Box::new("wrong".to_owned())).unwrap_err();
        assert!(matches!(err, DispatchError::InvalidInput { operation: "Limit", .. }));
    }

    #[test]
    fn source_operations_reject_binding() {
        let mut op = GetAllElements::new();
        let elements: Vec<Element> = Vec::new();
        assert!(op.bind_input(Box::new(elements)).is_err());
        assert!(op.input_type().is_none());
    }
}
