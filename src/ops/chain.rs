//! Operation chains
//!
//! An ordered pipeline of operations executed against one context and
//! store. Stage k's output becomes stage k+1's input. Adjacent stage
//! types are validated when the chain is built, never at execution time.

use crate::core::error::DispatchError;
use crate::ops::operation::Operation;

/// Ordered, type-checked pipeline of operations
#[derive(Debug)]
pub struct OperationChain {
    stages: Vec<Box<dyn Operation>>,
}

impl OperationChain {
    /// Start building a chain
    pub fn builder() -> ChainBuilder {
        ChainBuilder { stages: Vec::new() }
    }

    /// Number of stages
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Whether the chain has no stages
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Consume the chain for execution
    pub(crate) fn into_stages(self) -> Vec<Box<dyn Operation>> {
        self.stages
    }
}

/// Builder validating stage adjacency at build time
#[derive(Debug, Default)]
pub struct ChainBuilder {
    stages: Vec<Box<dyn Operation>>,
}

impl ChainBuilder {
    /// Append a stage
    pub fn then(mut self, operation: impl Operation) -> Self {
        self.stages.push(Box::new(operation));
        self
    }

    /// Validate adjacency and produce the chain.
    ///
    /// Fails with `EmptyChain` for zero stages, or `ChainTypeMismatch`
    /// when a stage cannot accept the previous stage's output type.
    pub fn build(self) -> Result<OperationChain, DispatchError> {
        if self.stages.is_empty() {
            return Err(DispatchError::EmptyChain);
        }
        for (index, window) in self.stages.windows(2).enumerate() {
            let produced = window[0].output_type();
            let accepted = window[1].input_type();
            if accepted.map(|t| t.id()) != Some(produced.id()) {
                return Err(DispatchError::ChainTypeMismatch {
                    stage: index + 1,
                    operation: window[1].name(),
                    expected: accepted.map_or("no input", |t| t.name()),
                    actual: produced.name(),
                });
            }
        }
        Ok(OperationChain { stages: self.stages })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Value;
    use crate::ops::impls::{ExtractItems, GetAllElements, Limit};

    #[test]
    fn compatible_stages_build() {
        let chain = OperationChain::builder()
            .then(GetAllElements::new())
            .then(Limit::new(10))
            .build()
            .unwrap();
        assert_eq!(chain.len(), 2);
        assert!(!chain.is_empty());
    }

    #[test]
    fn mismatched_adjacent_stages_fail_at_build_time() {
        // ExtractItems produces Vec<Value>; Limit accepts Vec<Element>
        let err = OperationChain::builder()
            .then(ExtractItems::with_input(
                vec![vec![Value::Long(1)]],
                0,
            ))
            .then(Limit::new(10))
            .build()
            .unwrap_err();
        match err {
            DispatchError::ChainTypeMismatch {
                stage,
                operation,
                expected,
                actual,
            } => {
                assert_eq!(stage, 1);
                assert_eq!(operation, "Limit");
                assert!(expected.contains("Element"), "expected names the input type: {expected}");
                assert!(actual.contains("Value"), "actual names the produced type: {actual}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn a_source_stage_after_a_producing_stage_fails_to_build() {
        // GetAllElements declares no input, so it cannot follow anything
        let err = OperationChain::builder()
            .then(GetAllElements::new())
            .then(GetAllElements::new())
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            DispatchError::ChainTypeMismatch { stage: 1, expected: "no input", .. }
        ));
    }

    #[test]
    fn empty_chain_fails_to_build() {
        assert!(matches!(
            OperationChain::builder().build(),
            Err(DispatchError::EmptyChain)
        ));
    }
}
