//! The store: handler registry and execution entry point
//!
//! A store is long-lived and shared across concurrent executions. Its
//! handler registry is built before any execution begins and is frozen
//! afterwards, so dispatch takes no locks. Resolution is by the
//! operation's exact concrete type; there is no structural fallback.

use crate::core::config::StoreConfig;
use crate::core::error::{DispatchError, Error, Result};
use crate::key::ElementKeyCodec;
use crate::ops::chain::OperationChain;
use crate::ops::context::Context;
use crate::ops::operation::{Operation, OutputOperation};
use crate::serialisation::SerialiserRegistry;
use crate::store::backend::{MemoryBackend, SortedBackend};
use crate::store::handler::{ErasedHandler, HandlerAdapter, OperationHandler};
use crate::store::handlers;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

/// Holds the handler registry and executes operations and chains
pub struct Store {
    handlers: HashMap<TypeId, Arc<dyn ErasedHandler>>,
    codec: ElementKeyCodec,
    backend: Arc<dyn SortedBackend>,
    config: StoreConfig,
}

/// Configures and builds a `Store`.
///
/// All registration happens here, before the store exists; once built the
/// registry never changes.
pub struct StoreBuilder {
    handlers: HashMap<TypeId, Arc<dyn ErasedHandler>>,
    backend: Arc<dyn SortedBackend>,
    config: StoreConfig,
}

impl StoreBuilder {
    /// Builder with an in-memory backend and default configuration
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
            backend: Arc::new(MemoryBackend::new()),
            config: StoreConfig::default(),
        }
    }

    /// Use the given configuration
    pub fn config(mut self, config: StoreConfig) -> Self {
        self.config = config;
        self
    }

    /// Use the given backend
    pub fn backend(mut self, backend: Arc<dyn SortedBackend>) -> Self {
        self.backend = backend;
        self
    }

    /// Register the handler for operation type `O`.
    ///
    /// At most one handler per concrete operation type: registering again
    /// for the same type replaces the previous mapping, last write wins.
    pub fn register_handler<O: OutputOperation>(
        mut self,
        handler: impl OperationHandler<O> + 'static,
    ) -> Self {
        self.handlers.insert(
            TypeId::of::<O>(),
            Arc::new(HandlerAdapter::<O, _>::new(handler)),
        );
        self
    }

    /// Register the built-in handlers for the shipped operations
    pub fn with_default_handlers(self) -> Self {
        self.register_handler(handlers::AddElementsHandler)
            .register_handler(handlers::GetAllElementsHandler)
            .register_handler(handlers::ExtractItemsHandler)
            .register_handler(handlers::LimitHandler)
    }

    /// Freeze the registry and build the store
    pub fn build(self) -> Result<Store> {
        let registry = SerialiserRegistry::from_config(&self.config.schema)?;
        tracing::debug!(
            handlers = self.handlers.len(),
            "store built, handler registry frozen"
        );
        Ok(Store {
            handlers: self.handlers,
            codec: ElementKeyCodec::new(registry),
            backend: self.backend,
            config: self.config,
        })
    }
}

impl Default for StoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    /// Start building a store
    pub fn builder() -> StoreBuilder {
        StoreBuilder::new()
    }

    /// The composite key codec for this store's schema
    pub fn codec(&self) -> &ElementKeyCodec {
        &self.codec
    }

    /// The sorted key-value backend
    pub fn backend(&self) -> &Arc<dyn SortedBackend> {
        &self.backend
    }

    /// The store configuration
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Whether a handler is registered for operation type `O`
    pub fn has_handler<O: OutputOperation>(&self) -> bool {
        self.handlers.contains_key(&TypeId::of::<O>())
    }

    /// Execute one operation.
    ///
    /// Fails with a dispatch error when no handler is registered for the
    /// operation's exact runtime type; handler failures propagate
    /// unchanged.
    pub fn execute<O: OutputOperation>(&self, operation: O, context: &Context) -> Result<O::Output> {
        let name = operation.name();
        let output = self.dispatch(Box::new(operation), context)?;
        output
            .downcast::<O::Output>()
            .map(|output| *output)
            .map_err(|_| Error::Dispatch(DispatchError::UnexpectedOutputType { operation: name }))
    }

    /// Execute a chain, strictly sequentially and left-to-right.
    ///
    /// Stage k's output is bound as stage k+1's input. The first failing
    /// stage aborts the chain; no later stage runs and partially applied
    /// side effects are not rolled back. `T` is the final stage's output
    /// type.
    pub fn execute_chain<T: Any + Send>(
        &self,
        chain: OperationChain,
        context: &Context,
    ) -> Result<T> {
        let mut carried: Option<Box<dyn Any + Send>> = None;
        let mut last_name = "OperationChain";
        for (index, mut stage) in chain.into_stages().into_iter().enumerate() {
            if let Some(input) = carried.take() {
                stage.bind_input(input)?;
            }
            last_name = stage.name();
            tracing::debug!(stage = index, operation = last_name, "executing chain stage");
            carried = Some(self.dispatch(stage, context)?);
        }
        let output = carried.ok_or(DispatchError::EmptyChain)?;
        output
            .downcast::<T>()
            .map(|output| *output)
            .map_err(|_| {
                Error::Dispatch(DispatchError::UnexpectedOutputType { operation: last_name })
            })
    }

    /// Resolve the handler for the operation's concrete type and invoke it
    fn dispatch(
        &self,
        operation: Box<dyn Operation>,
        context: &Context,
    ) -> Result<Box<dyn Any + Send>> {
        let type_id = operation.as_any().type_id();
        let handler = self.handlers.get(&type_id).ok_or_else(|| {
            DispatchError::NoHandler {
                operation: operation.name(),
            }
        })?;
        handler.handle_erased(operation, context, self)
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("handlers", &self.handlers.len())
            .field("backend_records", &self.backend.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Value;
    use crate::element::{Edge, Element, Entity};
    use crate::key::BatchSummary;
    use crate::ops::impls::{AddElements, ExtractItems, GetAllElements, Limit};

    fn store() -> Store {
        Store::builder().with_default_handlers().build().unwrap()
    }

    #[test]
    fn executing_an_unhandled_operation_is_a_dispatch_error() {
        let store = Store::builder().build().unwrap();
        let err = store
            .execute(GetAllElements::new(), &Context::default())
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Dispatch(DispatchError::NoHandler { operation: "GetAllElements" })
        ));
    }

    #[test]
    fn reregistering_replaces_the_previous_handler() {
        // Stub handler that ignores the backend entirely
        struct StubHandler;
        impl OperationHandler<GetAllElements> for StubHandler {
            fn handle(
                &self,
                _operation: GetAllElements,
                _context: &Context,
                _store: &Store,
            ) -> Result<Vec<Element>> {
                Ok(vec![Entity::new("stub", "v").into()])
            }
        }

        let store = Store::builder()
            .with_default_handlers()
            .register_handler(StubHandler)
            .build()
            .unwrap();

        let elements = store
            .execute(GetAllElements::new(), &Context::default())
            .unwrap();
        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0].group().as_str(), "stub");
    }

    #[test]
    fn add_then_get_round_trips_elements() {
        let store = store();
        let ctx = Context::default();
        let elements: Vec<Element> = vec![
            Entity::new("BasicEntity", "v1").with_property("count", 1i64).into(),
            Edge::new("BasicEdge", "v1", "v2").with_property("weight", 0.25f64).into(),
        ];

        let summary: BatchSummary = store
            .execute(AddElements::new(elements.clone()), &ctx)
            .unwrap();
        assert_eq!(summary.converted, 2);
        assert_eq!(summary.skipped_count(), 0);
        // Entity row plus forward and reverse edge rows
        assert_eq!(store.backend().len(), 3);

        let mut read = store.execute(GetAllElements::new(), &ctx).unwrap();
        read.sort_by(|a, b| a.group().cmp(b.group()));
        assert_eq!(read, {
            let mut expected = elements;
            expected.sort_by(|a, b| a.group().cmp(b.group()));
            expected
        });
    }

    #[test]
    fn chain_feeds_each_stage_output_forward() {
        let store = store();
        let ctx = Context::default();
        let elements: Vec<Element> = (0..5)
            .map(|i| Entity::new("g", format!("v{i}")).into())
            .collect();
        store.execute(AddElements::new(elements), &ctx).unwrap();

        let chain = OperationChain::builder()
            .then(GetAllElements::new())
            .then(Limit::new(2))
            .build()
            .unwrap();
        let limited: Vec<Element> = store.execute_chain(chain, &ctx).unwrap();
        assert_eq!(limited.len(), 2);
    }

    #[test]
    fn chain_stops_at_the_first_failing_stage() {
        // No handler for Limit: the chain must fail there and the final
        // AddElements stage must never run
        let store = Store::builder()
            .register_handler(handlers::GetAllElementsHandler)
            .register_handler(handlers::AddElementsHandler)
            .build()
            .unwrap();
        let ctx = Context::default();

        let chain = OperationChain::builder()
            .then(GetAllElements::new())
            .then(Limit::new(1))
            .then(AddElements::default())
            .build()
            .unwrap();
        let err = store
            .execute_chain::<BatchSummary>(chain, &ctx)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Dispatch(DispatchError::NoHandler { operation: "Limit" })
        ));
        assert!(store.backend().is_empty());
    }

    #[test]
    fn chain_output_type_is_checked_at_the_caller() {
        let store = store();
        let chain = OperationChain::builder()
            .then(GetAllElements::new())
            .build()
            .unwrap();
        let err = store
            .execute_chain::<Vec<Value>>(chain, &Context::default())
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Dispatch(DispatchError::UnexpectedOutputType { .. })
        ));
    }

    #[test]
    fn extraction_chain_runs_end_to_end() {
        let store = store();
        let input = vec![
            vec![Value::from("a"), Value::from("b"), Value::from("c")],
            vec![Value::from("d"), Value::from("e"), Value::from("f")],
        ];
        let chain = OperationChain::builder()
            .then(ExtractItems::with_input(input, 1))
            .build()
            .unwrap();
        let extracted: Vec<Value> = store
            .execute_chain(chain, &Context::default())
            .unwrap();
        assert_eq!(extracted, vec![Value::from("b"), Value::from("e")]);
    }

    #[test]
    fn store_is_shareable_across_threads() {
        let store = Arc::new(store());
        let mut join = Vec::new();
        for i in 0..4 {
            let store = Arc::clone(&store);
            join.push(std::thread::spawn(move || {
                let ctx = Context::default();
                let element: Element = Entity::new("g", format!("v{i}")).into();
                store.execute(AddElements::new(vec![element]), &ctx).unwrap();
            }));
        }
        for handle in join {
            handle.join().unwrap();
        }
        assert_eq!(store.backend().len(), 4);
    }
}
