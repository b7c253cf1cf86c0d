//! Serialiser registry
//!
//! Maps each value kind, optionally qualified by property name, to the
//! serialiser that encodes it. Built once per schema during configuration
//! and shared immutably afterwards; serialisers themselves are stateless
//! singletons safe for concurrent use.

use crate::core::config::SchemaConfig;
use crate::core::error::{Error, Result};
use crate::core::types::{PropertyKey, ValueKind};
use crate::serialisation::ordered::{
    BooleanSerialiser, BytesSerialiser, NullSerialiser, OrderedDoubleSerialiser,
    OrderedLongSerialiser, OrderedStringSerialiser, OrderedTimeSerialiser,
};
use crate::serialisation::serialiser::ValueSerialiser;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::Arc;

static ORDERED_LONG: Lazy<Arc<dyn ValueSerialiser>> =
    Lazy::new(|| Arc::new(OrderedLongSerialiser));
static ORDERED_TIME: Lazy<Arc<dyn ValueSerialiser>> =
    Lazy::new(|| Arc::new(OrderedTimeSerialiser));
static ORDERED_DOUBLE: Lazy<Arc<dyn ValueSerialiser>> =
    Lazy::new(|| Arc::new(OrderedDoubleSerialiser));
static ORDERED_STRING: Lazy<Arc<dyn ValueSerialiser>> =
    Lazy::new(|| Arc::new(OrderedStringSerialiser));
static BOOLEAN: Lazy<Arc<dyn ValueSerialiser>> = Lazy::new(|| Arc::new(BooleanSerialiser));
static BYTES: Lazy<Arc<dyn ValueSerialiser>> = Lazy::new(|| Arc::new(BytesSerialiser));
static NULL: Lazy<Arc<dyn ValueSerialiser>> = Lazy::new(|| Arc::new(NullSerialiser));

/// Registry mapping value kinds and property names to serialisers
#[derive(Clone)]
pub struct SerialiserRegistry {
    by_kind: HashMap<ValueKind, Arc<dyn ValueSerialiser>>,
    by_property: HashMap<PropertyKey, Arc<dyn ValueSerialiser>>,
}

impl SerialiserRegistry {
    /// Registry with the default order-preserving serialiser for every kind
    pub fn with_defaults() -> Self {
        let mut by_kind: HashMap<ValueKind, Arc<dyn ValueSerialiser>> = HashMap::new();
        by_kind.insert(ValueKind::Null, NULL.clone());
        by_kind.insert(ValueKind::Bool, BOOLEAN.clone());
        by_kind.insert(ValueKind::Long, ORDERED_LONG.clone());
        by_kind.insert(ValueKind::Double, ORDERED_DOUBLE.clone());
        by_kind.insert(ValueKind::String, ORDERED_STRING.clone());
        by_kind.insert(ValueKind::Bytes, BYTES.clone());
        by_kind.insert(ValueKind::Time, ORDERED_TIME.clone());
        Self {
            by_kind,
            by_property: HashMap::new(),
        }
    }

    /// Build a registry from schema configuration, resolving serialiser
    /// names to the shipped implementations
    pub fn from_config(schema: &SchemaConfig) -> Result<Self> {
        let mut registry = Self::with_defaults();
        for (property, name) in &schema.property_serialisers {
            let serialiser = Self::by_name(name).ok_or_else(|| {
                Error::config(format!(
                    "Unknown serialiser '{name}' configured for property '{property}'"
                ))
            })?;
            registry.register_property(PropertyKey::from(property.as_str()), serialiser);
        }
        Ok(registry)
    }

    /// Resolve a serialiser by its configured name
    pub fn by_name(name: &str) -> Option<Arc<dyn ValueSerialiser>> {
        match name {
            "ordered_long" => Some(ORDERED_LONG.clone()),
            "ordered_time" => Some(ORDERED_TIME.clone()),
            "ordered_double" => Some(ORDERED_DOUBLE.clone()),
            "ordered_string" => Some(ORDERED_STRING.clone()),
            "boolean" => Some(BOOLEAN.clone()),
            "bytes" => Some(BYTES.clone()),
            "null" => Some(NULL.clone()),
            _ => None,
        }
    }

    /// Replace the serialiser for a value kind
    pub fn register_kind(&mut self, kind: ValueKind, serialiser: Arc<dyn ValueSerialiser>) {
        self.by_kind.insert(kind, serialiser);
    }

    /// Register a per-property override
    pub fn register_property(&mut self, key: PropertyKey, serialiser: Arc<dyn ValueSerialiser>) {
        self.by_property.insert(key, serialiser);
    }

    /// Look up the serialiser for a property value: the property-name
    /// override wins, otherwise the kind default
    pub fn lookup(
        &self,
        property: Option<&PropertyKey>,
        kind: ValueKind,
    ) -> Option<&Arc<dyn ValueSerialiser>> {
        if let Some(key) = property {
            if let Some(serialiser) = self.by_property.get(key) {
                return Some(serialiser);
            }
        }
        self.by_kind.get(&kind)
    }
}

impl Default for SerialiserRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl std::fmt::Debug for SerialiserRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialiserRegistry")
            .field("kinds", &self.by_kind.len())
            .field("property_overrides", &self.by_property.len())
            .finish()
    }
}
