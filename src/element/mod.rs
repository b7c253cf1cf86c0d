//! Graph element model
//!
//! An element is either an entity (one vertex) or an edge (two vertices).
//! Both carry a group label classifying them within the schema and a map
//! of typed properties.

use crate::core::types::{Group, Properties, PropertyKey, Value, Vertex};
use serde::{Deserialize, Serialize};

/// A graph entity: one vertex with a group label and properties
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// Group label
    pub group: Group,
    /// The vertex this entity describes
    pub vertex: Vertex,
    /// Entity properties
    pub properties: Properties,
}

/// A graph edge between two vertices
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    /// Group label
    pub group: Group,
    /// Source vertex
    pub source: Vertex,
    /// Destination vertex
    pub destination: Vertex,
    /// Whether the edge is directed
    pub directed: bool,
    /// Edge properties
    pub properties: Properties,
}

/// A graph element: an entity or an edge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Element {
    /// An entity
    Entity(Entity),
    /// An edge
    Edge(Edge),
}

impl Entity {
    /// Create a new entity with no properties
    pub fn new(group: impl Into<Group>, vertex: impl Into<Vertex>) -> Self {
        Self {
            group: group.into(),
            vertex: vertex.into(),
            properties: Properties::new(),
        }
    }

    /// Add a property, consuming and returning the entity
    pub fn with_property(mut self, key: impl Into<PropertyKey>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }
}

impl Edge {
    /// Create a new directed edge with no properties
    pub fn new(
        group: impl Into<Group>,
        source: impl Into<Vertex>,
        destination: impl Into<Vertex>,
    ) -> Self {
        Self {
            group: group.into(),
            source: source.into(),
            destination: destination.into(),
            directed: true,
            properties: Properties::new(),
        }
    }

    /// Mark the edge as undirected
    pub fn undirected(mut self) -> Self {
        self.directed = false;
        self
    }

    /// Add a property, consuming and returning the edge
    pub fn with_property(mut self, key: impl Into<PropertyKey>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }
}

impl Element {
    /// Group label of the element
    pub fn group(&self) -> &Group {
        match self {
            Element::Entity(e) => &e.group,
            Element::Edge(e) => &e.group,
        }
    }

    /// Properties of the element
    pub fn properties(&self) -> &Properties {
        match self {
            Element::Entity(e) => &e.properties,
            Element::Edge(e) => &e.properties,
        }
    }

    /// Whether this element is an edge
    pub fn is_edge(&self) -> bool {
        matches!(self, Element::Edge(_))
    }
}

impl From<Entity> for Element {
    fn from(e: Entity) -> Self {
        Element::Entity(e)
    }
}

impl From<Edge> for Element {
    fn from(e: Edge) -> Self {
        Element::Edge(e)
    }
}
