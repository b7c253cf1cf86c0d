//! Composite key codec
//!
//! Converts one element into one (entity) or two (edge) Key/Value byte
//! pairs for a backend that orders records by unsigned lexicographic key
//! comparison. Key layout, fields joined by the `0x00` delimiter after
//! escaping:
//!
//! ```text
//! entity:  esc(group) 00 esc(vertex) 00 FLAG_ENTITY
//! edge:    esc(group) 00 esc(source) 00 esc(destination) 00 flag
//!          esc(group) 00 esc(destination) 00 esc(source) 00 reversed-flag
//! ```
//!
//! Edges get a forward and a reverse orientation so traversal can start
//! from either endpoint; both rows share one Value payload. The Value
//! payload carries the properties: a varint count, then per property the
//! varint-framed name, a kind byte and the varint-framed encoding from
//! the property's configured serialiser.

use crate::core::error::{ConversionError, SerialisationError};
use crate::core::types::{Group, Properties, PropertyKey, ValueKind};
use crate::element::{Edge, Element, Entity};
use crate::key::escape::{decode_varint, encode_varint, escape, unescape, DELIMITER};
use crate::serialisation::SerialiserRegistry;

/// Key flag byte for an entity row
pub const FLAG_ENTITY: u8 = 1;
/// Key flag byte for a directed edge, forward orientation
pub const FLAG_EDGE: u8 = 2;
/// Key flag byte for a directed edge, reverse orientation
pub const FLAG_EDGE_REVERSED: u8 = 3;
/// Key flag byte for an undirected edge, forward orientation
pub const FLAG_UNDIRECTED_EDGE: u8 = 4;
/// Key flag byte for an undirected edge, reverse orientation
pub const FLAG_UNDIRECTED_EDGE_REVERSED: u8 = 5;

/// One backend storage record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValue {
    /// Raw key; unsigned lexicographic order defines iteration order
    pub key: Vec<u8>,
    /// Raw value payload
    pub value: Vec<u8>,
}

impl KeyValue {
    /// Hex rendering of the key for diagnostics
    pub fn key_hex(&self) -> String {
        hex::encode(&self.key)
    }
}

/// The key(s) and value produced from one element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedElement {
    /// One key for entities, forward and reverse keys for edges
    pub keys: Vec<Vec<u8>>,
    /// Shared value payload
    pub value: Vec<u8>,
}

impl EncodedElement {
    /// Expand into backend records, one per key, cloning the shared value
    pub fn into_pairs(self) -> Vec<KeyValue> {
        let value = self.value;
        self.keys
            .into_iter()
            .map(|key| KeyValue {
                key,
                value: value.clone(),
            })
            .collect()
    }
}

/// An element decoded from one backend row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedElement {
    /// The reconstructed element, endpoints restored for reverse rows
    pub element: Element,
    /// Whether the row was the reverse orientation of an edge
    pub reversed: bool,
}

/// Converts elements to and from sorted storage keys
#[derive(Debug, Clone, Default)]
pub struct ElementKeyCodec {
    registry: SerialiserRegistry,
}

impl ElementKeyCodec {
    /// Create a codec over the given serialiser registry
    pub fn new(registry: SerialiserRegistry) -> Self {
        Self { registry }
    }

    /// The serialiser registry backing this codec
    pub fn registry(&self) -> &SerialiserRegistry {
        &self.registry
    }

    /// Convert one element into its key(s) and value payload.
    ///
    /// Either yields the full encoding or a typed failure naming the
    /// offending property and serialiser; never a silent null key.
    pub fn encode(&self, element: &Element) -> Result<EncodedElement, ConversionError> {
        let value = self.encode_properties(element.group(), element.properties())?;
        let keys = match element {
            Element::Entity(entity) => vec![Self::entity_key(entity)],
            Element::Edge(edge) => vec![Self::edge_key(edge, false), Self::edge_key(edge, true)],
        };
        Ok(EncodedElement { keys, value })
    }

    /// Decode one backend row back into an element
    pub fn decode(&self, key: &[u8], value: &[u8]) -> Result<DecodedElement, SerialisationError> {
        let (&flag, body) = key.split_last().ok_or_else(|| {
            SerialisationError::Malformed("key is empty".into())
        })?;
        let body = body.strip_suffix(&[DELIMITER]).ok_or_else(|| {
            SerialisationError::Malformed("key missing delimiter before flag".into())
        })?;

        let fields: Vec<Vec<u8>> = body
            .split(|&b| b == DELIMITER)
            .map(unescape)
            .collect::<Result<_, _>>()?;
        let properties = self.decode_properties(value)?;

        match (flag, fields.as_slice()) {
            (FLAG_ENTITY, [group, vertex]) => Ok(DecodedElement {
                element: Element::Entity(Entity {
                    group: field_str(group)?.into(),
                    vertex: field_str(vertex)?.into(),
                    properties,
                }),
                reversed: false,
            }),
            (
                FLAG_EDGE | FLAG_EDGE_REVERSED | FLAG_UNDIRECTED_EDGE
                | FLAG_UNDIRECTED_EDGE_REVERSED,
                [group, first, second],
            ) => {
                let reversed =
                    matches!(flag, FLAG_EDGE_REVERSED | FLAG_UNDIRECTED_EDGE_REVERSED);
                let directed = matches!(flag, FLAG_EDGE | FLAG_EDGE_REVERSED);
                let (source, destination) = if reversed {
                    (second, first)
                } else {
                    (first, second)
                };
                Ok(DecodedElement {
                    element: Element::Edge(Edge {
                        group: field_str(group)?.into(),
                        source: field_str(source)?.into(),
                        destination: field_str(destination)?.into(),
                        directed,
                        properties,
                    }),
                    reversed,
                })
            }
            (flag, fields) => Err(SerialisationError::Malformed(format!(
                "key flag {flag:#04x} inconsistent with {} fields",
                fields.len()
            ))),
        }
    }

    fn entity_key(entity: &Entity) -> Vec<u8> {
        let mut key = escape(entity.group.as_bytes());
        key.push(DELIMITER);
        key.extend_from_slice(&escape(entity.vertex.as_bytes()));
        key.push(DELIMITER);
        key.push(FLAG_ENTITY);
        key
    }

    fn edge_key(edge: &Edge, reversed: bool) -> Vec<u8> {
        let (first, second) = if reversed {
            (&edge.destination, &edge.source)
        } else {
            (&edge.source, &edge.destination)
        };
        let flag = match (edge.directed, reversed) {
            (true, false) => FLAG_EDGE,
            (true, true) => FLAG_EDGE_REVERSED,
            (false, false) => FLAG_UNDIRECTED_EDGE,
            (false, true) => FLAG_UNDIRECTED_EDGE_REVERSED,
        };
        let mut key = escape(edge.group.as_bytes());
        key.push(DELIMITER);
        key.extend_from_slice(&escape(first.as_bytes()));
        key.push(DELIMITER);
        key.extend_from_slice(&escape(second.as_bytes()));
        key.push(DELIMITER);
        key.push(flag);
        key
    }

    fn encode_properties(
        &self,
        group: &Group,
        properties: &Properties,
    ) -> Result<Vec<u8>, ConversionError> {
        let conversion_error = |property: &PropertyKey, serialiser: &'static str, source| {
            ConversionError {
                group: group.as_str().to_owned(),
                property: property.as_str().to_owned(),
                serialiser,
                source,
            }
        };

        let mut out = Vec::new();
        encode_varint(properties.len() as u32, &mut out);
        for (key, value) in properties {
            let kind = value.kind();
            let serialiser = self.registry.lookup(Some(key), kind).ok_or_else(|| {
                conversion_error(
                    key,
                    "<unconfigured>",
                    SerialisationError::Malformed(format!(
                        "no serialiser configured for {kind} values"
                    )),
                )
            })?;
            let payload = serialiser
                .serialise_value(value)
                .map_err(|source| conversion_error(key, serialiser.name(), source))?;

            encode_varint(key.as_bytes().len() as u32, &mut out);
            out.extend_from_slice(key.as_bytes());
            out.push(kind as u8);
            encode_varint(payload.len() as u32, &mut out);
            out.extend_from_slice(&payload);
        }
        Ok(out)
    }

    fn decode_properties(&self, value: &[u8]) -> Result<Properties, SerialisationError> {
        let mut properties = Properties::new();
        let (count, mut offset) = decode_varint(value)?;
        for _ in 0..count {
            let (name, next) = read_framed(value, offset)?;
            offset = next;
            let &kind_byte = value.get(offset).ok_or(SerialisationError::Truncated {
                expected: offset + 1,
                actual: value.len(),
            })?;
            offset += 1;
            let kind = ValueKind::from_u8(kind_byte).ok_or_else(|| {
                SerialisationError::Malformed(format!("unknown value kind byte {kind_byte:#04x}"))
            })?;
            let (payload, next) = read_framed(value, offset)?;
            offset = next;

            let key = PropertyKey::from(std::str::from_utf8(name)?);
            let serialiser = self.registry.lookup(Some(&key), kind).ok_or_else(|| {
                SerialisationError::Malformed(format!(
                    "no serialiser configured for {kind} values"
                ))
            })?;
            properties.insert(key, serialiser.deserialise_value(payload)?);
        }
        if offset != value.len() {
            return Err(SerialisationError::Malformed(format!(
                "{} trailing bytes after property payload",
                value.len() - offset
            )));
        }
        Ok(properties)
    }
}

fn field_str(bytes: &[u8]) -> Result<&str, SerialisationError> {
    Ok(std::str::from_utf8(bytes)?)
}

/// Read one varint-framed slice starting at `offset`, returning the slice
/// and the offset past it
fn read_framed(bytes: &[u8], offset: usize) -> Result<(&[u8], usize), SerialisationError> {
    let (len, consumed) = decode_varint(&bytes[offset.min(bytes.len())..])?;
    let start = offset + consumed;
    let end = start + len as usize;
    if end > bytes.len() {
        return Err(SerialisationError::Truncated {
            expected: end,
            actual: bytes.len(),
        });
    }
    Ok((&bytes[start..end], end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Value;

    fn codec() -> ElementKeyCodec {
        ElementKeyCodec::new(SerialiserRegistry::with_defaults())
    }

    #[test]
    fn entity_produces_one_key() {
        let encoded = codec()
            .encode(&Entity::new("BasicEntity", "v1").with_property("count", 4i64).into())
            .unwrap();
        assert_eq!(encoded.keys.len(), 1);
        assert_eq!(*encoded.keys[0].last().unwrap(), FLAG_ENTITY);
    }

    #[test]
    fn edge_produces_forward_and_reverse_keys_sharing_one_value() {
        let encoded = codec()
            .encode(&Edge::new("BasicEdge", "v1", "v2").with_property("weight", 0.4f64).into())
            .unwrap();
        assert_eq!(encoded.keys.len(), 2);
        assert_ne!(encoded.keys[0], encoded.keys[1]);

        let pairs = encoded.into_pairs();
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].value, pairs[1].value);
    }

    #[test]
    fn element_round_trips_through_key_and_value() {
        let codec = codec();
        let element: Element = Edge::new("BasicEdge", "v1", "v2")
            .with_property("count", 10i64)
            .with_property("name", "link")
            .with_property("seen", Value::Time(86_400_000))
            .into();

        let encoded = codec.encode(&element).unwrap();
        let forward = codec.decode(&encoded.keys[0], &encoded.value).unwrap();
        assert!(!forward.reversed);
        assert_eq!(forward.element, element);

        let reverse = codec.decode(&encoded.keys[1], &encoded.value).unwrap();
        assert!(reverse.reversed);
        assert_eq!(reverse.element, element);
    }

    #[test]
    fn undirected_flag_survives_round_trip() {
        let codec = codec();
        let element: Element = Edge::new("BasicEdge", "v1", "v2").undirected().into();
        let encoded = codec.encode(&element).unwrap();
        for key in &encoded.keys {
            let decoded = codec.decode(key, &encoded.value).unwrap();
            assert_eq!(decoded.element, element);
        }
    }

    #[test]
    fn vertices_containing_delimiter_bytes_round_trip() {
        let codec = codec();
        let element: Element = Entity::new("g", "a\u{0}b\u{1}c").into();
        let encoded = codec.encode(&element).unwrap();
        let decoded = codec.decode(&encoded.keys[0], &encoded.value).unwrap();
        assert_eq!(decoded.element, element);
    }

    #[test]
    fn group_prefix_cannot_collide_across_fields() {
        // "ab" + "c" and "a" + "bc" must produce different keys
        let codec = codec();
        let first = codec.encode(&Entity::new("ab", "c").into()).unwrap();
        let second = codec.encode(&Entity::new("a", "bc").into()).unwrap();
        assert_ne!(first.keys[0], second.keys[0]);
    }

    #[test]
    fn keys_for_same_group_sort_by_vertex_order() {
        let codec = codec();
        let a = codec.encode(&Entity::new("g", "a").into()).unwrap();
        let b = codec.encode(&Entity::new("g", "b").into()).unwrap();
        assert!(a.keys[0] < b.keys[0]);
    }

    #[test]
    fn decode_rejects_malformed_keys() {
        let codec = codec();
        assert!(codec.decode(&[], &[0]).is_err());
        // Entity flag with three fields
        let mut key = escape(b"g");
        key.push(DELIMITER);
        key.extend_from_slice(&escape(b"a"));
        key.push(DELIMITER);
        key.extend_from_slice(&escape(b"b"));
        key.push(DELIMITER);
        key.push(FLAG_ENTITY);
        assert!(codec.decode(&key, &[0]).is_err());
    }

    #[test]
    fn decode_rejects_trailing_value_bytes() {
        let codec = codec();
        let encoded = codec.encode(&Entity::new("g", "v").into()).unwrap();
        let mut value = encoded.value.clone();
        value.push(0xFF);
        assert!(codec.decode(&encoded.keys[0], &value).is_err());
    }
}
