//! Batch element conversion
//!
//! Bulk writes convert many elements at once. The partial-failure policy
//! is explicit: with skipping enabled, an element whose properties cannot
//! be encoded is dropped from the batch and recorded in the summary's
//! skip list; nothing is silently absorbed. With skipping disabled the
//! first failure aborts the whole batch.

use crate::core::error::{ConversionError, Error, Result};
use crate::element::Element;
use crate::key::codec::{ElementKeyCodec, KeyValue};

/// An element dropped from a batch, with the failure that excluded it
#[derive(Debug)]
pub struct SkippedElement {
    /// The element that could not be converted
    pub element: Element,
    /// Why conversion failed
    pub error: ConversionError,
}

/// Outcome of converting a batch of elements
#[derive(Debug, Default)]
pub struct BatchSummary {
    /// Backend records for every successfully converted element
    pub pairs: Vec<KeyValue>,
    /// Elements converted (not records; an edge yields two records)
    pub converted: usize,
    /// Elements dropped, with their conversion failures
    pub skipped: Vec<SkippedElement>,
}

impl BatchSummary {
    /// Number of elements dropped from the batch
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }
}

impl ElementKeyCodec {
    /// Convert a batch of elements into backend records.
    ///
    /// With `skip_invalid` set, per-element conversion failures are
    /// collected into the summary instead of aborting; otherwise the
    /// first failure is returned and no summary is produced.
    pub fn encode_batch(
        &self,
        elements: impl IntoIterator<Item = Element>,
        skip_invalid: bool,
    ) -> Result<BatchSummary> {
        let mut summary = BatchSummary::default();
        for element in elements {
            match self.encode(&element) {
                Ok(encoded) => {
                    summary.pairs.extend(encoded.into_pairs());
                    summary.converted += 1;
                }
                Err(error) if skip_invalid => {
                    tracing::warn!(
                        group = %element.group(),
                        %error,
                        "skipping element that failed key conversion"
                    );
                    summary.skipped.push(SkippedElement { element, error });
                }
                Err(error) => return Err(Error::Conversion(error)),
            }
        }
        if !summary.skipped.is_empty() {
            tracing::warn!(
                converted = summary.converted,
                skipped = summary.skipped.len(),
                "batch conversion finished with skipped elements"
            );
        }
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{PropertyKey, Value, ValueKind};
    use crate::element::Entity;
    use crate::serialisation::SerialiserRegistry;

    /// Registry whose "poison" property is bound to a serialiser that
    /// cannot handle strings, so string values fail to encode
    fn poisoned_registry() -> SerialiserRegistry {
        let mut registry = SerialiserRegistry::with_defaults();
        registry.register_property(
            PropertyKey::from("poison"),
            SerialiserRegistry::by_name("ordered_long").unwrap(),
        );
        registry
    }

    fn batch_with_one_bad_element() -> Vec<Element> {
        (0..5)
            .map(|i| {
                let entity = Entity::new("g", format!("v{i}"));
                let entity = if i == 2 {
                    entity.with_property("poison", "not a long")
                } else {
                    entity.with_property("count", i as i64)
                };
                entity.into()
            })
            .collect()
    }

    #[test]
    fn one_bad_element_yields_n_minus_one_outputs_and_one_skip() {
        let codec = ElementKeyCodec::new(poisoned_registry());
        let summary = codec.encode_batch(batch_with_one_bad_element(), true).unwrap();

        assert_eq!(summary.converted, 4);
        assert_eq!(summary.pairs.len(), 4);
        assert_eq!(summary.skipped_count(), 1);

        let skipped = &summary.skipped[0];
        assert_eq!(skipped.error.property, "poison");
        assert_eq!(skipped.error.serialiser, "ordered_long");
        assert_eq!(
            skipped.element.properties().get(&PropertyKey::from("poison")),
            Some(&Value::String("not a long".into()))
        );
    }

    #[test]
    fn without_skipping_the_first_failure_aborts() {
        let codec = ElementKeyCodec::new(poisoned_registry());
        let err = codec
            .encode_batch(batch_with_one_bad_element(), false)
            .unwrap_err();
        assert!(matches!(err, Error::Conversion(_)));
    }

    #[test]
    fn clean_batch_has_no_skips() {
        let codec = ElementKeyCodec::new(SerialiserRegistry::with_defaults());
        let elements: Vec<Element> = (0..3)
            .map(|i| Entity::new("g", format!("v{i}")).into())
            .collect();
        let summary = codec.encode_batch(elements, true).unwrap();
        assert_eq!(summary.converted, 3);
        assert_eq!(summary.skipped_count(), 0);
        // Mis-kinded defaults cannot occur: every kind has a default
        assert!(codec.registry().lookup(None, ValueKind::Long).is_some());
    }
}
