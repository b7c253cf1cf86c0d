//! GetAllElements handler
//!
//! Range-scans the backend and decodes rows back into elements. Each
//! edge is stored under a forward and a reverse key; the reverse rows
//! are suppressed here so every edge is returned exactly once.

use crate::core::error::Result;
use crate::element::Element;
use crate::key::escape::{escape, DELIMITER};
use crate::ops::context::Context;
use crate::ops::impls::GetAllElements;
use crate::store::handler::OperationHandler;
use crate::store::store::Store;

/// Handler for `GetAllElements`
#[derive(Debug, Default, Clone, Copy)]
pub struct GetAllElementsHandler;

impl OperationHandler<GetAllElements> for GetAllElementsHandler {
    fn handle(
        &self,
        operation: GetAllElements,
        context: &Context,
        store: &Store,
    ) -> Result<Vec<Element>> {
        let rows = match &operation.group {
            Some(group) => {
                let mut prefix = escape(group.as_bytes());
                prefix.push(DELIMITER);
                store.backend().scan_prefix(&prefix)?
            }
            None => store.backend().scan_all()?,
        };

        let mut elements = Vec::new();
        for row in rows {
            let decoded = store.codec().decode(&row.key, &row.value).map_err(|error| {
                tracing::warn!(key = %row.key_hex(), %error, "undecodable backend row");
                error
            })?;
            if !decoded.reversed {
                elements.push(decoded.element);
            }
        }
        tracing::debug!(
            job_id = %context.job_id(),
            count = elements.len(),
            "scanned elements"
        );
        Ok(elements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{Edge, Entity};
    use crate::ops::impls::AddElements;

    fn seeded_store() -> Store {
        let store = Store::builder().with_default_handlers().build().unwrap();
        let elements: Vec<Element> = vec![
            Entity::new("person", "v1").into(),
            Entity::new("place", "v2").into(),
            Edge::new("visited", "v1", "v2").into(),
        ];
        store
            .execute(AddElements::new(elements), &Context::default())
            .unwrap();
        store
    }

    #[test]
    fn edges_are_returned_exactly_once() {
        let store = seeded_store();
        let elements = store
            .execute(GetAllElements::new(), &Context::default())
            .unwrap();
        assert_eq!(elements.len(), 3);
        assert_eq!(elements.iter().filter(|e| e.is_edge()).count(), 1);
    }

    #[test]
    fn group_filter_scans_a_prefix() {
        let store = seeded_store();
        let elements = store
            .execute(GetAllElements::in_group("person"), &Context::default())
            .unwrap();
        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0].group().as_str(), "person");

        let none = store
            .execute(GetAllElements::in_group("missing"), &Context::default())
            .unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn an_undecodable_row_fails_the_scan() {
        use crate::core::error::Error;
        use crate::key::KeyValue;

        let store = Store::builder().with_default_handlers().build().unwrap();
        let garbage = KeyValue {
            key: vec![0xff],
            value: Vec::new(),
        };
        assert_eq!(garbage.key_hex(), "ff");
        store.backend().put(&[garbage]).unwrap();

        let err = store
            .execute(GetAllElements::new(), &Context::default())
            .unwrap_err();
        assert!(matches!(err, Error::Serialisation(_)));
    }
}
