//! Structural schema catalog.
//!
//! One schema per document type and one per event type, embedded from
//! `schemas/` at build time. The catalog is opaque to the engine: entries
//! are consulted by name and can be swapped via [`SchemaRegistry::register`].

use std::collections::HashMap;

use serde_json::Value;

use crate::error::{ValidationError, Violation};

const EMBEDDED: &[(&str, &str)] = &[
    ("EPCISDocument", include_str!("../schemas/EPCISDocument.json")),
    (
        "EPCISQueryDocument",
        include_str!("../schemas/EPCISQueryDocument.json"),
    ),
    (
        "EPCISMasterDataDocument",
        include_str!("../schemas/EPCISMasterDataDocument.json"),
    ),
    ("ObjectEvent", include_str!("../schemas/ObjectEvent.json")),
    (
        "AggregationEvent",
        include_str!("../schemas/AggregationEvent.json"),
    ),
    (
        "TransactionEvent",
        include_str!("../schemas/TransactionEvent.json"),
    ),
    (
        "TransformationEvent",
        include_str!("../schemas/TransformationEvent.json"),
    ),
    (
        "AssociationEvent",
        include_str!("../schemas/AssociationEvent.json"),
    ),
];

/// Named catalog of structural schemas. Immutable after initialization;
/// lookups are pure.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    schemas: HashMap<String, Value>,
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl SchemaRegistry {
    /// The embedded EPCIS 2.0 schema catalog.
    pub fn standard() -> Self {
        let schemas = EMBEDDED
            .iter()
            .map(|(name, raw)| {
                let schema =
                    serde_json::from_str(raw).expect("embedded schema is valid JSON");
                (name.to_string(), schema)
            })
            .collect();
        SchemaRegistry { schemas }
    }

    /// An empty catalog, for callers supplying their own schemas.
    pub fn empty() -> Self {
        SchemaRegistry {
            schemas: HashMap::new(),
        }
    }

    /// Register or replace a schema under a name.
    pub fn register(&mut self, name: impl Into<String>, schema: Value) -> &mut Self {
        self.schemas.insert(name.into(), schema);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.schemas.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    /// Structurally check a value against the named schema.
    ///
    /// Returns the (possibly empty) ordered list of structural violations.
    /// Content violations never error; only an unregistered name or an
    /// uncompilable catalog entry does.
    ///
    /// # Errors
    ///
    /// `ValidationError::UnknownSchema` when the name is not registered,
    /// independent of the value argument; `ValidationError::InvalidSchema`
    /// when the entry fails to compile.
    pub fn validate_against_schema(
        &self,
        value: &Value,
        name: &str,
    ) -> Result<Vec<Violation>, ValidationError> {
        let schema = self
            .get(name)
            .ok_or_else(|| ValidationError::UnknownSchema { name: name.into() })?;

        let validator =
            jsonschema::validator_for(schema).map_err(|e| ValidationError::InvalidSchema {
                name: name.into(),
                message: e.to_string(),
            })?;

        Ok(validator
            .iter_errors(value)
            .map(|e| Violation::structural(e.instance_path.to_string(), e.to_string()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn standard_catalog_has_all_types() {
        let registry = SchemaRegistry::standard();
        for name in [
            "EPCISDocument",
            "EPCISQueryDocument",
            "EPCISMasterDataDocument",
            "ObjectEvent",
            "AggregationEvent",
            "TransactionEvent",
            "TransformationEvent",
            "AssociationEvent",
        ] {
            assert!(registry.contains(name), "missing schema {name}");
        }
    }

    #[test]
    fn unknown_schema_name_fails_regardless_of_value() {
        let registry = SchemaRegistry::standard();
        let err = registry
            .validate_against_schema(&json!({}), "doesNotExist")
            .unwrap_err();
        assert!(matches!(
            err,
            ValidationError::UnknownSchema { ref name } if name == "doesNotExist"
        ));
    }

    #[test]
    fn valid_object_event_has_no_violations() {
        let registry = SchemaRegistry::standard();
        let event = json!({
            "type": "ObjectEvent",
            "eventTime": "2021-04-20T11:00:30.000+02:00",
            "eventTimeZoneOffset": "+02:00",
            "action": "OBSERVE",
            "epcList": ["urn:epc:id:sgtin:0614141.107346.2017"]
        });
        let violations = registry
            .validate_against_schema(&event, "ObjectEvent")
            .unwrap();
        assert!(violations.is_empty(), "{violations:?}");
    }

    #[test]
    fn invalid_action_is_a_content_violation_not_an_error() {
        let registry = SchemaRegistry::standard();
        let event = json!({
            "type": "ObjectEvent",
            "eventTime": "2021-04-20T11:00:30.000+02:00",
            "eventTimeZoneOffset": "+02:00",
            "action": "OBSERVED",
            "epcList": []
        });
        let violations = registry
            .validate_against_schema(&event, "ObjectEvent")
            .unwrap();
        assert!(violations.iter().any(|v| v.path == "/action"));
    }

    #[test]
    fn bad_time_zone_offset_is_flagged() {
        let registry = SchemaRegistry::standard();
        let event = json!({
            "type": "ObjectEvent",
            "eventTime": "2021-04-20T11:00:30.000+02:00",
            "eventTimeZoneOffset": "+2:00",
            "action": "OBSERVE"
        });
        let violations = registry
            .validate_against_schema(&event, "ObjectEvent")
            .unwrap();
        assert!(violations
            .iter()
            .any(|v| v.path == "/eventTimeZoneOffset"));
    }

    #[test]
    fn missing_body_is_flagged_on_document() {
        let registry = SchemaRegistry::standard();
        let doc = json!({
            "@context": "https://ref.gs1.org/standards/epcis/2.0.0/epcis-context.jsonld",
            "type": "EPCISDocument",
            "schemaVersion": "2.0",
            "creationDate": "2005-07-11T11:30:47.0Z"
        });
        let violations = registry
            .validate_against_schema(&doc, "EPCISDocument")
            .unwrap();
        assert!(!violations.is_empty());
    }

    #[test]
    fn body_with_both_shapes_is_flagged() {
        let registry = SchemaRegistry::standard();
        let doc = json!({
            "@context": "https://ref.gs1.org/standards/epcis/2.0.0/epcis-context.jsonld",
            "type": "EPCISDocument",
            "schemaVersion": "2.0",
            "creationDate": "2005-07-11T11:30:47.0Z",
            "epcisBody": { "event": {}, "eventList": [] }
        });
        let violations = registry
            .validate_against_schema(&doc, "EPCISDocument")
            .unwrap();
        assert!(violations.iter().any(|v| v.path == "/epcisBody"));
    }

    #[test]
    fn registered_override_takes_effect() {
        let mut registry = SchemaRegistry::empty();
        registry.register("Anything", json!({ "type": "number" }));
        let violations = registry
            .validate_against_schema(&json!("nope"), "Anything")
            .unwrap();
        assert_eq!(violations.len(), 1);
    }
}
