//! Field-set catalog: the enumerated standard field names legal at each
//! node type, used to separate standard fields from extensions.

use std::collections::HashMap;

use serde_json::Value;

use crate::error::ValidationError;

/// How the extension walker descends through a known field's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Child {
    /// Scalar or opaque value; the walker does not descend.
    Leaf,
    /// Object governed by the named field set.
    Node(&'static str),
    /// Array of objects, each governed by the named field set.
    List(&'static str),
    /// Event object; its field set comes from its own discriminator.
    Event,
    /// Array of event objects.
    EventList,
    /// Container whose contents are vendor extensions: every key inside
    /// must be namespace-qualified (e.g. `ilmd`).
    Extension,
}

/// The legal top-level field names of one node type.
#[derive(Debug, Clone)]
pub struct FieldSet {
    fields: Vec<(&'static str, Child)>,
}

impl FieldSet {
    fn new(fields: Vec<(&'static str, Child)>) -> Self {
        FieldSet { fields }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fields.iter().any(|(name, _)| *name == key)
    }

    /// The recursion kind of a known field, `None` for foreign keys.
    pub fn child(&self, key: &str) -> Option<Child> {
        self.fields
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, child)| *child)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|(name, _)| *name)
    }
}

/// Partition of a value's own keys against a registered field set, in
/// document key order.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldPartition {
    /// Keys present in the registered set.
    pub known: Vec<String>,
    /// Keys outside the set: extension candidates.
    pub foreign: Vec<String>,
}

/// Fields common to every event variant. `action` is not here: the
/// transformation variant doesn't carry it.
const EVENT_COMMON: &[(&'static str, Child)] = &[
    ("type", Child::Leaf),
    ("eventID", Child::Leaf),
    ("eventTime", Child::Leaf),
    ("eventTimeZoneOffset", Child::Leaf),
    ("recordTime", Child::Leaf),
    ("bizStep", Child::Leaf),
    ("disposition", Child::Leaf),
    ("readPoint", Child::Node("ReadPoint")),
    ("bizLocation", Child::Node("BizLocation")),
    ("bizTransactionList", Child::List("BizTransactionElement")),
    ("sourceList", Child::List("SourceElement")),
    ("destinationList", Child::List("DestinationElement")),
    ("sensorElementList", Child::List("SensorElement")),
    ("persistentDisposition", Child::Node("PersistentDisposition")),
    ("errorDeclaration", Child::Node("ErrorDeclaration")),
];

const DOCUMENT_COMMON: &[(&'static str, Child)] = &[
    ("@context", Child::Leaf),
    ("id", Child::Leaf),
    ("type", Child::Leaf),
    ("schemaVersion", Child::Leaf),
    ("creationDate", Child::Leaf),
    ("format", Child::Leaf),
    // The header is opaque: round-trip fidelity only, no field policing.
    ("epcisHeader", Child::Leaf),
    ("epcisBody", Child::Node("EPCISBody")),
];

/// Immutable catalog mapping a type name to its set of legal top-level
/// field names. Lookups are pure.
#[derive(Debug, Clone)]
pub struct FieldSetRegistry {
    sets: HashMap<&'static str, FieldSet>,
}

impl Default for FieldSetRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl FieldSetRegistry {
    /// The standard EPCIS 2.0 field-set catalog.
    pub fn standard() -> Self {
        let mut sets = HashMap::new();

        let mut register = |name: &'static str, fields: Vec<(&'static str, Child)>| {
            sets.insert(name, FieldSet::new(fields));
        };

        register("EPCISDocument", DOCUMENT_COMMON.to_vec());
        register("EPCISQueryDocument", DOCUMENT_COMMON.to_vec());
        register("EPCISMasterDataDocument", DOCUMENT_COMMON.to_vec());

        register(
            "EPCISBody",
            vec![
                ("event", Child::Event),
                ("eventList", Child::EventList),
                ("queryResults", Child::Leaf),
            ],
        );

        register(
            "ObjectEvent",
            event_set(&[
                ("action", Child::Leaf),
                ("epcList", Child::Leaf),
                ("quantityList", Child::List("QuantityElement")),
                ("ilmd", Child::Extension),
            ]),
        );
        register(
            "AggregationEvent",
            event_set(&[
                ("action", Child::Leaf),
                ("parentID", Child::Leaf),
                ("childEPCs", Child::Leaf),
                ("childQuantityList", Child::List("QuantityElement")),
            ]),
        );
        register(
            "TransactionEvent",
            event_set(&[
                ("action", Child::Leaf),
                ("parentID", Child::Leaf),
                ("epcList", Child::Leaf),
                ("quantityList", Child::List("QuantityElement")),
            ]),
        );
        register(
            "TransformationEvent",
            event_set(&[
                ("inputEPCList", Child::Leaf),
                ("inputQuantityList", Child::List("QuantityElement")),
                ("outputEPCList", Child::Leaf),
                ("outputQuantityList", Child::List("QuantityElement")),
                ("transformationID", Child::Leaf),
                ("ilmd", Child::Extension),
            ]),
        );
        register(
            "AssociationEvent",
            event_set(&[
                ("action", Child::Leaf),
                ("parentID", Child::Leaf),
                ("childEPCs", Child::Leaf),
                ("childQuantityList", Child::List("QuantityElement")),
            ]),
        );

        register("ReadPoint", vec![("id", Child::Leaf)]);
        register("BizLocation", vec![("id", Child::Leaf)]);
        register(
            "BizTransactionElement",
            vec![("type", Child::Leaf), ("bizTransaction", Child::Leaf)],
        );
        register(
            "SourceElement",
            vec![("type", Child::Leaf), ("source", Child::Leaf)],
        );
        register(
            "DestinationElement",
            vec![("type", Child::Leaf), ("destination", Child::Leaf)],
        );
        register(
            "QuantityElement",
            vec![
                ("epcClass", Child::Leaf),
                ("quantity", Child::Leaf),
                ("uom", Child::Leaf),
            ],
        );
        register(
            "PersistentDisposition",
            vec![("set", Child::Leaf), ("unset", Child::Leaf)],
        );
        register(
            "ErrorDeclaration",
            vec![
                ("declarationTime", Child::Leaf),
                ("reason", Child::Leaf),
                ("correctiveEventIDs", Child::Leaf),
            ],
        );
        register(
            "SensorElement",
            vec![
                ("sensorMetadata", Child::Node("SensorMetadata")),
                ("sensorReport", Child::List("SensorReportElement")),
            ],
        );
        register(
            "SensorMetadata",
            vec![
                ("time", Child::Leaf),
                ("startTime", Child::Leaf),
                ("endTime", Child::Leaf),
                ("deviceID", Child::Leaf),
                ("deviceMetadata", Child::Leaf),
                ("rawData", Child::Leaf),
                ("dataProcessingMethod", Child::Leaf),
                ("bizRules", Child::Leaf),
            ],
        );
        register(
            "SensorReportElement",
            vec![
                ("type", Child::Leaf),
                ("exception", Child::Leaf),
                ("deviceID", Child::Leaf),
                ("deviceMetadata", Child::Leaf),
                ("rawData", Child::Leaf),
                ("dataProcessingMethod", Child::Leaf),
                ("time", Child::Leaf),
                ("microorganism", Child::Leaf),
                ("chemicalSubstance", Child::Leaf),
                ("value", Child::Leaf),
                ("component", Child::Leaf),
                ("stringValue", Child::Leaf),
                ("booleanValue", Child::Leaf),
                ("hexBinaryValue", Child::Leaf),
                ("uriValue", Child::Leaf),
                ("minValue", Child::Leaf),
                ("maxValue", Child::Leaf),
                ("meanValue", Child::Leaf),
                ("sDev", Child::Leaf),
                ("percRank", Child::Leaf),
                ("percValue", Child::Leaf),
                ("uom", Child::Leaf),
                ("coordinateReferenceSystem", Child::Leaf),
            ],
        );

        FieldSetRegistry { sets }
    }

    pub fn get(&self, name: &str) -> Option<&FieldSet> {
        self.sets.get(name)
    }

    /// Partition a value's own keys into known and foreign against the
    /// named field set.
    ///
    /// A non-object value has no keys and partitions empty.
    ///
    /// # Errors
    ///
    /// `ValidationError::UnknownFieldSet` when the name is not registered,
    /// independent of the value argument.
    pub fn ensure_field_set(
        &self,
        value: &Value,
        name: &str,
    ) -> Result<FieldPartition, ValidationError> {
        let set = self
            .get(name)
            .ok_or_else(|| ValidationError::UnknownFieldSet { name: name.into() })?;

        let mut partition = FieldPartition {
            known: Vec::new(),
            foreign: Vec::new(),
        };
        if let Value::Object(map) = value {
            for key in map.keys() {
                if set.contains(key) {
                    partition.known.push(key.clone());
                } else {
                    partition.foreign.push(key.clone());
                }
            }
        }
        Ok(partition)
    }
}

fn event_set(extra: &[(&'static str, Child)]) -> Vec<(&'static str, Child)> {
    let mut fields = EVENT_COMMON.to_vec();
    fields.extend_from_slice(extra);
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn partitions_in_key_order() {
        let registry = FieldSetRegistry::standard();
        let value = json!({
            "eventTime": "2021-04-20T11:00:30.000+02:00",
            "example:a": 1,
            "action": "OBSERVE",
            "factoryId": 2
        });
        let partition = registry.ensure_field_set(&value, "ObjectEvent").unwrap();
        assert_eq!(partition.known, vec!["eventTime", "action"]);
        assert_eq!(partition.foreign, vec!["example:a", "factoryId"]);
    }

    #[test]
    fn unknown_name_fails_regardless_of_value() {
        let registry = FieldSetRegistry::standard();
        let err = registry
            .ensure_field_set(&json!({}), "doesNotExist")
            .unwrap_err();
        assert!(matches!(
            err,
            ValidationError::UnknownFieldSet { ref name } if name == "doesNotExist"
        ));
    }

    #[test]
    fn non_object_partitions_empty() {
        let registry = FieldSetRegistry::standard();
        let partition = registry
            .ensure_field_set(&json!("scalar"), "ObjectEvent")
            .unwrap();
        assert!(partition.known.is_empty());
        assert!(partition.foreign.is_empty());
    }

    #[test]
    fn transformation_event_has_no_action() {
        let registry = FieldSetRegistry::standard();
        let set = registry.get("TransformationEvent").unwrap();
        assert!(!set.contains("action"));
        assert!(set.contains("transformationID"));
    }

    #[test]
    fn every_registered_child_set_resolves() {
        let registry = FieldSetRegistry::standard();
        for set in registry.sets.values() {
            for name in set.field_names() {
                match set.child(name) {
                    Some(Child::Node(child)) | Some(Child::List(child)) => {
                        assert!(registry.get(child).is_some(), "missing set {child}");
                    }
                    _ => {}
                }
            }
        }
    }

    #[test]
    fn sensor_chain_is_registered() {
        let registry = FieldSetRegistry::standard();
        let object = registry.get("ObjectEvent").unwrap();
        assert_eq!(
            object.child("sensorElementList"),
            Some(Child::List("SensorElement"))
        );
        let sensor = registry.get("SensorElement").unwrap();
        assert_eq!(
            sensor.child("sensorReport"),
            Some(Child::List("SensorReportElement"))
        );
    }
}
