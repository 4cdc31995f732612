//! The document entity: root wrapper around a header and a body of events.

use serde_json::{Map, Value};

use crate::decode::{emit, emit_string, into_map, take_entity, take_string, take_value};
use crate::error::{DecodeError, ValidateError};
use crate::event::Event;
use crate::types::{DocumentOptions, DocumentType};
use crate::validate::DocumentValidator;
use crate::values::Header;

/// An EPCIS document: type discriminator, JSON-LD context, header, and a
/// body holding events.
///
/// Construct one empty (via [`Document::new`]) and populate it through the
/// chained setters, or reconstruct from a raw value with
/// [`Document::from_value`]. Defaulted fields (`schemaVersion`, `@context`,
/// `creationDate`) are filled from [`DocumentOptions`] only when absent from
/// input, never overwritten.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub doc_type: DocumentType,
    pub schema_version: String,
    pub creation_date: Option<String>,
    /// Namespace context: a string, a prefix→URI mapping, or a sequence
    /// mixing both. Declares the legal extension-key prefixes.
    pub context: Value,
    pub format: Option<String>,
    pub header: Option<Header>,
    pub events: Vec<Event>,
    /// When true, serialization always emits the plural `eventList` body.
    pub use_event_list_by_default: bool,
    /// Unrecognized `epcisBody` fields, preserved verbatim.
    pub body_extensions: Map<String, Value>,
    /// Unrecognized top-level fields, preserved verbatim.
    pub extensions: Map<String, Value>,
}

impl Document {
    /// Create an empty document with only computed defaults set.
    pub fn new(doc_type: DocumentType, options: &DocumentOptions) -> Self {
        Document {
            doc_type,
            schema_version: options.schema_version.clone(),
            creation_date: options.creation_date.clone(),
            context: options.context.clone(),
            format: None,
            header: None,
            events: Vec::new(),
            use_event_list_by_default: options.use_event_list_by_default,
            body_extensions: Map::new(),
            extensions: Map::new(),
        }
    }

    /// Create an empty `EPCISDocument`.
    pub fn epcis(options: &DocumentOptions) -> Self {
        Self::new(DocumentType::Epcis, options)
    }

    /// Reconstruct a typed document from a raw value.
    ///
    /// # Errors
    ///
    /// `DecodeError::UnknownDocumentType` when the `type`/`isA`
    /// discriminator matches no known document type;
    /// `DecodeError::UnknownEventType` for an unrecognized event in the
    /// body; `DecodeError::InvalidField` when a structurally-known field
    /// cannot form its sub-entity.
    pub fn from_value(value: Value, options: &DocumentOptions) -> Result<Self, DecodeError> {
        let doc_type = DocumentType::resolve(&value)
            .map_err(|found| DecodeError::UnknownDocumentType { found })?;

        let mut map = into_map(value, "")?;
        map.shift_remove("type");
        map.shift_remove("isA");

        let context = take_value(&mut map, "@context").unwrap_or_else(|| options.context.clone());
        let schema_version = take_string(&mut map, "schemaVersion", "")?
            .unwrap_or_else(|| options.schema_version.clone());
        let creation_date =
            take_string(&mut map, "creationDate", "")?.or_else(|| options.creation_date.clone());
        let format = take_string(&mut map, "format", "")?;
        let header = take_entity(&mut map, "epcisHeader", "", Header::decode)?;

        let mut events = Vec::new();
        let mut body_extensions = Map::new();
        if let Some(body) = take_value(&mut map, "epcisBody") {
            let mut body_map = into_map(body, "/epcisBody")?;
            if let Some(event) = take_value(&mut body_map, "event") {
                // An empty object is the zero-event serialization, not an event.
                let is_empty = event.as_object().map(Map::is_empty).unwrap_or(false);
                if !is_empty {
                    events.push(Event::decode(event, "/epcisBody/event")?);
                }
            }
            if let Some(list) = take_value(&mut body_map, "eventList") {
                let items = match list {
                    Value::Array(items) => items,
                    other => {
                        return Err(crate::decode::invalid("/epcisBody/eventList", "array", &other))
                    }
                };
                for (i, item) in items.into_iter().enumerate() {
                    events.push(Event::decode(item, &format!("/epcisBody/eventList/{}", i))?);
                }
            }
            body_extensions = body_map;
        }

        Ok(Document {
            doc_type,
            schema_version,
            creation_date,
            context,
            format,
            header,
            events,
            use_event_list_by_default: options.use_event_list_by_default,
            body_extensions,
            extensions: map,
        })
    }

    /// Serialize to a plain value.
    ///
    /// Computed fields are derived from current state on every call: a
    /// mutation after construction is reflected deterministically in the
    /// next serialization. The body emits a singular `event` field only
    /// when `use_event_list_by_default` is off and the document holds at
    /// most one event; every other case emits `eventList`.
    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        map.insert("@context".into(), self.context.clone());
        map.insert("type".into(), Value::String(self.doc_type.name().into()));
        map.insert(
            "schemaVersion".into(),
            Value::String(self.schema_version.clone()),
        );
        emit_string(&mut map, "creationDate", &self.creation_date);
        emit_string(&mut map, "format", &self.format);
        emit(&mut map, "epcisHeader", self.header.as_ref().map(Header::to_value));

        let mut body = Map::new();
        if !self.use_event_list_by_default && self.events.len() == 1 {
            body.insert("event".into(), self.events[0].to_value());
        } else if !self.use_event_list_by_default && self.events.is_empty() {
            body.insert("event".into(), Value::Object(Map::new()));
        } else {
            body.insert(
                "eventList".into(),
                Value::Array(self.events.iter().map(Event::to_value).collect()),
            );
        }
        body.extend(self.body_extensions.clone());
        map.insert("epcisBody".into(), Value::Object(body));

        map.extend(self.extensions.clone());
        Value::Object(map)
    }

    pub fn set_schema_version(&mut self, version: impl Into<String>) -> &mut Self {
        self.schema_version = version.into();
        self
    }

    pub fn set_creation_date(&mut self, date: impl Into<String>) -> &mut Self {
        self.creation_date = Some(date.into());
        self
    }

    pub fn set_context(&mut self, context: Value) -> &mut Self {
        self.context = context;
        self
    }

    pub fn set_format(&mut self, format: impl Into<String>) -> &mut Self {
        self.format = Some(format.into());
        self
    }

    pub fn set_header(&mut self, header: Header) -> &mut Self {
        self.header = Some(header);
        self
    }

    pub fn add_event(&mut self, event: impl Into<Event>) -> &mut Self {
        self.events.push(event.into());
        self
    }

    pub fn add_events(&mut self, events: impl IntoIterator<Item = Event>) -> &mut Self {
        self.events.extend(events);
        self
    }

    /// Drop the first structurally-equal event. A no-op when absent.
    pub fn remove_event(&mut self, event: &Event) -> &mut Self {
        if let Some(pos) = self.events.iter().position(|e| e == event) {
            self.events.remove(pos);
        }
        self
    }

    pub fn clear_events(&mut self) -> &mut Self {
        self.events.clear();
        self
    }

    pub fn set_extension(&mut self, key: impl Into<String>, value: Value) -> &mut Self {
        self.extensions.insert(key.into(), value);
        self
    }

    pub fn get_extension(&self, key: &str) -> Option<&Value> {
        self.extensions.get(key)
    }

    pub fn remove_extension(&mut self, key: &str) -> Option<Value> {
        self.extensions.shift_remove(key)
    }

    /// Assert-mode validation against the standard catalogs.
    ///
    /// # Errors
    ///
    /// `ValidateError::Invalid` carrying the full ordered violation list
    /// when the serialized document fails validation;
    /// `ValidateError::Lookup` when a discriminator or catalog name cannot
    /// be resolved.
    pub fn is_valid(&self) -> Result<(), ValidateError> {
        self.is_valid_with(&DocumentValidator::new())
    }

    /// Assert-mode validation against a caller-supplied validator.
    pub fn is_valid_with(&self, validator: &DocumentValidator) -> Result<(), ValidateError> {
        validator.assert_valid(&self.to_value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::ObjectEvent;
    use serde_json::json;

    fn options() -> DocumentOptions {
        DocumentOptions::default().creation_date("2024-03-15T00:00:00.000Z")
    }

    /// The body shape is recomputed at serialization, so raw fixtures using
    /// `eventList` only round-trip byte-for-byte with the plural toggle on.
    fn list_options() -> DocumentOptions {
        options().use_event_list_by_default(true)
    }

    fn object_event() -> ObjectEvent {
        let mut event = ObjectEvent::new();
        event.add_epc("urn:epc:id:sgtin:0614141.107346.2017");
        event
            .base
            .set_event_time("2021-04-20T11:00:30.000+02:00")
            .set_event_time_zone_offset("+02:00")
            .set_action("OBSERVE");
        event
    }

    #[test]
    fn empty_document_gets_defaults() {
        let doc = Document::epcis(&options());
        let value = doc.to_value();
        assert_eq!(value["type"], "EPCISDocument");
        assert_eq!(value["schemaVersion"], "2.0");
        assert_eq!(value["creationDate"], "2024-03-15T00:00:00.000Z");
        assert!(value["@context"].is_string());
    }

    #[test]
    fn present_fields_are_never_overwritten() {
        let raw = json!({
            "type": "EPCISDocument",
            "@context": { "evt": "https://example.com/evt" },
            "schemaVersion": "2.1",
            "creationDate": "2020-01-01T00:00:00Z",
            "epcisBody": { "eventList": [] }
        });
        let doc = Document::from_value(raw, &options()).unwrap();
        assert_eq!(doc.schema_version, "2.1");
        assert_eq!(doc.creation_date.as_deref(), Some("2020-01-01T00:00:00Z"));
        assert_eq!(doc.context, json!({ "evt": "https://example.com/evt" }));
    }

    #[test]
    fn single_event_serializes_singular_body() {
        let mut doc = Document::epcis(&options());
        doc.add_event(object_event());
        let value = doc.to_value();
        assert!(value["epcisBody"].get("event").is_some());
        assert!(value["epcisBody"].get("eventList").is_none());
    }

    #[test]
    fn second_event_flips_body_to_list() {
        let mut doc = Document::epcis(&options());
        doc.add_event(object_event());
        doc.add_event(object_event());
        let value = doc.to_value();
        assert!(value["epcisBody"].get("event").is_none());
        assert_eq!(value["epcisBody"]["eventList"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn list_toggle_forces_plural_for_one_event() {
        let opts = options().use_event_list_by_default(true);
        let mut doc = Document::epcis(&opts);
        doc.add_event(object_event());
        let value = doc.to_value();
        assert!(value["epcisBody"].get("event").is_none());
        assert_eq!(value["epcisBody"]["eventList"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn zero_events_with_toggle_off_serializes_empty_event() {
        let doc = Document::epcis(&options());
        assert_eq!(doc.to_value()["epcisBody"], json!({ "event": {} }));
    }

    #[test]
    fn body_shape_recomputed_after_mutation() {
        let mut doc = Document::epcis(&options());
        doc.add_event(object_event());
        assert!(doc.to_value()["epcisBody"].get("event").is_some());

        doc.add_event(object_event());
        assert!(doc.to_value()["epcisBody"].get("eventList").is_some());

        let second = doc.events[1].clone();
        doc.remove_event(&second);
        assert!(doc.to_value()["epcisBody"].get("event").is_some());
    }

    #[test]
    fn round_trip_full_document() {
        let raw = json!({
            "type": "EPCISDocument",
            "@context": [
                "https://ref.gs1.org/standards/epcis/2.0.0/epcis-context.jsonld",
                { "example": "https://ns.example.com/epcis/" }
            ],
            "schemaVersion": "2.0",
            "creationDate": "2005-07-11T11:30:47.0Z",
            "epcisHeader": {
                "sender": { "identifier": "urn:epc:id:sgln:0353579.00001.0" }
            },
            "epcisBody": {
                "eventList": [
                    {
                        "type": "ObjectEvent",
                        "eventTime": "2005-04-03T20:33:31.116000-06:00",
                        "eventTimeZoneOffset": "-06:00",
                        "action": "OBSERVE",
                        "epcList": ["urn:epc:id:sgtin:0614141.107346.2017"],
                        "example:myField": "extension"
                    }
                ]
            }
        });
        let doc = Document::from_value(raw.clone(), &list_options()).unwrap();
        assert_eq!(doc.to_value(), raw);
    }

    #[test]
    fn empty_singular_event_counts_as_zero_events() {
        let raw = json!({
            "type": "EPCISDocument",
            "@context": "https://ref.gs1.org/standards/epcis/2.0.0/epcis-context.jsonld",
            "schemaVersion": "2.0",
            "creationDate": "2005-07-11T11:30:47.0Z",
            "epcisBody": { "event": {} }
        });
        let doc = Document::from_value(raw.clone(), &options()).unwrap();
        assert!(doc.events.is_empty());
        assert_eq!(doc.to_value(), raw);
    }

    #[test]
    fn unknown_document_type_fails() {
        let err = Document::from_value(json!({ "foo": "bar" }), &options()).unwrap_err();
        assert!(matches!(err, DecodeError::UnknownDocumentType { .. }));
    }

    #[test]
    fn unknown_top_level_field_is_preserved() {
        let raw = json!({
            "type": "EPCISDocument",
            "@context": "https://ref.gs1.org/standards/epcis/2.0.0/epcis-context.jsonld",
            "schemaVersion": "2.0",
            "creationDate": "2005-07-11T11:30:47.0Z",
            "vendor:traceId": "abc-123",
            "epcisBody": { "eventList": [] }
        });
        let doc = Document::from_value(raw.clone(), &list_options()).unwrap();
        assert_eq!(doc.get_extension("vendor:traceId"), Some(&json!("abc-123")));
        assert_eq!(doc.to_value(), raw);
    }
}
