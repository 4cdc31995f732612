//! EPCIS Document Engine
//!
//! Build, serialize, and validate EPCIS 2.0 supply-chain event documents.
//!
//! This library covers the typed entity model (the polymorphic event
//! hierarchy and the document wrapper) and the document validation engine:
//! schema dispatch by discriminator, per-type field-set partitioning, and
//! recursive extension-namespace validation.
//!
//! # Example
//!
//! ```
//! use epcis_document::{Document, DocumentOptions, DocumentValidator, ObjectEvent};
//!
//! let options = DocumentOptions::default().creation_date("2024-03-15T00:00:00.000Z");
//!
//! let mut event = ObjectEvent::new();
//! event.add_epc("urn:epc:id:sgtin:0614141.107346.2018");
//! event
//!     .base
//!     .set_event_time("2024-03-15T00:00:00.000Z")
//!     .set_event_time_zone_offset("+00:00")
//!     .set_action("OBSERVE")
//!     .set_biz_step("shipping");
//!
//! let mut document = Document::epcis(&options);
//! document.add_event(event);
//!
//! let report = DocumentValidator::new().validate(&document.to_value()).unwrap();
//! assert!(report.success());
//! ```
//!
//! # Extension fields
//!
//! Any field outside a type's standard field set must be namespace-qualified
//! (`prefix:localName`) with the prefix declared in the document's
//! `@context`. The entity model carries such fields verbatim; the validation
//! engine enforces the qualification rule at every depth of the tree:
//!
//! ```
//! use epcis_document::DocumentValidator;
//! use serde_json::json;
//!
//! let document = json!({
//!     "@context": [
//!         "https://ref.gs1.org/standards/epcis/2.0.0/epcis-context.jsonld",
//!         { "evt": "https://ns.example.com/evt/" }
//!     ],
//!     "type": "EPCISDocument",
//!     "schemaVersion": "2.0",
//!     "creationDate": "2024-03-15T00:00:00.000Z",
//!     "epcisBody": {
//!         "event": {
//!             "type": "ObjectEvent",
//!             "eventTime": "2024-03-15T00:00:00.000Z",
//!             "eventTimeZoneOffset": "+00:00",
//!             "action": "OBSERVE",
//!             "epcList": ["urn:epc:id:sgtin:0614141.107346.2018"],
//!             "evt:factoryId": "factory-7"
//!         }
//!     }
//! });
//!
//! assert!(DocumentValidator::new().validate(&document).unwrap().success());
//! ```
//!
//! # Validation modes
//!
//! [`DocumentValidator::validate`] collects every violation into a
//! [`ValidationReport`]; [`DocumentValidator::assert_valid`] (and
//! [`Document::is_valid`]) throws the same ordered list as one aggregate
//! error. Unresolvable discriminators and unknown catalog names error in
//! both modes: with no catalog entry there is nothing to validate against.

mod catalog;
mod decode;
mod document;
mod error;
mod event;
mod extension;
mod field_set;
mod loader;
mod types;
mod validate;
mod values;

pub use catalog::SchemaRegistry;
pub use document::Document;
pub use error::{DecodeError, ValidateError, ValidationError, Violation, ViolationKind};
pub use event::{
    AggregationEvent, AssociationEvent, Event, EventBase, ObjectEvent, TransactionEvent,
    TransformationEvent,
};
pub use extension::{collect_prefixes, validate_extensions};
pub use field_set::{Child, FieldPartition, FieldSet, FieldSetRegistry};
pub use loader::{load_document, load_document_str};
pub use types::{
    discriminator, json_type_name, DocumentOptions, DocumentType, EventType, DEFAULT_CONTEXT,
    DEFAULT_SCHEMA_VERSION,
};
pub use validate::{DocumentValidator, ValidationReport};
pub use values::{
    BizLocation, BizTransactionElement, DestinationElement, ErrorDeclaration, Header,
    PersistentDisposition, QuantityElement, ReadPoint, SensorElement, SensorMetadata,
    SensorReportElement, SourceElement,
};
