//! Core types for EPCIS documents: discriminators and construction options.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Schema version stamped on documents that don't carry one.
pub const DEFAULT_SCHEMA_VERSION: &str = "2.0";

/// JSON-LD context stamped on documents that don't carry one.
pub const DEFAULT_CONTEXT: &str =
    "https://ref.gs1.org/standards/epcis/2.0.0/epcis-context.jsonld";

/// Returns the JSON type name for error messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Top-level discriminator selecting which structural schema governs a
/// whole document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentType {
    #[serde(rename = "EPCISDocument")]
    Epcis,
    #[serde(rename = "EPCISQueryDocument")]
    EpcisQuery,
    #[serde(rename = "EPCISMasterDataDocument")]
    EpcisMasterData,
}

impl DocumentType {
    /// All recognized document types.
    pub const ALL: &'static [DocumentType] = &[
        DocumentType::Epcis,
        DocumentType::EpcisQuery,
        DocumentType::EpcisMasterData,
    ];

    /// The discriminator value carried in the document's `type` field.
    pub fn name(&self) -> &'static str {
        match self {
            DocumentType::Epcis => "EPCISDocument",
            DocumentType::EpcisQuery => "EPCISQueryDocument",
            DocumentType::EpcisMasterData => "EPCISMasterDataDocument",
        }
    }

    /// Look up a document type by its discriminator value.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.name() == name)
    }

    /// Resolve a raw document value's discriminator.
    ///
    /// Reads `type`, falling back to the legacy `isA` field. Returns the
    /// unmatched discriminator (or a placeholder when none is present) as
    /// the error value so callers can wrap it in their own error type.
    pub fn resolve(value: &Value) -> Result<Self, String> {
        let found = discriminator(value);
        DocumentType::from_name(found).ok_or_else(|| found.to_string())
    }
}

/// Discriminator on each event selecting its own structural schema and
/// field set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    #[serde(rename = "ObjectEvent")]
    Object,
    #[serde(rename = "AggregationEvent")]
    Aggregation,
    #[serde(rename = "TransactionEvent")]
    Transaction,
    #[serde(rename = "TransformationEvent")]
    Transformation,
    #[serde(rename = "AssociationEvent")]
    Association,
}

impl EventType {
    /// All recognized event types.
    pub const ALL: &'static [EventType] = &[
        EventType::Object,
        EventType::Aggregation,
        EventType::Transaction,
        EventType::Transformation,
        EventType::Association,
    ];

    /// The discriminator value carried in the event's `type` field.
    pub fn name(&self) -> &'static str {
        match self {
            EventType::Object => "ObjectEvent",
            EventType::Aggregation => "AggregationEvent",
            EventType::Transaction => "TransactionEvent",
            EventType::Transformation => "TransformationEvent",
            EventType::Association => "AssociationEvent",
        }
    }

    /// Look up an event type by its discriminator value.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.name() == name)
    }

    /// Resolve a raw event value's discriminator (`type`, legacy `isA`).
    pub fn resolve(value: &Value) -> Result<Self, String> {
        let found = discriminator(value);
        EventType::from_name(found).ok_or_else(|| found.to_string())
    }
}

/// Placeholder reported when a value carries no discriminator at all.
pub(crate) const MISSING_DISCRIMINATOR: &str = "(missing)";

/// Read a value's discriminator: the `type` field, falling back to the
/// legacy `isA` field.
pub fn discriminator(value: &Value) -> &str {
    value
        .get("type")
        .or_else(|| value.get("isA"))
        .and_then(Value::as_str)
        .unwrap_or(MISSING_DISCRIMINATOR)
}

/// Options for document construction.
///
/// Carries the values a document defaults when the corresponding field is
/// absent from input. There is no ambient global state: callers own the
/// configuration and pass it in explicitly.
#[derive(Debug, Clone)]
pub struct DocumentOptions {
    /// Value for `schemaVersion` when the input has none.
    pub schema_version: String,
    /// Value for `@context` when the input has none.
    pub context: Value,
    /// Value for `creationDate` when the input has none. `None` leaves the
    /// field unset (the document schema reports it structurally).
    pub creation_date: Option<String>,
    /// When true, serialization always emits the plural `eventList` body,
    /// even for a single event.
    pub use_event_list_by_default: bool,
}

impl Default for DocumentOptions {
    fn default() -> Self {
        DocumentOptions {
            schema_version: DEFAULT_SCHEMA_VERSION.to_string(),
            context: Value::String(DEFAULT_CONTEXT.to_string()),
            creation_date: None,
            use_event_list_by_default: false,
        }
    }
}

impl DocumentOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the default schema version.
    pub fn schema_version(mut self, version: impl Into<String>) -> Self {
        self.schema_version = version.into();
        self
    }

    /// Set the default `@context` value (string, mapping, or sequence).
    pub fn context(mut self, context: Value) -> Self {
        self.context = context;
        self
    }

    /// Set the default creation date (an RFC 3339 timestamp).
    pub fn creation_date(mut self, date: impl Into<String>) -> Self {
        self.creation_date = Some(date.into());
        self
    }

    /// Always serialize the plural `eventList` body shape.
    pub fn use_event_list_by_default(mut self, use_list: bool) -> Self {
        self.use_event_list_by_default = use_list;
        self
    }
}
