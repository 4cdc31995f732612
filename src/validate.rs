//! Document validation: schema dispatch, per-event structural checks, and
//! extension-namespace validation, aggregated into one report.

use serde_json::{Map, Value};

use crate::catalog::SchemaRegistry;
use crate::error::{ValidateError, ValidationError, Violation};
use crate::extension::validate_extensions;
use crate::field_set::FieldSetRegistry;
use crate::types::{DocumentType, EventType};

/// Result of a collect-mode validation pass.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ValidationReport {
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    /// True when the pass found no violations.
    pub fn success(&self) -> bool {
        self.violations.is_empty()
    }
}

/// The validation engine: immutable schema and field-set catalogs plus the
/// traversal that runs a document through both.
///
/// Every operation is a pure function of its input value and the catalogs,
/// so one validator can serve concurrent callers without locking.
#[derive(Debug, Clone, Default)]
pub struct DocumentValidator {
    schemas: SchemaRegistry,
    field_sets: FieldSetRegistry,
}

impl DocumentValidator {
    /// A validator over the standard EPCIS 2.0 catalogs.
    pub fn new() -> Self {
        Self::default()
    }

    /// A validator over caller-supplied catalogs.
    pub fn with_catalogs(schemas: SchemaRegistry, field_sets: FieldSetRegistry) -> Self {
        DocumentValidator {
            schemas,
            field_sets,
        }
    }

    pub fn schemas(&self) -> &SchemaRegistry {
        &self.schemas
    }

    pub fn field_sets(&self) -> &FieldSetRegistry {
        &self.field_sets
    }

    /// Collect-mode validation of an arbitrary JSON-like value.
    ///
    /// Runs, in order: the document-level structural check, a structural
    /// check per event against that event's own schema, and extension
    /// validation over the whole tree. Content violations never stop the
    /// pass; the report carries every violation found.
    ///
    /// # Errors
    ///
    /// `ValidationError::UnknownDocumentType` when no registered document
    /// discriminator can be resolved (including a value with none at all),
    /// `ValidationError::UnknownEventType` for an unrecognized event
    /// discriminator, and the catalog lookup errors. These abort
    /// immediately: there is nothing to validate against.
    pub fn validate(&self, document: &Value) -> Result<ValidationReport, ValidationError> {
        let doc_type = DocumentType::resolve(document)
            .map_err(|found| ValidationError::UnknownDocumentType { found })?;

        let mut violations = self
            .schemas
            .validate_against_schema(document, doc_type.name())?;

        for (path, event) in collect_events(document) {
            let event_type = EventType::resolve(event)
                .map_err(|found| ValidationError::UnknownEventType { found })?;
            let event_violations = self
                .schemas
                .validate_against_schema(event, event_type.name())?;
            violations.extend(event_violations.into_iter().map(|mut v| {
                v.path = format!("{}{}", path, v.path);
                v
            }));
        }

        violations.extend(validate_extensions(
            document,
            &self.field_sets,
            doc_type.name(),
        )?);

        Ok(ValidationReport { violations })
    }

    /// Assert-mode validation: same traversal as [`validate`], but content
    /// violations are thrown as one aggregate instead of returned.
    ///
    /// # Errors
    ///
    /// `ValidateError::Invalid` carrying the full ordered violation list,
    /// or `ValidateError::Lookup` for the fatal resolution failures.
    ///
    /// [`validate`]: DocumentValidator::validate
    pub fn assert_valid(&self, document: &Value) -> Result<(), ValidateError> {
        let report = self.validate(document)?;
        if report.success() {
            Ok(())
        } else {
            Err(ValidateError::Invalid {
                violations: report.violations,
            })
        }
    }
}

/// Pull the events out of a document body, singular or plural form, with
/// their JSON paths. An empty singular `event` object is the zero-event
/// serialization and yields nothing.
fn collect_events(document: &Value) -> Vec<(String, &Value)> {
    let mut events = Vec::new();
    let Some(body) = document.get("epcisBody") else {
        return events;
    };

    if let Some(event) = body.get("event") {
        let is_empty = event.as_object().map(Map::is_empty).unwrap_or(false);
        if !is_empty {
            events.push(("/epcisBody/event".to_string(), event));
        }
    }
    if let Some(Value::Array(items)) = body.get("eventList") {
        for (i, item) in items.iter().enumerate() {
            events.push((format!("/epcisBody/eventList/{}", i), item));
        }
    }
    events
}
