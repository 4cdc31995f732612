//! Leaf value objects owned by events: locations, transactions, quantities,
//! sensor data, and error declarations.
//!
//! Every entity follows the same lifecycle: construct empty (or via `new`)
//! and populate fields directly, or reconstruct from a raw JSON value with
//! `from_value`. Keys the entity's field table doesn't recognize are carried
//! verbatim in `extensions` and merged back on `to_value`, never interpreted.

use serde_json::{Map, Value};

use crate::decode::{
    emit, emit_bool, emit_entity_list, emit_number, emit_string, emit_string_list, into_map,
    take_bool, take_entity, take_entity_list, take_number, take_string, take_string_list,
};
use crate::error::DecodeError;

/// The location where an event was observed, e.g. a read gate.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReadPoint {
    pub id: Option<String>,
    pub extensions: Map<String, Value>,
}

impl ReadPoint {
    pub fn new(id: impl Into<String>) -> Self {
        ReadPoint {
            id: Some(id.into()),
            ..Default::default()
        }
    }

    pub fn from_value(value: Value) -> Result<Self, DecodeError> {
        Self::decode(value, "")
    }

    pub(crate) fn decode(value: Value, path: &str) -> Result<Self, DecodeError> {
        let mut map = into_map(value, path)?;
        Ok(ReadPoint {
            id: take_string(&mut map, "id", path)?,
            extensions: map,
        })
    }

    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        emit_string(&mut map, "id", &self.id);
        map.extend(self.extensions.clone());
        Value::Object(map)
    }
}

impl From<&str> for ReadPoint {
    fn from(id: &str) -> Self {
        ReadPoint::new(id)
    }
}

impl From<String> for ReadPoint {
    fn from(id: String) -> Self {
        ReadPoint::new(id)
    }
}

/// The business location where objects are assumed to be after an event.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BizLocation {
    pub id: Option<String>,
    pub extensions: Map<String, Value>,
}

impl BizLocation {
    pub fn new(id: impl Into<String>) -> Self {
        BizLocation {
            id: Some(id.into()),
            ..Default::default()
        }
    }

    pub fn from_value(value: Value) -> Result<Self, DecodeError> {
        Self::decode(value, "")
    }

    pub(crate) fn decode(value: Value, path: &str) -> Result<Self, DecodeError> {
        let mut map = into_map(value, path)?;
        Ok(BizLocation {
            id: take_string(&mut map, "id", path)?,
            extensions: map,
        })
    }

    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        emit_string(&mut map, "id", &self.id);
        map.extend(self.extensions.clone());
        Value::Object(map)
    }
}

impl From<&str> for BizLocation {
    fn from(id: &str) -> Self {
        BizLocation::new(id)
    }
}

impl From<String> for BizLocation {
    fn from(id: String) -> Self {
        BizLocation::new(id)
    }
}

/// A business transaction reference (`type` + transaction identifier).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BizTransactionElement {
    pub transaction_type: Option<String>,
    pub biz_transaction: Option<String>,
    pub extensions: Map<String, Value>,
}

impl BizTransactionElement {
    pub fn new(transaction_type: impl Into<String>, biz_transaction: impl Into<String>) -> Self {
        BizTransactionElement {
            transaction_type: Some(transaction_type.into()),
            biz_transaction: Some(biz_transaction.into()),
            ..Default::default()
        }
    }

    pub fn from_value(value: Value) -> Result<Self, DecodeError> {
        Self::decode(value, "")
    }

    pub(crate) fn decode(value: Value, path: &str) -> Result<Self, DecodeError> {
        let mut map = into_map(value, path)?;
        Ok(BizTransactionElement {
            transaction_type: take_string(&mut map, "type", path)?,
            biz_transaction: take_string(&mut map, "bizTransaction", path)?,
            extensions: map,
        })
    }

    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        emit_string(&mut map, "type", &self.transaction_type);
        emit_string(&mut map, "bizTransaction", &self.biz_transaction);
        map.extend(self.extensions.clone());
        Value::Object(map)
    }
}

/// A source in a transfer of ownership or custody.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SourceElement {
    pub source_type: Option<String>,
    pub source: Option<String>,
    pub extensions: Map<String, Value>,
}

impl SourceElement {
    pub fn new(source_type: impl Into<String>, source: impl Into<String>) -> Self {
        SourceElement {
            source_type: Some(source_type.into()),
            source: Some(source.into()),
            ..Default::default()
        }
    }

    pub fn from_value(value: Value) -> Result<Self, DecodeError> {
        Self::decode(value, "")
    }

    pub(crate) fn decode(value: Value, path: &str) -> Result<Self, DecodeError> {
        let mut map = into_map(value, path)?;
        Ok(SourceElement {
            source_type: take_string(&mut map, "type", path)?,
            source: take_string(&mut map, "source", path)?,
            extensions: map,
        })
    }

    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        emit_string(&mut map, "type", &self.source_type);
        emit_string(&mut map, "source", &self.source);
        map.extend(self.extensions.clone());
        Value::Object(map)
    }
}

/// A destination in a transfer of ownership or custody.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DestinationElement {
    pub destination_type: Option<String>,
    pub destination: Option<String>,
    pub extensions: Map<String, Value>,
}

impl DestinationElement {
    pub fn new(destination_type: impl Into<String>, destination: impl Into<String>) -> Self {
        DestinationElement {
            destination_type: Some(destination_type.into()),
            destination: Some(destination.into()),
            ..Default::default()
        }
    }

    pub fn from_value(value: Value) -> Result<Self, DecodeError> {
        Self::decode(value, "")
    }

    pub(crate) fn decode(value: Value, path: &str) -> Result<Self, DecodeError> {
        let mut map = into_map(value, path)?;
        Ok(DestinationElement {
            destination_type: take_string(&mut map, "type", path)?,
            destination: take_string(&mut map, "destination", path)?,
            extensions: map,
        })
    }

    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        emit_string(&mut map, "type", &self.destination_type);
        emit_string(&mut map, "destination", &self.destination);
        map.extend(self.extensions.clone());
        Value::Object(map)
    }
}

/// A quantity of a class-level identifier, e.g. 200 units of a GTIN.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QuantityElement {
    pub epc_class: Option<String>,
    pub quantity: Option<f64>,
    pub uom: Option<String>,
    pub extensions: Map<String, Value>,
}

impl QuantityElement {
    pub fn new(epc_class: impl Into<String>, quantity: f64) -> Self {
        QuantityElement {
            epc_class: Some(epc_class.into()),
            quantity: Some(quantity),
            ..Default::default()
        }
    }

    /// Set the unit of measure (UN/CEFACT common code).
    pub fn uom(mut self, uom: impl Into<String>) -> Self {
        self.uom = Some(uom.into());
        self
    }

    pub fn from_value(value: Value) -> Result<Self, DecodeError> {
        Self::decode(value, "")
    }

    pub(crate) fn decode(value: Value, path: &str) -> Result<Self, DecodeError> {
        let mut map = into_map(value, path)?;
        Ok(QuantityElement {
            epc_class: take_string(&mut map, "epcClass", path)?,
            quantity: take_number(&mut map, "quantity", path)?,
            uom: take_string(&mut map, "uom", path)?,
            extensions: map,
        })
    }

    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        emit_string(&mut map, "epcClass", &self.epc_class);
        emit_number(&mut map, "quantity", &self.quantity);
        emit_string(&mut map, "uom", &self.uom);
        map.extend(self.extensions.clone());
        Value::Object(map)
    }
}

/// Dispositions that persist beyond the event that set them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PersistentDisposition {
    pub set: Option<Vec<String>>,
    pub unset: Option<Vec<String>>,
    pub extensions: Map<String, Value>,
}

impl PersistentDisposition {
    pub fn from_value(value: Value) -> Result<Self, DecodeError> {
        Self::decode(value, "")
    }

    pub(crate) fn decode(value: Value, path: &str) -> Result<Self, DecodeError> {
        let mut map = into_map(value, path)?;
        Ok(PersistentDisposition {
            set: take_string_list(&mut map, "set", path)?,
            unset: take_string_list(&mut map, "unset", path)?,
            extensions: map,
        })
    }

    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        emit_string_list(&mut map, "set", &self.set);
        emit_string_list(&mut map, "unset", &self.unset);
        map.extend(self.extensions.clone());
        Value::Object(map)
    }
}

/// Declaration that a previously captured event was erroneous.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ErrorDeclaration {
    pub declaration_time: Option<String>,
    pub reason: Option<String>,
    pub corrective_event_ids: Option<Vec<String>>,
    pub extensions: Map<String, Value>,
}

impl ErrorDeclaration {
    pub fn from_value(value: Value) -> Result<Self, DecodeError> {
        Self::decode(value, "")
    }

    pub(crate) fn decode(value: Value, path: &str) -> Result<Self, DecodeError> {
        let mut map = into_map(value, path)?;
        Ok(ErrorDeclaration {
            declaration_time: take_string(&mut map, "declarationTime", path)?,
            reason: take_string(&mut map, "reason", path)?,
            corrective_event_ids: take_string_list(&mut map, "correctiveEventIDs", path)?,
            extensions: map,
        })
    }

    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        emit_string(&mut map, "declarationTime", &self.declaration_time);
        emit_string(&mut map, "reason", &self.reason);
        emit_string_list(&mut map, "correctiveEventIDs", &self.corrective_event_ids);
        map.extend(self.extensions.clone());
        Value::Object(map)
    }
}

/// Metadata shared by all reports of one sensor element.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SensorMetadata {
    pub time: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub device_id: Option<String>,
    pub device_metadata: Option<String>,
    pub raw_data: Option<String>,
    pub data_processing_method: Option<String>,
    pub biz_rules: Option<String>,
    pub extensions: Map<String, Value>,
}

impl SensorMetadata {
    pub fn from_value(value: Value) -> Result<Self, DecodeError> {
        Self::decode(value, "")
    }

    pub(crate) fn decode(value: Value, path: &str) -> Result<Self, DecodeError> {
        let mut map = into_map(value, path)?;
        Ok(SensorMetadata {
            time: take_string(&mut map, "time", path)?,
            start_time: take_string(&mut map, "startTime", path)?,
            end_time: take_string(&mut map, "endTime", path)?,
            device_id: take_string(&mut map, "deviceID", path)?,
            device_metadata: take_string(&mut map, "deviceMetadata", path)?,
            raw_data: take_string(&mut map, "rawData", path)?,
            data_processing_method: take_string(&mut map, "dataProcessingMethod", path)?,
            biz_rules: take_string(&mut map, "bizRules", path)?,
            extensions: map,
        })
    }

    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        emit_string(&mut map, "time", &self.time);
        emit_string(&mut map, "startTime", &self.start_time);
        emit_string(&mut map, "endTime", &self.end_time);
        emit_string(&mut map, "deviceID", &self.device_id);
        emit_string(&mut map, "deviceMetadata", &self.device_metadata);
        emit_string(&mut map, "rawData", &self.raw_data);
        emit_string(&mut map, "dataProcessingMethod", &self.data_processing_method);
        emit_string(&mut map, "bizRules", &self.biz_rules);
        map.extend(self.extensions.clone());
        Value::Object(map)
    }
}

/// A single sensor measurement or observation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SensorReportElement {
    pub report_type: Option<String>,
    pub exception: Option<String>,
    pub device_id: Option<String>,
    pub device_metadata: Option<String>,
    pub raw_data: Option<String>,
    pub data_processing_method: Option<String>,
    pub time: Option<String>,
    pub microorganism: Option<String>,
    pub chemical_substance: Option<String>,
    pub value: Option<f64>,
    pub component: Option<String>,
    pub string_value: Option<String>,
    pub boolean_value: Option<bool>,
    pub hex_binary_value: Option<String>,
    pub uri_value: Option<String>,
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
    pub mean_value: Option<f64>,
    pub s_dev: Option<f64>,
    pub perc_rank: Option<f64>,
    pub perc_value: Option<f64>,
    pub uom: Option<String>,
    pub coordinate_reference_system: Option<String>,
    pub extensions: Map<String, Value>,
}

impl SensorReportElement {
    pub fn from_value(value: Value) -> Result<Self, DecodeError> {
        Self::decode(value, "")
    }

    pub(crate) fn decode(value: Value, path: &str) -> Result<Self, DecodeError> {
        let mut map = into_map(value, path)?;
        Ok(SensorReportElement {
            report_type: take_string(&mut map, "type", path)?,
            exception: take_string(&mut map, "exception", path)?,
            device_id: take_string(&mut map, "deviceID", path)?,
            device_metadata: take_string(&mut map, "deviceMetadata", path)?,
            raw_data: take_string(&mut map, "rawData", path)?,
            data_processing_method: take_string(&mut map, "dataProcessingMethod", path)?,
            time: take_string(&mut map, "time", path)?,
            microorganism: take_string(&mut map, "microorganism", path)?,
            chemical_substance: take_string(&mut map, "chemicalSubstance", path)?,
            value: take_number(&mut map, "value", path)?,
            component: take_string(&mut map, "component", path)?,
            string_value: take_string(&mut map, "stringValue", path)?,
            boolean_value: take_bool(&mut map, "booleanValue", path)?,
            hex_binary_value: take_string(&mut map, "hexBinaryValue", path)?,
            uri_value: take_string(&mut map, "uriValue", path)?,
            min_value: take_number(&mut map, "minValue", path)?,
            max_value: take_number(&mut map, "maxValue", path)?,
            mean_value: take_number(&mut map, "meanValue", path)?,
            s_dev: take_number(&mut map, "sDev", path)?,
            perc_rank: take_number(&mut map, "percRank", path)?,
            perc_value: take_number(&mut map, "percValue", path)?,
            uom: take_string(&mut map, "uom", path)?,
            coordinate_reference_system: take_string(&mut map, "coordinateReferenceSystem", path)?,
            extensions: map,
        })
    }

    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        emit_string(&mut map, "type", &self.report_type);
        emit_string(&mut map, "exception", &self.exception);
        emit_string(&mut map, "deviceID", &self.device_id);
        emit_string(&mut map, "deviceMetadata", &self.device_metadata);
        emit_string(&mut map, "rawData", &self.raw_data);
        emit_string(&mut map, "dataProcessingMethod", &self.data_processing_method);
        emit_string(&mut map, "time", &self.time);
        emit_string(&mut map, "microorganism", &self.microorganism);
        emit_string(&mut map, "chemicalSubstance", &self.chemical_substance);
        emit_number(&mut map, "value", &self.value);
        emit_string(&mut map, "component", &self.component);
        emit_string(&mut map, "stringValue", &self.string_value);
        emit_bool(&mut map, "booleanValue", &self.boolean_value);
        emit_string(&mut map, "hexBinaryValue", &self.hex_binary_value);
        emit_string(&mut map, "uriValue", &self.uri_value);
        emit_number(&mut map, "minValue", &self.min_value);
        emit_number(&mut map, "maxValue", &self.max_value);
        emit_number(&mut map, "meanValue", &self.mean_value);
        emit_number(&mut map, "sDev", &self.s_dev);
        emit_number(&mut map, "percRank", &self.perc_rank);
        emit_number(&mut map, "percValue", &self.perc_value);
        emit_string(&mut map, "uom", &self.uom);
        emit_string(
            &mut map,
            "coordinateReferenceSystem",
            &self.coordinate_reference_system,
        );
        map.extend(self.extensions.clone());
        Value::Object(map)
    }
}

/// Sensor data attached to an event: shared metadata plus a report list.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SensorElement {
    pub sensor_metadata: Option<SensorMetadata>,
    pub sensor_report: Option<Vec<SensorReportElement>>,
    pub extensions: Map<String, Value>,
}

impl SensorElement {
    pub fn from_value(value: Value) -> Result<Self, DecodeError> {
        Self::decode(value, "")
    }

    pub(crate) fn decode(value: Value, path: &str) -> Result<Self, DecodeError> {
        let mut map = into_map(value, path)?;
        Ok(SensorElement {
            sensor_metadata: take_entity(&mut map, "sensorMetadata", path, SensorMetadata::decode)?,
            sensor_report: take_entity_list(
                &mut map,
                "sensorReport",
                path,
                SensorReportElement::decode,
            )?,
            extensions: map,
        })
    }

    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        emit(
            &mut map,
            "sensorMetadata",
            self.sensor_metadata.as_ref().map(SensorMetadata::to_value),
        );
        emit_entity_list(
            &mut map,
            "sensorReport",
            &self.sensor_report,
            SensorReportElement::to_value,
        );
        map.extend(self.extensions.clone());
        Value::Object(map)
    }
}

/// Opaque document header. Owned exclusively by a document; carries no
/// invariants beyond round-trip fidelity.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Header {
    pub fields: Map<String, Value>,
}

impl Header {
    pub fn from_value(value: Value) -> Result<Self, DecodeError> {
        Self::decode(value, "")
    }

    pub(crate) fn decode(value: Value, path: &str) -> Result<Self, DecodeError> {
        Ok(Header {
            fields: into_map(value, path)?,
        })
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.fields.clone())
    }
}
