//! The polymorphic event model.
//!
//! EPCIS events form a discriminated union of five concrete shapes. Rather
//! than a class hierarchy, [`Event`] is a tagged sum type: the discriminator
//! is resolved once, at decode time, through an explicit lookup
//! ([`EventType::resolve`]), and each variant carries its own field table.
//! Shared fields live in [`EventBase`] by composition.

use serde_json::{Map, Value};

use crate::decode::{
    emit, emit_entity_list, emit_string, emit_string_list, into_map, take_entity,
    take_entity_list, take_string, take_string_list, take_value,
};
use crate::error::DecodeError;
use crate::types::EventType;
use crate::values::{
    BizLocation, BizTransactionElement, DestinationElement, ErrorDeclaration,
    PersistentDisposition, QuantityElement, ReadPoint, SensorElement, SourceElement,
};

fn list_push<T>(slot: &mut Option<Vec<T>>, item: T) {
    slot.get_or_insert_with(Vec::new).push(item);
}

/// Drop the first structurally-equal element. A no-op when absent.
fn list_drop_first<T: PartialEq>(slot: &mut Option<Vec<T>>, item: &T) {
    if let Some(items) = slot {
        if let Some(pos) = items.iter().position(|x| x == item) {
            items.remove(pos);
        }
    }
}

/// Generates `add` / `add_all` / `remove` / `remove_all` / `clear` accessors
/// for an `Option<Vec<String>>` identifier-list field. `clear` deletes the
/// field entirely rather than leaving an empty list.
macro_rules! string_list_accessors {
    ($field:ident, $add:ident, $add_all:ident, $remove:ident, $remove_all:ident, $clear:ident) => {
        pub fn $add(&mut self, item: impl Into<String>) -> &mut Self {
            list_push(&mut self.$field, item.into());
            self
        }

        pub fn $add_all<I, S>(&mut self, items: I) -> &mut Self
        where
            I: IntoIterator<Item = S>,
            S: Into<String>,
        {
            for item in items {
                list_push(&mut self.$field, item.into());
            }
            self
        }

        pub fn $remove(&mut self, item: &str) -> &mut Self {
            if let Some(items) = &mut self.$field {
                if let Some(pos) = items.iter().position(|x| x == item) {
                    items.remove(pos);
                }
            }
            self
        }

        pub fn $remove_all(&mut self, items: &[&str]) -> &mut Self {
            for item in items {
                self.$remove(item);
            }
            self
        }

        pub fn $clear(&mut self) -> &mut Self {
            self.$field = None;
            self
        }
    };
}

/// Same accessor family for lists of sub-entities.
macro_rules! entity_list_accessors {
    ($field:ident: $t:ty, $add:ident, $add_all:ident, $remove:ident, $remove_all:ident, $clear:ident) => {
        pub fn $add(&mut self, item: $t) -> &mut Self {
            list_push(&mut self.$field, item);
            self
        }

        pub fn $add_all(&mut self, items: impl IntoIterator<Item = $t>) -> &mut Self {
            for item in items {
                list_push(&mut self.$field, item);
            }
            self
        }

        pub fn $remove(&mut self, item: &$t) -> &mut Self {
            list_drop_first(&mut self.$field, item);
            self
        }

        pub fn $remove_all(&mut self, items: &[$t]) -> &mut Self {
            for item in items {
                list_drop_first(&mut self.$field, item);
            }
            self
        }

        pub fn $clear(&mut self) -> &mut Self {
            self.$field = None;
            self
        }
    };
}

/// Fields shared by every event variant.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EventBase {
    pub event_id: Option<String>,
    pub event_time: Option<String>,
    pub event_time_zone_offset: Option<String>,
    pub record_time: Option<String>,
    /// Variant-dependent action code. Unused by transformation events.
    pub action: Option<String>,
    pub biz_step: Option<String>,
    pub disposition: Option<String>,
    pub read_point: Option<ReadPoint>,
    pub biz_location: Option<BizLocation>,
    pub biz_transaction_list: Option<Vec<BizTransactionElement>>,
    pub source_list: Option<Vec<SourceElement>>,
    pub destination_list: Option<Vec<DestinationElement>>,
    pub sensor_element_list: Option<Vec<SensorElement>>,
    pub persistent_disposition: Option<PersistentDisposition>,
    pub error_declaration: Option<ErrorDeclaration>,
    /// Unrecognized fields, preserved verbatim in insertion order.
    pub extensions: Map<String, Value>,
}

impl EventBase {
    pub fn set_event_id(&mut self, id: impl Into<String>) -> &mut Self {
        self.event_id = Some(id.into());
        self
    }

    pub fn set_event_time(&mut self, time: impl Into<String>) -> &mut Self {
        self.event_time = Some(time.into());
        self
    }

    pub fn set_event_time_zone_offset(&mut self, offset: impl Into<String>) -> &mut Self {
        self.event_time_zone_offset = Some(offset.into());
        self
    }

    pub fn set_record_time(&mut self, time: impl Into<String>) -> &mut Self {
        self.record_time = Some(time.into());
        self
    }

    pub fn set_action(&mut self, action: impl Into<String>) -> &mut Self {
        self.action = Some(action.into());
        self
    }

    pub fn set_biz_step(&mut self, biz_step: impl Into<String>) -> &mut Self {
        self.biz_step = Some(biz_step.into());
        self
    }

    pub fn set_disposition(&mut self, disposition: impl Into<String>) -> &mut Self {
        self.disposition = Some(disposition.into());
        self
    }

    /// Accepts either a plain identifier or a full [`ReadPoint`].
    pub fn set_read_point(&mut self, read_point: impl Into<ReadPoint>) -> &mut Self {
        self.read_point = Some(read_point.into());
        self
    }

    /// Accepts either a plain identifier or a full [`BizLocation`].
    pub fn set_biz_location(&mut self, biz_location: impl Into<BizLocation>) -> &mut Self {
        self.biz_location = Some(biz_location.into());
        self
    }

    pub fn set_persistent_disposition(&mut self, pd: PersistentDisposition) -> &mut Self {
        self.persistent_disposition = Some(pd);
        self
    }

    pub fn set_error_declaration(&mut self, decl: ErrorDeclaration) -> &mut Self {
        self.error_declaration = Some(decl);
        self
    }

    /// Attach an extension field. The key should be namespace-qualified
    /// (`prefix:localName`) with the prefix declared in the document's
    /// `@context`; the engine validates that, not this setter.
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

    entity_list_accessors!(
        biz_transaction_list: BizTransactionElement,
        add_biz_transaction,
        add_biz_transactions,
        remove_biz_transaction,
        remove_biz_transactions,
        clear_biz_transaction_list
    );

    entity_list_accessors!(
        source_list: SourceElement,
        add_source,
        add_sources,
        remove_source,
        remove_sources,
        clear_source_list
    );

    entity_list_accessors!(
        destination_list: DestinationElement,
        add_destination,
        add_destinations,
        remove_destination,
        remove_destinations,
        clear_destination_list
    );

    entity_list_accessors!(
        sensor_element_list: SensorElement,
        add_sensor_element,
        add_sensor_elements,
        remove_sensor_element,
        remove_sensor_elements,
        clear_sensor_element_list
    );

    /// Pop every common field (except `action`, which only some variants
    /// carry) out of a raw event map.
    fn decode_common(map: &mut Map<String, Value>, path: &str) -> Result<Self, DecodeError> {
        Ok(EventBase {
            event_id: take_string(map, "eventID", path)?,
            event_time: take_string(map, "eventTime", path)?,
            event_time_zone_offset: take_string(map, "eventTimeZoneOffset", path)?,
            record_time: take_string(map, "recordTime", path)?,
            action: None,
            biz_step: take_string(map, "bizStep", path)?,
            disposition: take_string(map, "disposition", path)?,
            read_point: take_entity(map, "readPoint", path, ReadPoint::decode)?,
            biz_location: take_entity(map, "bizLocation", path, BizLocation::decode)?,
            biz_transaction_list: take_entity_list(
                map,
                "bizTransactionList",
                path,
                BizTransactionElement::decode,
            )?,
            source_list: take_entity_list(map, "sourceList", path, SourceElement::decode)?,
            destination_list: take_entity_list(
                map,
                "destinationList",
                path,
                DestinationElement::decode,
            )?,
            sensor_element_list: take_entity_list(
                map,
                "sensorElementList",
                path,
                SensorElement::decode,
            )?,
            persistent_disposition: take_entity(
                map,
                "persistentDisposition",
                path,
                PersistentDisposition::decode,
            )?,
            error_declaration: take_entity(
                map,
                "errorDeclaration",
                path,
                ErrorDeclaration::decode,
            )?,
            extensions: Map::new(),
        })
    }

    /// Identification and timing fields, emitted right after `type`.
    fn emit_leading(&self, map: &mut Map<String, Value>) {
        emit_string(map, "eventID", &self.event_id);
        emit_string(map, "eventTime", &self.event_time);
        emit_string(map, "eventTimeZoneOffset", &self.event_time_zone_offset);
        emit_string(map, "recordTime", &self.record_time);
    }

    /// Business context fields, emitted after the variant-specific ones.
    fn emit_trailing(&self, map: &mut Map<String, Value>) {
        emit_string(map, "bizStep", &self.biz_step);
        emit_string(map, "disposition", &self.disposition);
        emit(map, "readPoint", self.read_point.as_ref().map(ReadPoint::to_value));
        emit(
            map,
            "bizLocation",
            self.biz_location.as_ref().map(BizLocation::to_value),
        );
        emit_entity_list(
            map,
            "bizTransactionList",
            &self.biz_transaction_list,
            BizTransactionElement::to_value,
        );
        emit_entity_list(map, "sourceList", &self.source_list, SourceElement::to_value);
        emit_entity_list(
            map,
            "destinationList",
            &self.destination_list,
            DestinationElement::to_value,
        );
        emit_entity_list(
            map,
            "sensorElementList",
            &self.sensor_element_list,
            SensorElement::to_value,
        );
        emit(
            map,
            "persistentDisposition",
            self.persistent_disposition
                .as_ref()
                .map(PersistentDisposition::to_value),
        );
        emit(
            map,
            "errorDeclaration",
            self.error_declaration.as_ref().map(ErrorDeclaration::to_value),
        );
    }
}

/// An event about one or more physical or digital objects.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObjectEvent {
    pub base: EventBase,
    pub epc_list: Option<Vec<String>>,
    pub quantity_list: Option<Vec<QuantityElement>>,
    /// Instance/lot master data; its contents are vendor extensions and
    /// every key inside must be namespace-qualified.
    pub ilmd: Option<Value>,
}

impl ObjectEvent {
    pub fn new() -> Self {
        Self::default()
    }

    string_list_accessors!(epc_list, add_epc, add_epcs, remove_epc, remove_epcs, clear_epc_list);

    entity_list_accessors!(
        quantity_list: QuantityElement,
        add_quantity,
        add_quantities,
        remove_quantity,
        remove_quantities,
        clear_quantity_list
    );

    pub(crate) fn decode(value: Value, path: &str) -> Result<Self, DecodeError> {
        let mut map = into_map(value, path)?;
        strip_discriminator(&mut map);
        let mut base = EventBase::decode_common(&mut map, path)?;
        base.action = take_string(&mut map, "action", path)?;
        let epc_list = take_string_list(&mut map, "epcList", path)?;
        let quantity_list = take_entity_list(&mut map, "quantityList", path, QuantityElement::decode)?;
        let ilmd = take_value(&mut map, "ilmd");
        base.extensions = map;
        Ok(ObjectEvent {
            base,
            epc_list,
            quantity_list,
            ilmd,
        })
    }

    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        map.insert("type".into(), Value::String("ObjectEvent".into()));
        self.base.emit_leading(&mut map);
        emit_string(&mut map, "action", &self.base.action);
        emit_string_list(&mut map, "epcList", &self.epc_list);
        emit_entity_list(
            &mut map,
            "quantityList",
            &self.quantity_list,
            QuantityElement::to_value,
        );
        emit(&mut map, "ilmd", self.ilmd.clone());
        self.base.emit_trailing(&mut map);
        map.extend(self.base.extensions.clone());
        Value::Object(map)
    }
}

/// An event about objects physically aggregated to a parent.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AggregationEvent {
    pub base: EventBase,
    pub parent_id: Option<String>,
    pub child_epcs: Option<Vec<String>>,
    pub child_quantity_list: Option<Vec<QuantityElement>>,
}

impl AggregationEvent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_parent_id(&mut self, id: impl Into<String>) -> &mut Self {
        self.parent_id = Some(id.into());
        self
    }

    string_list_accessors!(
        child_epcs,
        add_child_epc,
        add_child_epcs,
        remove_child_epc,
        remove_child_epcs,
        clear_child_epcs
    );

    entity_list_accessors!(
        child_quantity_list: QuantityElement,
        add_child_quantity,
        add_child_quantities,
        remove_child_quantity,
        remove_child_quantities,
        clear_child_quantity_list
    );

    pub(crate) fn decode(value: Value, path: &str) -> Result<Self, DecodeError> {
        let mut map = into_map(value, path)?;
        strip_discriminator(&mut map);
        let mut base = EventBase::decode_common(&mut map, path)?;
        base.action = take_string(&mut map, "action", path)?;
        let parent_id = take_string(&mut map, "parentID", path)?;
        let child_epcs = take_string_list(&mut map, "childEPCs", path)?;
        let child_quantity_list =
            take_entity_list(&mut map, "childQuantityList", path, QuantityElement::decode)?;
        base.extensions = map;
        Ok(AggregationEvent {
            base,
            parent_id,
            child_epcs,
            child_quantity_list,
        })
    }

    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        map.insert("type".into(), Value::String("AggregationEvent".into()));
        self.base.emit_leading(&mut map);
        emit_string(&mut map, "action", &self.base.action);
        emit_string(&mut map, "parentID", &self.parent_id);
        emit_string_list(&mut map, "childEPCs", &self.child_epcs);
        emit_entity_list(
            &mut map,
            "childQuantityList",
            &self.child_quantity_list,
            QuantityElement::to_value,
        );
        self.base.emit_trailing(&mut map);
        map.extend(self.base.extensions.clone());
        Value::Object(map)
    }
}

/// An event tying objects to one or more business transactions.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TransactionEvent {
    pub base: EventBase,
    pub parent_id: Option<String>,
    pub epc_list: Option<Vec<String>>,
    pub quantity_list: Option<Vec<QuantityElement>>,
}

impl TransactionEvent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_parent_id(&mut self, id: impl Into<String>) -> &mut Self {
        self.parent_id = Some(id.into());
        self
    }

    string_list_accessors!(epc_list, add_epc, add_epcs, remove_epc, remove_epcs, clear_epc_list);

    entity_list_accessors!(
        quantity_list: QuantityElement,
        add_quantity,
        add_quantities,
        remove_quantity,
        remove_quantities,
        clear_quantity_list
    );

    pub(crate) fn decode(value: Value, path: &str) -> Result<Self, DecodeError> {
        let mut map = into_map(value, path)?;
        strip_discriminator(&mut map);
        let mut base = EventBase::decode_common(&mut map, path)?;
        base.action = take_string(&mut map, "action", path)?;
        let parent_id = take_string(&mut map, "parentID", path)?;
        let epc_list = take_string_list(&mut map, "epcList", path)?;
        let quantity_list = take_entity_list(&mut map, "quantityList", path, QuantityElement::decode)?;
        base.extensions = map;
        Ok(TransactionEvent {
            base,
            parent_id,
            epc_list,
            quantity_list,
        })
    }

    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        map.insert("type".into(), Value::String("TransactionEvent".into()));
        self.base.emit_leading(&mut map);
        emit_string(&mut map, "action", &self.base.action);
        emit_string(&mut map, "parentID", &self.parent_id);
        emit_string_list(&mut map, "epcList", &self.epc_list);
        emit_entity_list(
            &mut map,
            "quantityList",
            &self.quantity_list,
            QuantityElement::to_value,
        );
        self.base.emit_trailing(&mut map);
        map.extend(self.base.extensions.clone());
        Value::Object(map)
    }
}

/// An event consuming inputs and producing outputs. Carries no `action`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TransformationEvent {
    pub base: EventBase,
    pub input_epc_list: Option<Vec<String>>,
    pub input_quantity_list: Option<Vec<QuantityElement>>,
    pub output_epc_list: Option<Vec<String>>,
    pub output_quantity_list: Option<Vec<QuantityElement>>,
    pub transformation_id: Option<String>,
    pub ilmd: Option<Value>,
}

impl TransformationEvent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_transformation_id(&mut self, id: impl Into<String>) -> &mut Self {
        self.transformation_id = Some(id.into());
        self
    }

    string_list_accessors!(
        input_epc_list,
        add_input_epc,
        add_input_epcs,
        remove_input_epc,
        remove_input_epcs,
        clear_input_epc_list
    );

    string_list_accessors!(
        output_epc_list,
        add_output_epc,
        add_output_epcs,
        remove_output_epc,
        remove_output_epcs,
        clear_output_epc_list
    );

    entity_list_accessors!(
        input_quantity_list: QuantityElement,
        add_input_quantity,
        add_input_quantities,
        remove_input_quantity,
        remove_input_quantities,
        clear_input_quantity_list
    );

    entity_list_accessors!(
        output_quantity_list: QuantityElement,
        add_output_quantity,
        add_output_quantities,
        remove_output_quantity,
        remove_output_quantities,
        clear_output_quantity_list
    );

    pub(crate) fn decode(value: Value, path: &str) -> Result<Self, DecodeError> {
        let mut map = into_map(value, path)?;
        strip_discriminator(&mut map);
        let mut base = EventBase::decode_common(&mut map, path)?;
        let input_epc_list = take_string_list(&mut map, "inputEPCList", path)?;
        let input_quantity_list =
            take_entity_list(&mut map, "inputQuantityList", path, QuantityElement::decode)?;
        let output_epc_list = take_string_list(&mut map, "outputEPCList", path)?;
        let output_quantity_list =
            take_entity_list(&mut map, "outputQuantityList", path, QuantityElement::decode)?;
        let transformation_id = take_string(&mut map, "transformationID", path)?;
        let ilmd = take_value(&mut map, "ilmd");
        base.extensions = map;
        Ok(TransformationEvent {
            base,
            input_epc_list,
            input_quantity_list,
            output_epc_list,
            output_quantity_list,
            transformation_id,
            ilmd,
        })
    }

    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        map.insert("type".into(), Value::String("TransformationEvent".into()));
        self.base.emit_leading(&mut map);
        emit_string_list(&mut map, "inputEPCList", &self.input_epc_list);
        emit_entity_list(
            &mut map,
            "inputQuantityList",
            &self.input_quantity_list,
            QuantityElement::to_value,
        );
        emit_string_list(&mut map, "outputEPCList", &self.output_epc_list);
        emit_entity_list(
            &mut map,
            "outputQuantityList",
            &self.output_quantity_list,
            QuantityElement::to_value,
        );
        emit_string(&mut map, "transformationID", &self.transformation_id);
        emit(&mut map, "ilmd", self.ilmd.clone());
        self.base.emit_trailing(&mut map);
        map.extend(self.base.extensions.clone());
        Value::Object(map)
    }
}

/// An event about objects associated with (not aggregated to) a parent,
/// e.g. a sensor mounted on a reusable asset.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AssociationEvent {
    pub base: EventBase,
    pub parent_id: Option<String>,
    pub child_epcs: Option<Vec<String>>,
    pub child_quantity_list: Option<Vec<QuantityElement>>,
}

impl AssociationEvent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_parent_id(&mut self, id: impl Into<String>) -> &mut Self {
        self.parent_id = Some(id.into());
        self
    }

    string_list_accessors!(
        child_epcs,
        add_child_epc,
        add_child_epcs,
        remove_child_epc,
        remove_child_epcs,
        clear_child_epcs
    );

    entity_list_accessors!(
        child_quantity_list: QuantityElement,
        add_child_quantity,
        add_child_quantities,
        remove_child_quantity,
        remove_child_quantities,
        clear_child_quantity_list
    );

    pub(crate) fn decode(value: Value, path: &str) -> Result<Self, DecodeError> {
        let mut map = into_map(value, path)?;
        strip_discriminator(&mut map);
        let mut base = EventBase::decode_common(&mut map, path)?;
        base.action = take_string(&mut map, "action", path)?;
        let parent_id = take_string(&mut map, "parentID", path)?;
        let child_epcs = take_string_list(&mut map, "childEPCs", path)?;
        let child_quantity_list =
            take_entity_list(&mut map, "childQuantityList", path, QuantityElement::decode)?;
        base.extensions = map;
        Ok(AssociationEvent {
            base,
            parent_id,
            child_epcs,
            child_quantity_list,
        })
    }

    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        map.insert("type".into(), Value::String("AssociationEvent".into()));
        self.base.emit_leading(&mut map);
        emit_string(&mut map, "action", &self.base.action);
        emit_string(&mut map, "parentID", &self.parent_id);
        emit_string_list(&mut map, "childEPCs", &self.child_epcs);
        emit_entity_list(
            &mut map,
            "childQuantityList",
            &self.child_quantity_list,
            QuantityElement::to_value,
        );
        self.base.emit_trailing(&mut map);
        map.extend(self.base.extensions.clone());
        Value::Object(map)
    }
}

/// The discriminator is consumed by dispatch; it is regenerated from the
/// variant tag on serialization.
fn strip_discriminator(map: &mut Map<String, Value>) {
    map.shift_remove("type");
    map.shift_remove("isA");
}

/// Any of the five concrete EPCIS event shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Object(ObjectEvent),
    Aggregation(AggregationEvent),
    Transaction(TransactionEvent),
    Transformation(TransformationEvent),
    Association(AssociationEvent),
}

impl Event {
    pub fn event_type(&self) -> EventType {
        match self {
            Event::Object(_) => EventType::Object,
            Event::Aggregation(_) => EventType::Aggregation,
            Event::Transaction(_) => EventType::Transaction,
            Event::Transformation(_) => EventType::Transformation,
            Event::Association(_) => EventType::Association,
        }
    }

    /// Reconstruct a typed event from a raw value.
    ///
    /// # Errors
    ///
    /// `DecodeError::UnknownEventType` when the `type`/`isA` discriminator
    /// matches none of the five known variants; `DecodeError::InvalidField`
    /// when a structurally-known field cannot form its sub-entity.
    pub fn from_value(value: Value) -> Result<Self, DecodeError> {
        Self::decode(value, "")
    }

    pub(crate) fn decode(value: Value, path: &str) -> Result<Self, DecodeError> {
        let event_type = EventType::resolve(&value)
            .map_err(|found| DecodeError::UnknownEventType { found })?;
        match event_type {
            EventType::Object => ObjectEvent::decode(value, path).map(Event::Object),
            EventType::Aggregation => AggregationEvent::decode(value, path).map(Event::Aggregation),
            EventType::Transaction => TransactionEvent::decode(value, path).map(Event::Transaction),
            EventType::Transformation => {
                TransformationEvent::decode(value, path).map(Event::Transformation)
            }
            EventType::Association => AssociationEvent::decode(value, path).map(Event::Association),
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            Event::Object(e) => e.to_value(),
            Event::Aggregation(e) => e.to_value(),
            Event::Transaction(e) => e.to_value(),
            Event::Transformation(e) => e.to_value(),
            Event::Association(e) => e.to_value(),
        }
    }

    pub fn base(&self) -> &EventBase {
        match self {
            Event::Object(e) => &e.base,
            Event::Aggregation(e) => &e.base,
            Event::Transaction(e) => &e.base,
            Event::Transformation(e) => &e.base,
            Event::Association(e) => &e.base,
        }
    }

    pub fn base_mut(&mut self) -> &mut EventBase {
        match self {
            Event::Object(e) => &mut e.base,
            Event::Aggregation(e) => &mut e.base,
            Event::Transaction(e) => &mut e.base,
            Event::Transformation(e) => &mut e.base,
            Event::Association(e) => &mut e.base,
        }
    }
}

impl From<ObjectEvent> for Event {
    fn from(e: ObjectEvent) -> Self {
        Event::Object(e)
    }
}

impl From<AggregationEvent> for Event {
    fn from(e: AggregationEvent) -> Self {
        Event::Aggregation(e)
    }
}

impl From<TransactionEvent> for Event {
    fn from(e: TransactionEvent) -> Self {
        Event::Transaction(e)
    }
}

impl From<TransformationEvent> for Event {
    fn from(e: TransformationEvent) -> Self {
        Event::Transformation(e)
    }
}

impl From<AssociationEvent> for Event {
    fn from(e: AssociationEvent) -> Self {
        Event::Association(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object_event_value() -> Value {
        json!({
            "type": "ObjectEvent",
            "eventTime": "2021-04-20T11:00:30.000+02:00",
            "eventTimeZoneOffset": "+02:00",
            "action": "OBSERVE",
            "epcList": ["urn:epc:id:sgtin:0614141.107346.2017"],
            "bizStep": "shipping",
            "disposition": "in_transit",
            "readPoint": { "id": "urn:epc:id:sgln:0614141.07346.1234" },
            "bizTransactionList": [
                { "type": "po", "bizTransaction": "http://transaction.acme.com/po/12345678" }
            ]
        })
    }

    #[test]
    fn dispatch_by_type() {
        let event = Event::from_value(object_event_value()).unwrap();
        assert_eq!(event.event_type(), EventType::Object);
        assert!(matches!(event, Event::Object(_)));
    }

    #[test]
    fn dispatch_by_legacy_isa() {
        let event = Event::from_value(json!({
            "isA": "AggregationEvent",
            "eventTime": "2021-04-20T11:00:30.000+02:00",
            "eventTimeZoneOffset": "+02:00",
            "action": "ADD",
            "parentID": "urn:epc:id:sscc:0614141.1234567890"
        }))
        .unwrap();
        assert!(matches!(event, Event::Aggregation(_)));
    }

    #[test]
    fn unknown_discriminator_fails() {
        let err = Event::from_value(json!({ "type": "InventoryEvent" })).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::UnknownEventType { ref found } if found == "InventoryEvent"
        ));
    }

    #[test]
    fn missing_discriminator_fails() {
        let err = Event::from_value(json!({ "foo": "bar" })).unwrap_err();
        assert!(matches!(err, DecodeError::UnknownEventType { .. }));
    }

    #[test]
    fn round_trip_preserves_all_fields() {
        let raw = object_event_value();
        let event = Event::from_value(raw.clone()).unwrap();
        assert_eq!(event.to_value(), raw);
    }

    #[test]
    fn round_trip_preserves_extensions() {
        let mut raw = object_event_value();
        raw["example:myField"] = json!({ "example:nested": "value" });
        let event = Event::from_value(raw.clone()).unwrap();
        assert_eq!(event.base().get_extension("example:myField"), raw.get("example:myField"));
        assert_eq!(event.to_value(), raw);
    }

    #[test]
    fn transformation_event_round_trip() {
        let raw = json!({
            "type": "TransformationEvent",
            "eventTime": "2013-10-31T14:58:56.591Z",
            "eventTimeZoneOffset": "+02:00",
            "inputEPCList": ["urn:epc:id:sgtin:4012345.011122.25"],
            "outputQuantityList": [
                { "epcClass": "urn:epc:class:lgtin:4012345.011111.4444", "quantity": 10.0 }
            ],
            "transformationID": "urn:epc:id:gdti:0614141.12345.400"
        });
        let event = Event::from_value(raw.clone()).unwrap();
        assert_eq!(event.to_value(), raw);
    }

    #[test]
    fn builder_chains() {
        let mut event = ObjectEvent::new();
        event
            .add_epc("urn:epc:id:sgtin:0614141.107346.2017")
            .add_epc("urn:epc:id:sgtin:0614141.107346.2018");
        event
            .base
            .set_event_time("2021-04-20T11:00:30.000+02:00")
            .set_event_time_zone_offset("+02:00")
            .set_action("OBSERVE")
            .set_read_point("urn:epc:id:sgln:0614141.07346.1234");

        let value = event.to_value();
        assert_eq!(value["type"], "ObjectEvent");
        assert_eq!(value["epcList"].as_array().unwrap().len(), 2);
        assert_eq!(
            value["readPoint"],
            json!({ "id": "urn:epc:id:sgln:0614141.07346.1234" })
        );
    }

    #[test]
    fn remove_drops_first_equal_element_only() {
        let mut event = ObjectEvent::new();
        event.add_epcs(["a", "b", "a"]);
        event.remove_epc("a");
        assert_eq!(event.epc_list.as_deref(), Some(&["b".to_string(), "a".to_string()][..]));
    }

    #[test]
    fn remove_missing_element_is_a_noop() {
        let mut event = ObjectEvent::new();
        event.add_epc("a");
        event.remove_epc("zzz");
        assert_eq!(event.epc_list.as_deref(), Some(&["a".to_string()][..]));
    }

    #[test]
    fn clear_deletes_the_field_entirely() {
        let mut event = ObjectEvent::new();
        event.add_epc("a");
        event.clear_epc_list();
        assert!(event.epc_list.is_none());
        assert!(event.to_value().get("epcList").is_none());
    }

    #[test]
    fn transformation_keeps_unqualified_action_as_extension() {
        // action is not in the transformation field table, so it rides
        // through as an unrecognized field.
        let raw = json!({
            "type": "TransformationEvent",
            "eventTime": "2013-10-31T14:58:56.591Z",
            "eventTimeZoneOffset": "+02:00",
            "action": "ADD"
        });
        let event = Event::from_value(raw.clone()).unwrap();
        assert_eq!(event.base().get_extension("action"), Some(&json!("ADD")));
        assert_eq!(event.to_value(), raw);
    }
}
