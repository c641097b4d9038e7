//! Quirk builder.
//!
//! The builder is an explicit accumulator: every declaration consumes the
//! builder and returns it (or a validation error), and `freeze` consumes it
//! for good, producing the immutable [`DeviceDescriptor`]. There is no way
//! back from a frozen descriptor to an accepting builder.
//!
//! All validation happens eagerly at the declaration that violates a rule,
//! so a failed build always names the offending declaration.

use super::descriptor::{DeviceDescriptor, EndpointBinding, EndpointOverride};
use super::entities::{
    ButtonDecl, EntityBinding, EntityKind, NumberDecl, SensorDecl, SwitchDecl,
};
use crate::error::{QuirkError, Result};
use crate::zigbee::device_types::DeviceTypeId;
use crate::zigbee::schema::SchemaRegistry;
use crate::zigbee::types::{AttributeDef, AttributeRef, ZclType};

/// Accumulates endpoint and entity declarations for one device class.
#[derive(Debug)]
pub struct QuirkBuilder {
    manufacturer: &'static str,
    model: &'static str,
    registry: SchemaRegistry,
    overrides: Vec<EndpointOverride>,
    bindings: Vec<EndpointBinding>,
    entities: Vec<EntityBinding>,
}

impl QuirkBuilder {
    /// Start a quirk for the device identified by manufacturer and model.
    pub fn new(manufacturer: &'static str, model: &'static str, registry: SchemaRegistry) -> Self {
        Self {
            manufacturer,
            model,
            registry,
            overrides: Vec::new(),
            bindings: Vec::new(),
            entities: Vec::new(),
        }
    }

    /// Reclassify a physical endpoint's advertised device type.
    ///
    /// Must be declared before any cluster is bound to that endpoint, so the
    /// override is in place when inbound frames for the endpoint are
    /// evaluated.
    pub fn replace_endpoint(mut self, endpoint_id: u8, device_type: DeviceTypeId) -> Result<Self> {
        if self.bindings.iter().any(|b| b.endpoint_id == endpoint_id) {
            return Err(QuirkError::LateEndpointOverride { endpoint_id });
        }
        if self.overrides.iter().any(|o| o.endpoint_id == endpoint_id) {
            return Err(QuirkError::DuplicateEndpointOverride { endpoint_id });
        }
        self.overrides.push(EndpointOverride {
            endpoint_id,
            device_type,
        });
        Ok(self)
    }

    /// Replace a standard cluster on an endpoint with a registered schema,
    /// so inbound and outbound frames for it are decoded through the
    /// extended attribute set.
    pub fn replace_cluster(mut self, endpoint_id: u8, cluster_id: u16) -> Result<Self> {
        if self.registry.get(cluster_id).is_none() {
            return Err(QuirkError::UnknownSchema {
                endpoint_id,
                cluster_id,
            });
        }
        if self
            .bindings
            .iter()
            .any(|b| b.endpoint_id == endpoint_id && b.cluster_id == cluster_id)
        {
            return Err(QuirkError::BindingConflict {
                endpoint_id,
                cluster_id,
            });
        }
        self.bindings.push(EndpointBinding {
            endpoint_id,
            cluster_id,
        });
        Ok(self)
    }

    /// Expose an attribute as a read-only sensor entity.
    pub fn sensor(mut self, decl: SensorDecl) -> Result<Self> {
        let def = *self.resolve(decl.attribute)?;
        self.check_unique(decl.unique_key, decl.attribute)?;
        if let Some(reporting) = &decl.reporting {
            reporting.validate(decl.unique_key)?;
        }
        self.entities.push(EntityBinding {
            unique_key: decl.unique_key,
            kind: EntityKind::Sensor,
            attribute: decl.attribute,
            zcl_type: def.zcl_type,
            access: def.access,
            translation_key: decl.translation_key,
            fallback_name: decl.fallback_name,
            unit: decl.unit,
            sensor_class: decl.device_class,
            number_class: None,
            state_class: decl.state_class,
            min_value: None,
            max_value: None,
            step: None,
            reporting: decl.reporting,
        });
        Ok(self)
    }

    /// Expose a read-write attribute as a bounded numeric control.
    pub fn number(mut self, decl: NumberDecl) -> Result<Self> {
        let def = *self.resolve(decl.attribute)?;
        self.check_unique(decl.unique_key, decl.attribute)?;
        if !def.access.is_writable() {
            return Err(QuirkError::AccessMismatch {
                unique_key: decl.unique_key.to_string(),
                reference: decl.attribute,
            });
        }
        check_bounds(&decl, def.zcl_type)?;
        self.entities.push(EntityBinding {
            unique_key: decl.unique_key,
            kind: EntityKind::Number,
            attribute: decl.attribute,
            zcl_type: def.zcl_type,
            access: def.access,
            translation_key: decl.translation_key,
            fallback_name: decl.fallback_name,
            unit: decl.unit,
            sensor_class: None,
            number_class: decl.device_class,
            state_class: None,
            min_value: Some(decl.min_value),
            max_value: Some(decl.max_value),
            step: decl.step,
            reporting: None,
        });
        Ok(self)
    }

    /// Expose a read-write boolean attribute as a switch.
    pub fn switch(mut self, decl: SwitchDecl) -> Result<Self> {
        let def = *self.resolve(decl.attribute)?;
        self.check_unique(decl.unique_key, decl.attribute)?;
        if !def.access.is_writable() {
            return Err(QuirkError::AccessMismatch {
                unique_key: decl.unique_key.to_string(),
                reference: decl.attribute,
            });
        }
        if def.zcl_type != ZclType::Bool {
            return Err(QuirkError::Validation {
                unique_key: decl.unique_key.to_string(),
                message: format!(
                    "switch entities require a Bool attribute, found {:?}",
                    def.zcl_type
                ),
            });
        }
        self.entities.push(EntityBinding {
            unique_key: decl.unique_key,
            kind: EntityKind::Switch,
            attribute: decl.attribute,
            zcl_type: def.zcl_type,
            access: def.access,
            translation_key: decl.translation_key,
            fallback_name: decl.fallback_name,
            unit: None,
            sensor_class: None,
            number_class: None,
            state_class: None,
            min_value: None,
            max_value: None,
            step: None,
            reporting: None,
        });
        Ok(self)
    }

    /// Expose an attribute as a momentary command button.
    pub fn button(mut self, decl: ButtonDecl) -> Result<Self> {
        let def = *self.resolve(decl.attribute)?;
        self.check_unique(decl.unique_key, decl.attribute)?;
        self.entities.push(EntityBinding {
            unique_key: decl.unique_key,
            kind: EntityKind::Button,
            attribute: decl.attribute,
            zcl_type: def.zcl_type,
            access: def.access,
            translation_key: decl.translation_key,
            fallback_name: decl.fallback_name,
            unit: None,
            sensor_class: None,
            number_class: None,
            state_class: None,
            min_value: None,
            max_value: None,
            step: None,
            reporting: None,
        });
        Ok(self)
    }

    /// Finalize the accumulated declarations into an immutable descriptor.
    ///
    /// Consuming `self` is the state transition: a frozen descriptor cannot
    /// accept further declarations.
    pub fn freeze(self) -> DeviceDescriptor {
        log::info!(
            "Froze quirk for {} / {}: {} endpoint binding(s), {} entity binding(s)",
            self.manufacturer,
            self.model,
            self.bindings.len(),
            self.entities.len()
        );
        DeviceDescriptor::new(
            self.manufacturer,
            self.model,
            self.registry,
            self.overrides,
            self.bindings,
            self.entities,
        )
    }

    /// Resolve an attribute reference against the endpoint table and the
    /// bound schema's merged attribute view.
    fn resolve(&self, reference: AttributeRef) -> Result<&AttributeDef> {
        if !self
            .bindings
            .iter()
            .any(|b| b.endpoint_id == reference.endpoint_id && b.cluster_id == reference.cluster_id)
        {
            return Err(QuirkError::UnboundCluster { reference });
        }
        // A binding can only exist for a registered schema
        let schema = self
            .registry
            .get(reference.cluster_id)
            .ok_or(QuirkError::UnknownSchema {
                endpoint_id: reference.endpoint_id,
                cluster_id: reference.cluster_id,
            })?;
        schema
            .attribute(reference.attr_id)
            .ok_or(QuirkError::UnknownAttribute { reference })
    }

    /// Duplicate detection in declaration order: the second occurrence of a
    /// key fails, naming both declarations.
    fn check_unique(&self, unique_key: &str, attribute: AttributeRef) -> Result<()> {
        if let Some(prev) = self.entities.iter().find(|e| e.unique_key == unique_key) {
            return Err(QuirkError::DuplicateUniqueKey {
                unique_key: unique_key.to_string(),
                first: prev.attribute,
                second: attribute,
            });
        }
        Ok(())
    }
}

/// Number bounds must be ordered, lie within the wire type's representable
/// range, and use a step the wire type can resolve.
fn check_bounds(decl: &NumberDecl, zcl_type: ZclType) -> Result<()> {
    let validation = |message: String| QuirkError::Validation {
        unique_key: decl.unique_key.to_string(),
        message,
    };

    let (lo, hi) = zcl_type.numeric_range().ok_or_else(|| {
        validation(format!(
            "number entities require a numeric attribute, found {zcl_type:?}"
        ))
    })?;
    if decl.min_value > decl.max_value {
        return Err(validation(format!(
            "min_value {} exceeds max_value {}",
            decl.min_value, decl.max_value
        )));
    }
    if decl.min_value < lo || decl.max_value > hi {
        return Err(validation(format!(
            "bounds [{}, {}] exceed the {:?} range [{}, {}]",
            decl.min_value, decl.max_value, zcl_type, lo, hi
        )));
    }
    if let Some(step) = decl.step {
        if !zcl_type.accepts_step(step) {
            return Err(validation(format!(
                "step {step} is not representable by a {zcl_type:?} attribute"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quirk::entities::ReportingPolicy;
    use crate::zigbee::catalog;
    use crate::zigbee::device_types::DEV_TYPE_SIMPLE_SENSOR;
    use crate::zigbee::schema::ClusterSchema;
    use crate::zigbee::types::Access;

    const PM_CLUSTER: u16 = 0x042A;
    const ATTR_PM1: u16 = 0x00C8;
    const ATTR_READING_INTERVAL: u16 = 0x0201;
    const ATTR_ENABLE: u16 = 0x0220;

    fn pm_registry() -> SchemaRegistry {
        let mut registry = SchemaRegistry::new();
        registry
            .register(
                ClusterSchema::extend(
                    &catalog::PM25_MEASUREMENT,
                    vec![
                        AttributeDef::new(ATTR_PM1, "pm1", ZclType::Single, Access::ReadOnly),
                        AttributeDef::new(
                            ATTR_READING_INTERVAL,
                            "reading_interval",
                            ZclType::U16,
                            Access::ReadWrite,
                        ),
                        AttributeDef::new(ATTR_ENABLE, "enable_pm25", ZclType::Bool, Access::ReadWrite),
                    ],
                )
                .unwrap(),
            )
            .unwrap();
        registry
    }

    fn pm_builder() -> QuirkBuilder {
        QuirkBuilder::new("Test Vendor", "Test Device", pm_registry())
            .replace_endpoint(1, DEV_TYPE_SIMPLE_SENSOR)
            .unwrap()
            .replace_cluster(1, PM_CLUSTER)
            .unwrap()
    }

    fn pm1_sensor() -> SensorDecl {
        SensorDecl {
            unique_key: "pm1",
            attribute: AttributeRef::new(1, PM_CLUSTER, ATTR_PM1),
            translation_key: "pm1",
            fallback_name: "PM1",
            unit: None,
            device_class: None,
            state_class: None,
            reporting: Some(ReportingPolicy::new(10, 120, 1.0)),
        }
    }

    fn interval_number() -> NumberDecl {
        NumberDecl {
            unique_key: "reading_interval",
            attribute: AttributeRef::new(1, PM_CLUSTER, ATTR_READING_INTERVAL),
            translation_key: "reading_interval",
            fallback_name: "Reading Interval",
            unit: None,
            device_class: None,
            min_value: 1.0,
            max_value: 300.0,
            step: None,
        }
    }

    #[test]
    fn test_sensor_plus_number_build() {
        // PM1 sensor with reporting, reading interval as a policy-free number
        let descriptor = pm_builder()
            .sensor(pm1_sensor())
            .unwrap()
            .number(interval_number())
            .unwrap()
            .freeze();

        let pm1 = descriptor.entity("pm1").unwrap();
        assert_eq!(pm1.kind, EntityKind::Sensor);
        assert_eq!(pm1.zcl_type, ZclType::Single);
        assert_eq!(pm1.reporting, Some(ReportingPolicy::new(10, 120, 1.0)));

        let interval = descriptor.entity("reading_interval").unwrap();
        assert_eq!(interval.kind, EntityKind::Number);
        assert_eq!(interval.min_value, Some(1.0));
        assert_eq!(interval.max_value, Some(300.0));
        assert!(interval.reporting.is_none());
    }

    #[test]
    fn test_switch_on_read_only_attribute_is_rejected() {
        let err = pm_builder()
            .switch(SwitchDecl {
                unique_key: "bad_switch",
                // pm1 is read-only
                attribute: AttributeRef::new(1, PM_CLUSTER, ATTR_PM1),
                translation_key: "bad_switch",
                fallback_name: "Bad Switch",
            })
            .unwrap_err();

        match err {
            QuirkError::AccessMismatch {
                unique_key,
                reference,
            } => {
                assert_eq!(unique_key, "bad_switch");
                assert_eq!(reference.attr_id, ATTR_PM1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_switch_requires_bool_attribute() {
        let err = pm_builder()
            .switch(SwitchDecl {
                unique_key: "bad_switch",
                attribute: AttributeRef::new(1, PM_CLUSTER, ATTR_READING_INTERVAL),
                translation_key: "bad_switch",
                fallback_name: "Bad Switch",
            })
            .unwrap_err();
        assert!(err.to_string().contains("Bool"));
    }

    #[test]
    fn test_duplicate_endpoint_cluster_binding_is_rejected() {
        let err = pm_builder().replace_cluster(1, PM_CLUSTER).unwrap_err();
        match err {
            QuirkError::BindingConflict {
                endpoint_id,
                cluster_id,
            } => {
                assert_eq!(endpoint_id, 1);
                assert_eq!(cluster_id, PM_CLUSTER);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_binding_unregistered_schema_is_rejected() {
        let err = pm_builder().replace_cluster(1, 0x0402).unwrap_err();
        assert!(matches!(err, QuirkError::UnknownSchema { .. }));
    }

    #[test]
    fn test_override_after_binding_is_rejected() {
        let err = pm_builder()
            .replace_endpoint(1, DEV_TYPE_SIMPLE_SENSOR)
            .unwrap_err();
        assert!(matches!(
            err,
            QuirkError::DuplicateEndpointOverride { endpoint_id: 1 }
        ));

        // a fresh endpoint with a binding first
        let err = QuirkBuilder::new("Test Vendor", "Test Device", pm_registry())
            .replace_cluster(2, PM_CLUSTER)
            .unwrap()
            .replace_endpoint(2, DEV_TYPE_SIMPLE_SENSOR)
            .unwrap_err();
        assert!(matches!(
            err,
            QuirkError::LateEndpointOverride { endpoint_id: 2 }
        ));
    }

    #[test]
    fn test_duplicate_unique_key_names_both_declarations() {
        let err = pm_builder()
            .sensor(pm1_sensor())
            .unwrap()
            .number(NumberDecl {
                unique_key: "pm1",
                ..interval_number()
            })
            .unwrap_err();

        match err {
            QuirkError::DuplicateUniqueKey {
                unique_key,
                first,
                second,
            } => {
                assert_eq!(unique_key, "pm1");
                assert_eq!(first.attr_id, ATTR_PM1);
                assert_eq!(second.attr_id, ATTR_READING_INTERVAL);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unknown_attribute_reference_is_rejected() {
        let err = pm_builder()
            .sensor(SensorDecl {
                attribute: AttributeRef::new(1, PM_CLUSTER, 0x7777),
                ..pm1_sensor()
            })
            .unwrap_err();
        assert!(matches!(err, QuirkError::UnknownAttribute { .. }));
    }

    #[test]
    fn test_unbound_cluster_reference_is_rejected() {
        // cluster registered but not bound to endpoint 2
        let err = pm_builder()
            .sensor(SensorDecl {
                attribute: AttributeRef::new(2, PM_CLUSTER, ATTR_PM1),
                ..pm1_sensor()
            })
            .unwrap_err();
        assert!(matches!(err, QuirkError::UnboundCluster { .. }));
    }

    #[test]
    fn test_inverted_bounds_are_rejected() {
        let err = pm_builder()
            .number(NumberDecl {
                min_value: 300.0,
                max_value: 1.0,
                ..interval_number()
            })
            .unwrap_err();
        assert!(err.to_string().contains("exceeds max_value"));
    }

    #[test]
    fn test_bounds_outside_wire_range_are_rejected() {
        let err = pm_builder()
            .number(NumberDecl {
                min_value: 0.0,
                max_value: 100_000.0,
                ..interval_number()
            })
            .unwrap_err();
        assert!(err.to_string().contains("range"));
    }

    #[test]
    fn test_fractional_step_on_integer_attribute_is_rejected() {
        let err = pm_builder()
            .number(NumberDecl {
                step: Some(0.1),
                ..interval_number()
            })
            .unwrap_err();
        assert!(err.to_string().contains("step 0.1"));
    }

    #[test]
    fn test_invalid_reporting_policy_is_rejected() {
        let err = pm_builder()
            .sensor(SensorDecl {
                reporting: Some(ReportingPolicy::new(120, 10, 1.0)),
                ..pm1_sensor()
            })
            .unwrap_err();
        assert!(matches!(err, QuirkError::Validation { .. }));
    }

    #[test]
    fn test_build_is_deterministic() {
        let build = || {
            pm_builder()
                .sensor(pm1_sensor())
                .unwrap()
                .number(interval_number())
                .unwrap()
                .freeze()
        };
        assert_eq!(build(), build());
    }
}
