//! EfektaLab air-quality monitor (rebuilt IKEA VINDRIKTNING enclosure).
//!
//! A two-endpoint air-quality sensor: endpoint 1 carries identification,
//! particulate matter, CO2 and the VOC index; endpoint 2 carries
//! temperature and humidity. The firmware adds vendor attributes to the
//! standard measurement clusters for raw readings, calibration commands
//! and offset corrections - this module describes all of them and maps
//! each onto a platform entity.

use crate::error::Result;
use crate::quirk::builder::QuirkBuilder;
use crate::quirk::descriptor::DeviceDescriptor;
use crate::quirk::entities::{
    ButtonDecl, NumberDecl, NumberDeviceClass, ReportingPolicy, SensorDecl, SensorDeviceClass,
    StateClass, SwitchDecl, Unit,
};
use crate::zigbee::catalog;
use crate::zigbee::device_types::DEV_TYPE_SIMPLE_SENSOR;
use crate::zigbee::schema::{ClusterSchema, SchemaRegistry};
use crate::zigbee::types::{Access, AttributeDef, AttributeRef, ZclType};

pub const MANUFACTURER: &str = "EfektaLab for you";
pub const MODEL: &str = "IKEA_VINDRIKTNING_EFEKTA III";

// Vendor attributes on the PM2.5 measurement cluster
const ATTR_PM1: u16 = 0x00C8;
const ATTR_PM10: u16 = 0x00C9;
const ATTR_READING_INTERVAL: u16 = 0x0201;
const ATTR_ENABLE_PM25: u16 = 0x0220;
const ATTR_HIGH_PM25: u16 = 0x0221;
const ATTR_LOW_PM25: u16 = 0x0222;
const ATTR_INVERT_LOGIC_PM25: u16 = 0x0225;

// Vendor attributes on the CO2 concentration cluster
const ATTR_FORCED_RECALIBRATION: u16 = 0x0202;
const ATTR_SET_ALTITUDE: u16 = 0x0205;
const ATTR_FACTORY_RESET_CO2: u16 = 0x0206;
const ATTR_AUTOMATIC_SCAL: u16 = 0x0402;

// Signed offset corrections, shared id on both measurement clusters
const ATTR_TEMPERATURE_OFFSET: u16 = 0x0210;
const ATTR_HUMIDITY_OFFSET: u16 = 0x0210;

// Vendor attribute on the repurposed AnalogInput (VOC index) cluster
const ATTR_VOC_RAW_DATA: u16 = 0x0065;

/// Default reporting for the autonomous sensors: at least every two
/// minutes, at most every ten seconds, on any unit change.
const SENSOR_REPORTING: ReportingPolicy = ReportingPolicy::new(10, 120, 1.0);

/// Build the vendor schemas for this device class.
fn schemas() -> Result<SchemaRegistry> {
    let mut registry = SchemaRegistry::new();

    // Basic is rebound without extensions, identification only
    registry.register(ClusterSchema::extend(&catalog::BASIC, vec![])?)?;

    // AnalogInput repurposed as a VOC index cluster
    registry.register(ClusterSchema::extend(
        &catalog::ANALOG_INPUT,
        vec![
            AttributeDef::new(ATTR_VOC_RAW_DATA, "voc_raw_data", ZclType::Single, Access::ReadOnly)
                .mandatory(),
        ],
    )?)?;

    registry.register(ClusterSchema::extend(
        &catalog::PM25_MEASUREMENT,
        vec![
            AttributeDef::new(ATTR_PM1, "pm1", ZclType::Single, Access::ReadOnly),
            AttributeDef::new(ATTR_PM10, "pm10", ZclType::Single, Access::ReadOnly),
            AttributeDef::new(
                ATTR_READING_INTERVAL,
                "reading_interval",
                ZclType::U16,
                Access::ReadWrite,
            ),
            AttributeDef::new(ATTR_ENABLE_PM25, "enable_pm25", ZclType::Bool, Access::ReadWrite),
            AttributeDef::new(ATTR_HIGH_PM25, "high_pm25", ZclType::U16, Access::ReadWrite),
            AttributeDef::new(ATTR_LOW_PM25, "low_pm25", ZclType::U16, Access::ReadWrite),
            AttributeDef::new(
                ATTR_INVERT_LOGIC_PM25,
                "invert_logic_pm25",
                ZclType::Bool,
                Access::ReadWrite,
            ),
        ],
    )?)?;

    registry.register(ClusterSchema::extend(
        &catalog::CO2_CONCENTRATION,
        vec![
            AttributeDef::new(
                ATTR_FORCED_RECALIBRATION,
                "forced_recalibration",
                ZclType::Bool,
                Access::ReadWrite,
            ),
            AttributeDef::new(ATTR_AUTOMATIC_SCAL, "automatic_scal", ZclType::Bool, Access::ReadWrite),
            AttributeDef::new(
                ATTR_FACTORY_RESET_CO2,
                "factory_reset_co2",
                ZclType::Bool,
                Access::ReadWrite,
            ),
            AttributeDef::new(ATTR_SET_ALTITUDE, "set_altitude", ZclType::U16, Access::ReadWrite),
        ],
    )?)?;

    registry.register(ClusterSchema::extend(
        &catalog::TEMPERATURE_MEASUREMENT,
        vec![AttributeDef::new(
            ATTR_TEMPERATURE_OFFSET,
            "temperature_offset",
            ZclType::I16,
            Access::ReadWrite,
        )],
    )?)?;

    registry.register(ClusterSchema::extend(
        &catalog::RELATIVE_HUMIDITY,
        vec![AttributeDef::new(
            ATTR_HUMIDITY_OFFSET,
            "humidity_offset",
            ZclType::I16,
            Access::ReadWrite,
        )],
    )?)?;

    Ok(registry)
}

/// Build the complete device descriptor for this device class.
pub fn device_descriptor() -> Result<DeviceDescriptor> {
    let pm = catalog::PM25_MEASUREMENT.cluster_id;
    let co2 = catalog::CO2_CONCENTRATION.cluster_id;
    let temp = catalog::TEMPERATURE_MEASUREMENT.cluster_id;
    let humidity = catalog::RELATIVE_HUMIDITY.cluster_id;
    let voc = catalog::ANALOG_INPUT.cluster_id;

    let descriptor = QuirkBuilder::new(MANUFACTURER, MODEL, schemas()?)
        .replace_endpoint(1, DEV_TYPE_SIMPLE_SENSOR)?
        .replace_endpoint(2, DEV_TYPE_SIMPLE_SENSOR)?
        .replace_cluster(1, catalog::BASIC.cluster_id)?
        .replace_cluster(1, voc)?
        .replace_cluster(1, pm)?
        .replace_cluster(1, co2)?
        .replace_cluster(2, temp)?
        .replace_cluster(2, humidity)?
        .sensor(SensorDecl {
            unique_key: "pm1",
            attribute: AttributeRef::new(1, pm, ATTR_PM1),
            translation_key: "pm1",
            fallback_name: "PM1",
            unit: Some(Unit::MicrogramsPerCubicMeter),
            device_class: Some(SensorDeviceClass::Pm1),
            state_class: Some(StateClass::Measurement),
            reporting: Some(SENSOR_REPORTING),
        })?
        .sensor(SensorDecl {
            unique_key: "pm10",
            attribute: AttributeRef::new(1, pm, ATTR_PM10),
            translation_key: "pm10",
            fallback_name: "PM10",
            unit: Some(Unit::MicrogramsPerCubicMeter),
            device_class: Some(SensorDeviceClass::Pm10),
            state_class: Some(StateClass::Measurement),
            reporting: Some(SENSOR_REPORTING),
        })?
        .number(NumberDecl {
            unique_key: "reading_interval",
            attribute: AttributeRef::new(1, pm, ATTR_READING_INTERVAL),
            translation_key: "reading_interval",
            fallback_name: "Reading Interval",
            unit: Some(Unit::Seconds),
            device_class: Some(NumberDeviceClass::Duration),
            min_value: 1.0,
            max_value: 300.0,
            step: None,
        })?
        .switch(SwitchDecl {
            unique_key: "enable_pm25",
            attribute: AttributeRef::new(1, pm, ATTR_ENABLE_PM25),
            translation_key: "enable_pm25",
            fallback_name: "Enable PM2.5 Control",
        })?
        .switch(SwitchDecl {
            unique_key: "invert_logic_pm25",
            attribute: AttributeRef::new(1, pm, ATTR_INVERT_LOGIC_PM25),
            translation_key: "invert_logic_pm25",
            fallback_name: "Enable invert logic PM2.5 Control",
        })?
        .number(NumberDecl {
            unique_key: "low_pm25",
            attribute: AttributeRef::new(1, pm, ATTR_LOW_PM25),
            translation_key: "low_pm25",
            fallback_name: "Low PM2.5 Border",
            unit: Some(Unit::MicrogramsPerCubicMeter),
            device_class: Some(NumberDeviceClass::Pm25),
            min_value: 0.0,
            max_value: 1000.0,
            step: None,
        })?
        .number(NumberDecl {
            unique_key: "high_pm25",
            attribute: AttributeRef::new(1, pm, ATTR_HIGH_PM25),
            translation_key: "high_pm25",
            fallback_name: "High PM2.5 Border",
            unit: Some(Unit::MicrogramsPerCubicMeter),
            device_class: Some(NumberDeviceClass::Pm25),
            min_value: 0.0,
            max_value: 1000.0,
            step: None,
        })?
        .button(ButtonDecl {
            unique_key: "factory_reset_co2",
            attribute: AttributeRef::new(1, co2, ATTR_FACTORY_RESET_CO2),
            translation_key: "factory_reset_co2",
            fallback_name: "Factory Reset CO2 sensor",
        })?
        .button(ButtonDecl {
            unique_key: "forced_recalibration_co2",
            attribute: AttributeRef::new(1, co2, ATTR_FORCED_RECALIBRATION),
            translation_key: "forced_recalibration_co2",
            fallback_name: "Start FRC (Perform Forced Recalibration of the CO2 Sensor)",
        })?
        .button(ButtonDecl {
            unique_key: "automatic_scal_co2",
            attribute: AttributeRef::new(1, co2, ATTR_AUTOMATIC_SCAL),
            translation_key: "automatic_scal_co2",
            fallback_name: "Automatic self calibration CO2",
        })?
        .number(NumberDecl {
            unique_key: "set_altitude_co2",
            attribute: AttributeRef::new(1, co2, ATTR_SET_ALTITUDE),
            translation_key: "set_altitude_co2",
            fallback_name: "Set altitude for CO2",
            unit: Some(Unit::Meters),
            device_class: Some(NumberDeviceClass::Distance),
            min_value: 0.0,
            max_value: 3000.0,
            step: None,
        })?
        .number(NumberDecl {
            unique_key: "temperature_offset",
            attribute: AttributeRef::new(2, temp, ATTR_TEMPERATURE_OFFSET),
            translation_key: "temperature_offset",
            fallback_name: "Temperature offset",
            unit: Some(Unit::Celsius),
            device_class: Some(NumberDeviceClass::Temperature),
            min_value: -50.0,
            max_value: 50.0,
            // the offset attribute is a signed integer, so the control
            // steps in whole degrees
            step: Some(1.0),
        })?
        .number(NumberDecl {
            unique_key: "humidity_offset",
            attribute: AttributeRef::new(2, humidity, ATTR_HUMIDITY_OFFSET),
            translation_key: "humidity_offset",
            fallback_name: "Humidity offset",
            unit: Some(Unit::Percent),
            device_class: Some(NumberDeviceClass::Humidity),
            min_value: -50.0,
            max_value: 50.0,
            step: Some(1.0),
        })?
        .sensor(SensorDecl {
            unique_key: "voc_index",
            // the computed index lives in the standard present_value slot
            attribute: AttributeRef::new(1, voc, catalog::ANALOG_INPUT_PRESENT_VALUE),
            translation_key: "voc_index",
            fallback_name: "VOC index",
            unit: None,
            device_class: Some(SensorDeviceClass::Aqi),
            state_class: Some(StateClass::Measurement),
            reporting: Some(SENSOR_REPORTING),
        })?
        .sensor(SensorDecl {
            unique_key: "voc_raw_data",
            attribute: AttributeRef::new(1, voc, ATTR_VOC_RAW_DATA),
            translation_key: "voc_raw_data",
            fallback_name: "VOC RAW data",
            unit: None,
            device_class: None,
            state_class: Some(StateClass::Measurement),
            reporting: Some(SENSOR_REPORTING),
        })?
        .freeze();

    Ok(descriptor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quirk::entities::EntityKind;

    #[test]
    fn test_descriptor_builds() {
        let descriptor = device_descriptor().unwrap();
        assert_eq!(descriptor.manufacturer(), MANUFACTURER);
        assert_eq!(descriptor.model(), MODEL);
        assert_eq!(descriptor.endpoint_overrides().len(), 2);
        assert_eq!(descriptor.endpoint_bindings().len(), 6);
        assert_eq!(descriptor.entities().len(), 15);
    }

    #[test]
    fn test_endpoint_layout() {
        let descriptor = device_descriptor().unwrap();
        let on = |endpoint_id: u8| {
            descriptor
                .endpoint_bindings()
                .iter()
                .filter(move |b| b.endpoint_id == endpoint_id)
                .count()
        };
        // identification, VOC, PM, CO2
        assert_eq!(on(1), 4);
        // temperature, humidity
        assert_eq!(on(2), 2);
    }

    #[test]
    fn test_pm1_sensor_reporting() {
        let descriptor = device_descriptor().unwrap();
        let pm1 = descriptor.entity("pm1").unwrap();
        assert_eq!(pm1.kind, EntityKind::Sensor);
        assert_eq!(pm1.unit, Some(Unit::MicrogramsPerCubicMeter));
        assert_eq!(pm1.reporting, Some(ReportingPolicy::new(10, 120, 1.0)));
        assert_eq!(pm1.zcl_type, ZclType::Single);
    }

    #[test]
    fn test_voc_index_binds_standard_attribute() {
        // the VOC index entity reads the standard AnalogInput present_value,
        // proving the merged standard/extension lookup
        let descriptor = device_descriptor().unwrap();
        let voc = descriptor.entity("voc_index").unwrap();
        assert_eq!(voc.attribute.cluster_id, catalog::ANALOG_INPUT.cluster_id);
        assert_eq!(voc.attribute.attr_id, 0x0055);
        assert_eq!(voc.sensor_class, Some(SensorDeviceClass::Aqi));
    }

    #[test]
    fn test_offset_controls_are_integer_stepped() {
        let descriptor = device_descriptor().unwrap();
        for key in ["temperature_offset", "humidity_offset"] {
            let entity = descriptor.entity(key).unwrap();
            assert_eq!(entity.kind, EntityKind::Number);
            assert_eq!(entity.zcl_type, ZclType::I16);
            assert_eq!(entity.min_value, Some(-50.0));
            assert_eq!(entity.max_value, Some(50.0));
            assert_eq!(entity.step, Some(1.0));
        }
    }

    #[test]
    fn test_calibration_buttons() {
        let descriptor = device_descriptor().unwrap();
        for key in [
            "factory_reset_co2",
            "forced_recalibration_co2",
            "automatic_scal_co2",
        ] {
            let entity = descriptor.entity(key).unwrap();
            assert_eq!(entity.kind, EntityKind::Button);
            assert_eq!(entity.zcl_type, ZclType::Bool);
            assert!(entity.reporting.is_none());
        }
    }

    #[test]
    fn test_sensor_subscriptions_cover_all_reporting_entities() {
        let descriptor = device_descriptor().unwrap();
        let requests = descriptor.subscription_requests();
        // pm1, pm10, voc_index, voc_raw_data
        assert_eq!(requests.len(), 4);
        assert!(requests.iter().all(|r| r.min_interval == 10
            && r.max_interval == 120
            && r.reportable_change == 1.0));
    }

    #[test]
    fn test_build_is_deterministic() {
        assert_eq!(device_descriptor().unwrap(), device_descriptor().unwrap());
    }
}
