//! Standard ZCL cluster catalog.
//!
//! Vendor schemas extend standard clusters; this catalog holds the standard
//! attribute sets those schemas layer on top of. Only the clusters and
//! attributes relevant to this device class are listed, and only with the
//! wire types the description layer supports.

use super::types::{Access, AttributeDef, ZclType};

/// A named standard cluster with its standard attribute set.
#[derive(Debug, PartialEq)]
pub struct StandardCluster {
    pub name: &'static str,
    pub cluster_id: u16,
    pub attributes: &'static [AttributeDef],
}

impl StandardCluster {
    /// Look up a standard attribute by id.
    pub fn attribute(&self, id: u16) -> Option<&AttributeDef> {
        self.attributes.iter().find(|a| a.id == id)
    }

    /// Whether the standard cluster defines this attribute id.
    pub fn defines(&self, id: u16) -> bool {
        self.attribute(id).is_some()
    }
}

/// Basic cluster (0x0000).
///
/// Device identification. Rebound without extensions so inbound
/// identification frames are routed through the quirk's endpoint table.
/// String-typed attributes (manufacturer name, model id) are decoded by the
/// generic stack and are not part of this catalog.
pub const BASIC: StandardCluster = StandardCluster {
    name: "Basic",
    cluster_id: 0x0000,
    attributes: &[
        AttributeDef::new(0x0000, "zcl_version", ZclType::U8, Access::ReadOnly).mandatory(),
        AttributeDef::new(0x0001, "application_version", ZclType::U8, Access::ReadOnly),
        AttributeDef::new(0x0002, "stack_version", ZclType::U8, Access::ReadOnly),
        AttributeDef::new(0x0003, "hw_version", ZclType::U8, Access::ReadOnly),
        AttributeDef::new(0x0007, "power_source", ZclType::U8, Access::ReadOnly).mandatory(),
    ],
};

/// AnalogInput cluster (0x000C).
///
/// Generic analog value holder. This device repurposes it as a VOC index
/// cluster: `present_value` carries the computed index.
pub const ANALOG_INPUT: StandardCluster = StandardCluster {
    name: "AnalogInput",
    cluster_id: 0x000C,
    attributes: &[
        AttributeDef::new(0x0051, "out_of_service", ZclType::Bool, Access::ReadWrite).mandatory(),
        AttributeDef::new(0x0055, "present_value", ZclType::Single, Access::ReadWrite).mandatory(),
        AttributeDef::new(0x006F, "status_flags", ZclType::U8, Access::ReadOnly).mandatory(),
    ],
};

/// AnalogInput `present_value` attribute id, exposed for entity bindings.
pub const ANALOG_INPUT_PRESENT_VALUE: u16 = 0x0055;

/// TemperatureMeasurement cluster (0x0402).
///
/// Temperature in centidegrees Celsius (21.5 °C is reported as 2150).
pub const TEMPERATURE_MEASUREMENT: StandardCluster = StandardCluster {
    name: "TemperatureMeasurement",
    cluster_id: 0x0402,
    attributes: &[
        AttributeDef::new(0x0000, "measured_value", ZclType::I16, Access::ReadOnly).mandatory(),
        AttributeDef::new(0x0001, "min_measured_value", ZclType::I16, Access::ReadOnly).mandatory(),
        AttributeDef::new(0x0002, "max_measured_value", ZclType::I16, Access::ReadOnly).mandatory(),
        AttributeDef::new(0x0003, "tolerance", ZclType::U16, Access::ReadOnly),
    ],
};

/// RelativeHumidity cluster (0x0405).
///
/// Relative humidity in hundredths of a percent (45.5 % is reported as 4550).
pub const RELATIVE_HUMIDITY: StandardCluster = StandardCluster {
    name: "RelativeHumidity",
    cluster_id: 0x0405,
    attributes: &[
        AttributeDef::new(0x0000, "measured_value", ZclType::U16, Access::ReadOnly).mandatory(),
        AttributeDef::new(0x0001, "min_measured_value", ZclType::U16, Access::ReadOnly).mandatory(),
        AttributeDef::new(0x0002, "max_measured_value", ZclType::U16, Access::ReadOnly).mandatory(),
        AttributeDef::new(0x0003, "tolerance", ZclType::U16, Access::ReadOnly),
    ],
};

/// CarbonDioxideConcentration cluster (0x040D).
///
/// CO2 concentration as a fraction of one (400 ppm is reported as 0.0004).
pub const CO2_CONCENTRATION: StandardCluster = StandardCluster {
    name: "CarbonDioxideConcentration",
    cluster_id: 0x040D,
    attributes: &[
        AttributeDef::new(0x0000, "measured_value", ZclType::Single, Access::ReadOnly).mandatory(),
        AttributeDef::new(0x0001, "min_measured_value", ZclType::Single, Access::ReadOnly),
        AttributeDef::new(0x0002, "max_measured_value", ZclType::Single, Access::ReadOnly),
        AttributeDef::new(0x0003, "tolerance", ZclType::Single, Access::ReadOnly),
    ],
};

/// PM2.5 Measurement cluster (0x042A).
///
/// Particulate matter concentration in µg/m³.
pub const PM25_MEASUREMENT: StandardCluster = StandardCluster {
    name: "PM25Measurement",
    cluster_id: 0x042A,
    attributes: &[
        AttributeDef::new(0x0000, "measured_value", ZclType::Single, Access::ReadOnly).mandatory(),
        AttributeDef::new(0x0001, "min_measured_value", ZclType::Single, Access::ReadOnly),
        AttributeDef::new(0x0002, "max_measured_value", ZclType::Single, Access::ReadOnly),
        AttributeDef::new(0x0003, "tolerance", ZclType::Single, Access::ReadOnly),
    ],
};

/// Every standard cluster in the catalog.
pub const ALL: &[&StandardCluster] = &[
    &BASIC,
    &ANALOG_INPUT,
    &TEMPERATURE_MEASUREMENT,
    &RELATIVE_HUMIDITY,
    &CO2_CONCENTRATION,
    &PM25_MEASUREMENT,
];

/// Resolve a standard cluster by name.
pub fn by_name(name: &str) -> Option<&'static StandardCluster> {
    ALL.iter().copied().find(|c| c.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_lookup() {
        let attr = PM25_MEASUREMENT.attribute(0x0000).unwrap();
        assert_eq!(attr.name, "measured_value");
        assert_eq!(attr.zcl_type, ZclType::Single);
        assert!(attr.mandatory);

        assert!(PM25_MEASUREMENT.attribute(0x00C8).is_none());
    }

    #[test]
    fn test_defines() {
        assert!(TEMPERATURE_MEASUREMENT.defines(0x0000));
        assert!(!TEMPERATURE_MEASUREMENT.defines(0x0210));
    }

    #[test]
    fn test_by_name() {
        assert_eq!(by_name("Basic").unwrap().cluster_id, 0x0000);
        assert_eq!(by_name("PM25Measurement").unwrap().cluster_id, 0x042A);
        assert!(by_name("NoSuchCluster").is_none());
    }

    #[test]
    fn test_catalog_ids_are_unique_within_cluster() {
        for cluster in ALL {
            for (i, attr) in cluster.attributes.iter().enumerate() {
                assert!(
                    !cluster.attributes[..i].iter().any(|a| a.id == attr.id),
                    "{} redefines 0x{:04X}",
                    cluster.name,
                    attr.id
                );
            }
        }
    }
}
