//! Entity bindings and presentation metadata.
//!
//! Each schema attribute can be exposed as zero or more entities on the
//! host automation platform. An entity binding carries the attribute
//! reference, the entity kind, and the presentation metadata the platform
//! needs to render it (unit, device class, numeric bounds).

use crate::error::{QuirkError, Result};
use crate::zigbee::types::{Access, AttributeRef, ZclType};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of entity exposed to the host platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// Read-only measurement
    Sensor,
    /// Bounded-range numeric control
    Number,
    /// Boolean on/off control
    Switch,
    /// Momentary command trigger
    Button,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensor => write!(f, "sensor"),
            Self::Number => write!(f, "number"),
            Self::Switch => write!(f, "switch"),
            Self::Button => write!(f, "button"),
        }
    }
}

/// Display unit attached to a sensor or number entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Unit {
    #[serde(rename = "µg/m³")]
    MicrogramsPerCubicMeter,
    #[serde(rename = "ppm")]
    PartsPerMillion,
    #[serde(rename = "s")]
    Seconds,
    #[serde(rename = "m")]
    Meters,
    #[serde(rename = "°C")]
    Celsius,
    #[serde(rename = "%")]
    Percent,
}

impl Unit {
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::MicrogramsPerCubicMeter => "µg/m³",
            Self::PartsPerMillion => "ppm",
            Self::Seconds => "s",
            Self::Meters => "m",
            Self::Celsius => "°C",
            Self::Percent => "%",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Device classification of a sensor entity.
///
/// The type of data a sensor returns impacts how the platform displays it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorDeviceClass {
    Aqi,
    CarbonDioxide,
    Humidity,
    Pm1,
    Pm10,
    Pm25,
    Temperature,
    VolatileOrganicCompounds,
}

/// Device classification of a number entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumberDeviceClass {
    Distance,
    Duration,
    Humidity,
    Pm25,
    Temperature,
}

/// How the platform should treat a sensor's value history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateClass {
    Measurement,
    Total,
    TotalIncreasing,
}

/// Periodic-reporting subscription policy for one attribute.
///
/// Asks the device to push an unsolicited report at least every
/// `max_interval` seconds, at most every `min_interval` seconds, and
/// whenever the value changes by `reportable_change` or more.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReportingPolicy {
    pub min_interval: u16,
    pub max_interval: u16,
    pub reportable_change: f64,
}

impl ReportingPolicy {
    pub const fn new(min_interval: u16, max_interval: u16, reportable_change: f64) -> Self {
        Self {
            min_interval,
            max_interval,
            reportable_change,
        }
    }

    pub(crate) fn validate(&self, unique_key: &str) -> Result<()> {
        if self.min_interval > self.max_interval {
            return Err(QuirkError::Validation {
                unique_key: unique_key.to_string(),
                message: format!(
                    "reporting min_interval {} exceeds max_interval {}",
                    self.min_interval, self.max_interval
                ),
            });
        }
        if !self.reportable_change.is_finite() || self.reportable_change < 0.0 {
            return Err(QuirkError::Validation {
                unique_key: unique_key.to_string(),
                message: format!(
                    "reportable_change {} must be non-negative",
                    self.reportable_change
                ),
            });
        }
        Ok(())
    }
}

/// Declaration of a sensor entity.
pub struct SensorDecl {
    pub unique_key: &'static str,
    pub attribute: AttributeRef,
    pub translation_key: &'static str,
    pub fallback_name: &'static str,
    pub unit: Option<Unit>,
    pub device_class: Option<SensorDeviceClass>,
    pub state_class: Option<StateClass>,
    pub reporting: Option<ReportingPolicy>,
}

/// Declaration of a bounded numeric control entity.
pub struct NumberDecl {
    pub unique_key: &'static str,
    pub attribute: AttributeRef,
    pub translation_key: &'static str,
    pub fallback_name: &'static str,
    pub unit: Option<Unit>,
    pub device_class: Option<NumberDeviceClass>,
    pub min_value: f64,
    pub max_value: f64,
    pub step: Option<f64>,
}

/// Declaration of a boolean switch entity.
pub struct SwitchDecl {
    pub unique_key: &'static str,
    pub attribute: AttributeRef,
    pub translation_key: &'static str,
    pub fallback_name: &'static str,
}

/// Declaration of a momentary command button entity.
///
/// Buttons carry no value, no bounds and no reporting policy; triggering
/// one issues a write to the bound attribute.
pub struct ButtonDecl {
    pub unique_key: &'static str,
    pub attribute: AttributeRef,
    pub translation_key: &'static str,
    pub fallback_name: &'static str,
}

/// A validated entity binding inside a device descriptor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityBinding {
    /// Stable key, unique across the whole descriptor
    pub unique_key: &'static str,
    pub kind: EntityKind,
    /// The bound attribute
    pub attribute: AttributeRef,
    /// Wire type of the bound attribute, resolved from the schema
    pub zcl_type: ZclType,
    /// Access rights of the bound attribute
    pub access: Access,
    pub translation_key: &'static str,
    pub fallback_name: &'static str,
    pub unit: Option<Unit>,
    pub sensor_class: Option<SensorDeviceClass>,
    pub number_class: Option<NumberDeviceClass>,
    pub state_class: Option<StateClass>,
    /// Lower bound, numbers only
    pub min_value: Option<f64>,
    /// Upper bound, numbers only
    pub max_value: Option<f64>,
    /// Control step, numbers only
    pub step: Option<f64>,
    pub reporting: Option<ReportingPolicy>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reporting_policy_validation() {
        assert!(ReportingPolicy::new(10, 120, 1.0).validate("x").is_ok());
        assert!(ReportingPolicy::new(0, 0, 0.0).validate("x").is_ok());

        let err = ReportingPolicy::new(120, 10, 1.0).validate("x").unwrap_err();
        assert!(err.to_string().contains("min_interval"));

        let err = ReportingPolicy::new(10, 120, -1.0)
            .validate("x")
            .unwrap_err();
        assert!(err.to_string().contains("non-negative"));
    }

    #[test]
    fn test_unit_symbols() {
        assert_eq!(Unit::MicrogramsPerCubicMeter.symbol(), "µg/m³");
        assert_eq!(Unit::Celsius.to_string(), "°C");
    }

    #[test]
    fn test_entity_kind_display() {
        assert_eq!(EntityKind::Sensor.to_string(), "sensor");
        assert_eq!(EntityKind::Button.to_string(), "button");
    }
}
