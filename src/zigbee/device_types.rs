//! Zigbee device type definitions.
//!
//! This module defines the Home Automation profile device types used when
//! reclassifying device endpoints, following the ZHA profile specification.

use serde::{Deserialize, Serialize};

/// Zigbee Home Automation profile identifier (0x0104).
///
/// All device types below are defined within this profile.
pub const PROFILE_HOME_AUTOMATION: u16 = 0x0104;

/// A device type identifier within the Home Automation profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeviceTypeId(pub u16);

/// Simple Sensor device type
///
/// Device Type ID: 0x000C (12 decimal)
///
/// Generic sensor endpoint without a more specific classification.
/// Used for endpoints that carry measurement clusters the profile has
/// no dedicated device type for.
pub const DEV_TYPE_SIMPLE_SENSOR: DeviceTypeId = DeviceTypeId(0x000C);

/// Occupancy Sensor device type
///
/// Device Type ID: 0x0107 (263 decimal)
///
/// Used for motion/presence sensors.
pub const DEV_TYPE_OCCUPANCY_SENSOR: DeviceTypeId = DeviceTypeId(0x0107);

/// Temperature Sensor device type
///
/// Device Type ID: 0x0302 (770 decimal)
///
/// Used for endpoints whose primary cluster is TemperatureMeasurement.
pub const DEV_TYPE_TEMPERATURE_SENSOR: DeviceTypeId = DeviceTypeId(0x0302);
