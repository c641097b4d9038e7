//! Zigbee protocol-side types.
//!
//! This module organizes the protocol-level building blocks of a quirk:
//! - `types`: wire types, access rights, attribute definitions
//! - `catalog`: standard-cluster catalog the vendor schemas extend
//! - `schema`: vendor cluster schemas and their registry
//! - `device_types`: Home Automation profile device types

pub mod catalog;
pub mod device_types;
pub mod schema;
pub mod types;

// Re-export key types for convenience
pub use catalog::StandardCluster;
pub use device_types::{DeviceTypeId, PROFILE_HOME_AUTOMATION};
pub use schema::{ClusterSchema, SchemaRegistry};
pub use types::{Access, AttributeDef, AttributeRef, ZclType, ZclValue};
