//! Quirk construction - builder, entities and frozen descriptors.
//!
//! This module organizes the presentation-side components of a quirk:
//! - `entities`: entity kinds, presentation metadata, reporting policies
//! - `builder`: the accumulating builder with eager validation
//! - `descriptor`: the immutable result consumed by the host platform

pub mod builder;
pub mod descriptor;
pub mod entities;

// Re-export key types for convenience
pub use builder::QuirkBuilder;
pub use descriptor::{
    CodecEntry, DeviceDescriptor, EndpointBinding, EndpointOverride, SubscriptionRequest,
};
pub use entities::{
    ButtonDecl, EntityBinding, EntityKind, NumberDecl, NumberDeviceClass, ReportingPolicy,
    SensorDecl, SensorDeviceClass, StateClass, SwitchDecl, Unit,
};
