//! Zigbee device quirks library.
//!
//! Some devices expose vendor-specific data points the generic ZCL decoder
//! cannot interpret. A *quirk* closes that gap: it extends standard
//! clusters with vendor attributes, rebinds the device's physical
//! endpoints to the extended schemas, and maps each attribute onto a
//! validated platform entity with presentation metadata and an optional
//! reporting subscription.
//!
//! Descriptor construction is a synchronous, side-effect-free build step
//! performed once per device class; the result is immutable and safe to
//! share. A build either produces a fully valid descriptor or fails with
//! an error naming the offending declaration.

pub mod device;
pub mod error;
pub mod quirk;
pub mod transport;
pub mod zigbee;

pub use error::{QuirkError, Result};
pub use quirk::{DeviceDescriptor, EntityBinding, EntityKind, QuirkBuilder, ReportingPolicy};
pub use zigbee::{Access, AttributeDef, AttributeRef, ClusterSchema, SchemaRegistry, ZclType, ZclValue};
