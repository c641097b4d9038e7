//! Interfaces to the Zigbee transport collaborator.
//!
//! The description layer performs no I/O. These traits are the seam where a
//! transport implementation picks up the descriptor's endpoint rebindings,
//! reporting subscriptions and attribute writes. Runtime failures behind
//! these traits (lost writes, unreachable device) are the transport's
//! concern and surface as [`QuirkError::Transport`](crate::error::QuirkError).

use crate::error::Result;
use crate::quirk::descriptor::SubscriptionRequest;
use crate::zigbee::device_types::DeviceTypeId;
use crate::zigbee::schema::ClusterSchema;
use crate::zigbee::types::{AttributeRef, ZclValue};

/// Device/endpoint registry of the transport stack.
///
/// [`DeviceDescriptor::install`](crate::quirk::DeviceDescriptor::install)
/// pushes the quirk's endpoint table into this registry so inbound frames
/// for a rebound `(endpoint, cluster)` pair are decoded through the
/// extended schema instead of the standard one.
pub trait EndpointRegistry {
    /// Reclassify an endpoint's advertised device type.
    fn replace_endpoint(&mut self, endpoint_id: u8, device_type: DeviceTypeId) -> Result<()>;

    /// Route an endpoint's cluster through the given schema.
    fn replace_cluster(&mut self, endpoint_id: u8, schema: &ClusterSchema) -> Result<()>;
}

/// Write/command and reporting primitive of the transport stack.
pub trait AttributeSink {
    /// Write a value to an attribute on the live device.
    fn write_attribute(&self, target: AttributeRef, value: ZclValue) -> Result<()>;

    /// Ask the device to push unsolicited reports for an attribute.
    fn configure_reporting(&self, request: &SubscriptionRequest) -> Result<()>;
}
