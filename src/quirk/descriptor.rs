//! Frozen device descriptors.
//!
//! A `DeviceDescriptor` is the finished, immutable product of a
//! [`QuirkBuilder`](super::builder::QuirkBuilder). The host platform queries
//! it for entities and endpoint bindings; the transport collaborator
//! receives its cluster rebindings, codec declarations and reporting
//! subscriptions. Nothing in here performs I/O.

use super::entities::{EntityBinding, EntityKind};
use crate::error::{QuirkError, Result};
use crate::transport::{AttributeSink, EndpointRegistry};
use crate::zigbee::device_types::DeviceTypeId;
use crate::zigbee::schema::{ClusterSchema, SchemaRegistry};
use crate::zigbee::types::{ZclType, ZclValue};
use serde::Serialize;

/// Declares that a standard cluster on a physical endpoint is replaced by
/// the registered schema with the same cluster id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EndpointBinding {
    pub endpoint_id: u8,
    pub cluster_id: u16,
}

/// Reclassifies a physical endpoint's advertised device type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EndpointOverride {
    pub endpoint_id: u8,
    pub device_type: DeviceTypeId,
}

/// One `(cluster, attribute, wire type)` triple for the message codec.
///
/// The codec itself lives in the transport collaborator; the descriptor
/// only declares which triples exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CodecEntry {
    pub cluster_id: u16,
    pub attribute_id: u16,
    pub zcl_type: ZclType,
}

/// Reporting subscription issued once at device-commissioning time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SubscriptionRequest {
    pub cluster_id: u16,
    pub attribute_id: u16,
    pub endpoint_id: u8,
    pub min_interval: u16,
    pub max_interval: u16,
    pub reportable_change: f64,
}

/// The finished device description, consumed read-only by the host platform
/// for the lifetime of the device's registration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceDescriptor {
    manufacturer: &'static str,
    model: &'static str,
    overrides: Vec<EndpointOverride>,
    bindings: Vec<EndpointBinding>,
    entities: Vec<EntityBinding>,
    #[serde(skip)]
    registry: SchemaRegistry,
}

impl DeviceDescriptor {
    pub(crate) fn new(
        manufacturer: &'static str,
        model: &'static str,
        registry: SchemaRegistry,
        overrides: Vec<EndpointOverride>,
        bindings: Vec<EndpointBinding>,
        entities: Vec<EntityBinding>,
    ) -> Self {
        Self {
            manufacturer,
            model,
            overrides,
            bindings,
            entities,
            registry,
        }
    }

    pub fn manufacturer(&self) -> &'static str {
        self.manufacturer
    }

    pub fn model(&self) -> &'static str {
        self.model
    }

    pub fn endpoint_overrides(&self) -> &[EndpointOverride] {
        &self.overrides
    }

    pub fn endpoint_bindings(&self) -> &[EndpointBinding] {
        &self.bindings
    }

    pub fn entities(&self) -> &[EntityBinding] {
        &self.entities
    }

    /// Look up an entity by its unique key.
    pub fn entity(&self, unique_key: &str) -> Option<&EntityBinding> {
        self.entities.iter().find(|e| e.unique_key == unique_key)
    }

    /// Schema bound for a cluster id, if any endpoint binds it.
    pub fn schema(&self, cluster_id: u16) -> Option<&ClusterSchema> {
        self.bindings
            .iter()
            .any(|b| b.cluster_id == cluster_id)
            .then(|| self.registry.get(cluster_id))
            .flatten()
    }

    /// Every declared `(cluster, attribute, wire type)` triple, one entry
    /// per attribute of each bound cluster's merged view.
    pub fn codec_table(&self) -> Vec<CodecEntry> {
        let mut cluster_ids: Vec<u16> = self.bindings.iter().map(|b| b.cluster_id).collect();
        cluster_ids.sort_unstable();
        cluster_ids.dedup();

        cluster_ids
            .into_iter()
            .filter_map(|id| self.registry.get(id))
            .flat_map(|schema| {
                schema.attributes().map(|attr| CodecEntry {
                    cluster_id: schema.cluster_id(),
                    attribute_id: attr.id,
                    zcl_type: attr.zcl_type,
                })
            })
            .collect()
    }

    /// One subscription request per entity carrying a reporting policy.
    pub fn subscription_requests(&self) -> Vec<SubscriptionRequest> {
        self.entities
            .iter()
            .filter_map(|entity| {
                entity.reporting.map(|policy| SubscriptionRequest {
                    cluster_id: entity.attribute.cluster_id,
                    attribute_id: entity.attribute.attr_id,
                    endpoint_id: entity.attribute.endpoint_id,
                    min_interval: policy.min_interval,
                    max_interval: policy.max_interval,
                    reportable_change: policy.reportable_change,
                })
            })
            .collect()
    }

    /// Install the endpoint table into the transport's device registry.
    ///
    /// Device-type overrides are applied before any cluster binding, so the
    /// endpoint is reclassified by the time its clusters are evaluated.
    pub fn install(&self, registry: &mut dyn EndpointRegistry) -> Result<()> {
        for o in &self.overrides {
            registry.replace_endpoint(o.endpoint_id, o.device_type)?;
        }
        for b in &self.bindings {
            let schema = self
                .registry
                .get(b.cluster_id)
                .ok_or(QuirkError::UnknownSchema {
                    endpoint_id: b.endpoint_id,
                    cluster_id: b.cluster_id,
                })?;
            registry.replace_cluster(b.endpoint_id, schema)?;
        }
        Ok(())
    }

    /// Issue all reporting subscriptions, once, at commissioning time.
    pub fn commission(&self, sink: &dyn AttributeSink) -> Result<()> {
        for request in self.subscription_requests() {
            sink.configure_reporting(&request)?;
        }
        Ok(())
    }

    /// Write a new value to a read-write entity, forwarding to the
    /// transport sink after type- and bounds-checking it against the
    /// entity's declaration.
    pub fn write(&self, unique_key: &str, value: ZclValue, sink: &dyn AttributeSink) -> Result<()> {
        let entity = self.entity(unique_key).ok_or_else(|| QuirkError::UnknownEntity {
            unique_key: unique_key.to_string(),
        })?;
        let invalid = |message: String| QuirkError::InvalidWrite {
            unique_key: unique_key.to_string(),
            message,
        };

        match entity.kind {
            EntityKind::Sensor => {
                return Err(invalid("sensor entities are read-only".to_string()));
            }
            EntityKind::Button => {
                return Err(invalid(
                    "button entities are triggered, not written".to_string(),
                ));
            }
            EntityKind::Switch => {
                if value.as_bool().is_none() {
                    return Err(invalid(format!(
                        "switch entities take a Bool value, got {value:?}"
                    )));
                }
            }
            EntityKind::Number => {
                if value.zcl_type() != entity.zcl_type {
                    return Err(invalid(format!(
                        "expected a {:?} value, got {:?}",
                        entity.zcl_type, value
                    )));
                }
                // bounds are always present on number entities
                let (min, max) = (entity.min_value.unwrap_or(f64::MIN), entity.max_value.unwrap_or(f64::MAX));
                let numeric = value
                    .as_f64()
                    .ok_or_else(|| invalid(format!("non-numeric value {value:?}")))?;
                if numeric < min || numeric > max {
                    return Err(invalid(format!(
                        "value {numeric} is outside the declared bounds [{min}, {max}]"
                    )));
                }
            }
        }
        sink.write_attribute(entity.attribute, value)
    }

    /// Trigger a command button, forwarding a `Bool(true)` write to the
    /// transport sink.
    pub fn trigger(&self, unique_key: &str, sink: &dyn AttributeSink) -> Result<()> {
        let entity = self.entity(unique_key).ok_or_else(|| QuirkError::UnknownEntity {
            unique_key: unique_key.to_string(),
        })?;
        if entity.kind != EntityKind::Button {
            return Err(QuirkError::InvalidWrite {
                unique_key: unique_key.to_string(),
                message: format!("{} entities cannot be triggered", entity.kind),
            });
        }
        sink.write_attribute(entity.attribute, ZclValue::Bool(true))
    }
}
