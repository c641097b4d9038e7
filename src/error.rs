use crate::zigbee::types::AttributeRef;
use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum QuirkError {
    #[error("Cluster {cluster} (0x{cluster_id:04X}): attribute id 0x{attr_id:04X} is already defined")]
    SchemaConflict {
        cluster: &'static str,
        cluster_id: u16,
        attr_id: u16,
    },

    #[error("A schema for cluster 0x{cluster_id:04X} is already registered")]
    DuplicateSchema { cluster_id: u16 },

    #[error("Endpoint {endpoint_id}: cluster 0x{cluster_id:04X} has no registered schema")]
    UnknownSchema { endpoint_id: u8, cluster_id: u16 },

    #[error("Endpoint {endpoint_id} already binds cluster 0x{cluster_id:04X}")]
    BindingConflict { endpoint_id: u8, cluster_id: u16 },

    #[error("Endpoint {endpoint_id}: device type is already replaced")]
    DuplicateEndpointOverride { endpoint_id: u8 },

    #[error("Endpoint {endpoint_id}: device type must be replaced before binding clusters to it")]
    LateEndpointOverride { endpoint_id: u8 },

    #[error("{reference}: cluster is not bound to this endpoint")]
    UnboundCluster { reference: AttributeRef },

    #[error("{reference}: attribute is not defined by the bound schema")]
    UnknownAttribute { reference: AttributeRef },

    #[error("Entity '{unique_key}': {reference} is read-only, a read-write attribute is required")]
    AccessMismatch {
        unique_key: String,
        reference: AttributeRef,
    },

    #[error("Entity '{unique_key}': {message}")]
    Validation { unique_key: String, message: String },

    #[error("Duplicate unique key '{unique_key}': declared for {first} and again for {second}")]
    DuplicateUniqueKey {
        unique_key: String,
        first: AttributeRef,
        second: AttributeRef,
    },

    #[error("No entity with unique key '{unique_key}'")]
    UnknownEntity { unique_key: String },

    #[error("Entity '{unique_key}': {message}")]
    InvalidWrite { unique_key: String, message: String },

    #[error("Transport error: {0}")]
    Transport(String),
}

pub type Result<T> = std::result::Result<T, QuirkError>;
