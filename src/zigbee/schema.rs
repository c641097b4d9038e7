//! Vendor cluster schemas.
//!
//! A `ClusterSchema` layers vendor attributes on top of a standard cluster
//! from the catalog. Lookup merges the extension list with the standard
//! attribute set, so entities can bind standard and vendor attributes alike.
//!
//! Schemas are built once at registration time and never mutated afterward.

use super::catalog::StandardCluster;
use super::types::AttributeDef;
use crate::error::{QuirkError, Result};

/// A standard cluster extended with vendor attributes.
///
/// Identified by the `cluster_id` inherited from its base cluster.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterSchema {
    base: &'static StandardCluster,
    extensions: Vec<AttributeDef>,
}

impl ClusterSchema {
    /// Extend a standard cluster with vendor attributes.
    ///
    /// Fails with a schema conflict if an extension id collides with a
    /// standard attribute id or with a sibling extension.
    pub fn extend(base: &'static StandardCluster, extensions: Vec<AttributeDef>) -> Result<Self> {
        for (i, ext) in extensions.iter().enumerate() {
            if base.defines(ext.id) || extensions[..i].iter().any(|e| e.id == ext.id) {
                return Err(QuirkError::SchemaConflict {
                    cluster: base.name,
                    cluster_id: base.cluster_id,
                    attr_id: ext.id,
                });
            }
        }
        Ok(Self { base, extensions })
    }

    /// Cluster id, inherited from the base standard cluster.
    pub fn cluster_id(&self) -> u16 {
        self.base.cluster_id
    }

    /// Name of the base standard cluster.
    pub fn name(&self) -> &'static str {
        self.base.name
    }

    /// The base standard cluster this schema extends.
    pub fn standard(&self) -> &'static StandardCluster {
        self.base
    }

    /// Vendor extension attributes only.
    pub fn extensions(&self) -> &[AttributeDef] {
        &self.extensions
    }

    /// Merged attribute lookup: extensions first, then the standard set.
    pub fn attribute(&self, id: u16) -> Option<&AttributeDef> {
        self.extensions
            .iter()
            .find(|a| a.id == id)
            .or_else(|| self.base.attribute(id))
    }

    /// All attributes of the merged view, standard set first.
    pub fn attributes(&self) -> impl Iterator<Item = &AttributeDef> {
        self.base.attributes.iter().chain(self.extensions.iter())
    }
}

/// Immutable set of cluster schemas for one device class.
///
/// Holds at most one schema per cluster id; endpoint bindings resolve their
/// schema here.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SchemaRegistry {
    schemas: Vec<ClusterSchema>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a schema. Fails if its cluster id is already taken.
    pub fn register(&mut self, schema: ClusterSchema) -> Result<()> {
        if self.get(schema.cluster_id()).is_some() {
            return Err(QuirkError::DuplicateSchema {
                cluster_id: schema.cluster_id(),
            });
        }
        log::debug!(
            "Registered schema {} (0x{:04X}) with {} extension attribute(s)",
            schema.name(),
            schema.cluster_id(),
            schema.extensions().len()
        );
        self.schemas.push(schema);
        Ok(())
    }

    /// Look up the schema for a cluster id.
    pub fn get(&self, cluster_id: u16) -> Option<&ClusterSchema> {
        self.schemas.iter().find(|s| s.cluster_id() == cluster_id)
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zigbee::catalog;
    use crate::zigbee::types::{Access, ZclType};

    #[test]
    fn test_extend_merges_standard_and_vendor_attributes() {
        let schema = ClusterSchema::extend(
            &catalog::PM25_MEASUREMENT,
            vec![AttributeDef::new(
                0x00C8,
                "pm1",
                ZclType::Single,
                Access::ReadOnly,
            )],
        )
        .unwrap();

        // vendor extension
        assert_eq!(schema.attribute(0x00C8).unwrap().name, "pm1");
        // inherited standard attribute
        assert_eq!(schema.attribute(0x0000).unwrap().name, "measured_value");
        assert!(schema.attribute(0x1234).is_none());
        assert_eq!(schema.cluster_id(), 0x042A);
    }

    #[test]
    fn test_extension_colliding_with_standard_id_is_rejected() {
        let err = ClusterSchema::extend(
            &catalog::TEMPERATURE_MEASUREMENT,
            vec![AttributeDef::new(
                0x0000,
                "bogus",
                ZclType::I16,
                Access::ReadOnly,
            )],
        )
        .unwrap_err();

        match err {
            QuirkError::SchemaConflict { attr_id, .. } => assert_eq!(attr_id, 0x0000),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_sibling_extension_collision_is_rejected() {
        // Two extensions at 0x0201 in the same cluster
        let err = ClusterSchema::extend(
            &catalog::PM25_MEASUREMENT,
            vec![
                AttributeDef::new(0x0201, "reading_interval", ZclType::U16, Access::ReadWrite),
                AttributeDef::new(0x0201, "duplicate", ZclType::U16, Access::ReadWrite),
            ],
        )
        .unwrap_err();

        match err {
            QuirkError::SchemaConflict {
                cluster_id,
                attr_id,
                ..
            } => {
                assert_eq!(cluster_id, 0x042A);
                assert_eq!(attr_id, 0x0201);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_extension_list_is_valid() {
        let schema = ClusterSchema::extend(&catalog::BASIC, vec![]).unwrap();
        assert!(schema.extensions().is_empty());
        assert!(schema.attribute(0x0000).is_some());
    }

    #[test]
    fn test_registry_rejects_duplicate_cluster_id() {
        let mut registry = SchemaRegistry::new();
        registry
            .register(ClusterSchema::extend(&catalog::BASIC, vec![]).unwrap())
            .unwrap();

        let err = registry
            .register(ClusterSchema::extend(&catalog::BASIC, vec![]).unwrap())
            .unwrap_err();
        match err {
            QuirkError::DuplicateSchema { cluster_id } => assert_eq!(cluster_id, 0x0000),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(registry.len(), 1);
    }
}
