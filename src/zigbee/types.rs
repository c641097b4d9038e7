//! Core ZCL wire-level types.
//!
//! Attribute values travel over the mesh as typed ZCL fields. This module
//! defines the subset of wire types this device class uses, the access
//! rights attached to each attribute, and the typed references entities use
//! to address attributes.

use serde::{Deserialize, Serialize};
use std::fmt;
use strum::FromRepr;

/// ZCL wire types used by this device class.
///
/// The discriminants are the ZCL data-type identifiers, so a decoded type id
/// can be mapped back with `ZclType::from_repr`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, FromRepr)]
#[repr(u8)]
pub enum ZclType {
    /// Boolean (ZCL 0x10)
    Bool = 0x10,
    /// Unsigned 8-bit integer (ZCL 0x20)
    U8 = 0x20,
    /// Unsigned 16-bit integer (ZCL 0x21)
    U16 = 0x21,
    /// Signed 16-bit integer (ZCL 0x29)
    I16 = 0x29,
    /// IEEE 754 single-precision float (ZCL 0x39)
    Single = 0x39,
}

impl ZclType {
    /// Range of values this type can represent, `None` for `Bool`.
    pub fn numeric_range(self) -> Option<(f64, f64)> {
        match self {
            Self::Bool => None,
            Self::U8 => Some((u8::MIN as f64, u8::MAX as f64)),
            Self::U16 => Some((u16::MIN as f64, u16::MAX as f64)),
            Self::I16 => Some((i16::MIN as f64, i16::MAX as f64)),
            Self::Single => Some((f32::MIN as f64, f32::MAX as f64)),
        }
    }

    /// Whether this type only represents whole numbers.
    pub fn is_integer(self) -> bool {
        matches!(self, Self::U8 | Self::U16 | Self::I16)
    }

    /// Whether `step` is representable at this type's resolution.
    ///
    /// Integer types cannot express fractional steps (a 0.1 step on a
    /// `U16` attribute would be silently rounded by the device).
    pub fn accepts_step(self, step: f64) -> bool {
        if !step.is_finite() || step <= 0.0 {
            return false;
        }
        !self.is_integer() || step.fract() == 0.0
    }
}

/// Access rights of a ZCL attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Access {
    ReadOnly,
    ReadWrite,
}

impl Access {
    pub fn is_writable(self) -> bool {
        matches!(self, Self::ReadWrite)
    }
}

/// One addressable datum inside a cluster.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttributeDef {
    /// 16-bit attribute identifier, unique within the owning cluster
    pub id: u16,
    /// Attribute name as shown in logs and error messages
    pub name: &'static str,
    /// Wire type of the attribute value
    pub zcl_type: ZclType,
    /// Read-only or read-write
    pub access: Access,
    /// Whether the device must implement this attribute
    pub mandatory: bool,
}

impl AttributeDef {
    /// Create an optional attribute definition.
    pub const fn new(id: u16, name: &'static str, zcl_type: ZclType, access: Access) -> Self {
        Self {
            id,
            name,
            zcl_type,
            access,
            mandatory: false,
        }
    }

    /// Mark this attribute as mandatory.
    pub const fn mandatory(mut self) -> Self {
        self.mandatory = true;
        self
    }
}

/// Typed reference to an attribute on a specific endpoint.
///
/// Entities address attributes by this triple, never by name lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttributeRef {
    pub endpoint_id: u8,
    pub cluster_id: u16,
    pub attr_id: u16,
}

impl AttributeRef {
    pub const fn new(endpoint_id: u8, cluster_id: u16, attr_id: u16) -> Self {
        Self {
            endpoint_id,
            cluster_id,
            attr_id,
        }
    }
}

impl fmt::Display for AttributeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "endpoint {}, cluster 0x{:04X}, attribute 0x{:04X}",
            self.endpoint_id, self.cluster_id, self.attr_id
        )
    }
}

/// A runtime attribute value, as passed through the write pathway.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ZclValue {
    Bool(bool),
    U8(u8),
    U16(u16),
    I16(i16),
    Single(f32),
}

impl ZclValue {
    /// Wire type of this value.
    pub fn zcl_type(&self) -> ZclType {
        match self {
            Self::Bool(_) => ZclType::Bool,
            Self::U8(_) => ZclType::U8,
            Self::U16(_) => ZclType::U16,
            Self::I16(_) => ZclType::I16,
            Self::Single(_) => ZclType::Single,
        }
    }

    /// Numeric view of this value, `None` for `Bool`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Bool(_) => None,
            Self::U8(v) => Some(*v as f64),
            Self::U16(v) => Some(*v as f64),
            Self::I16(v) => Some(*v as f64),
            Self::Single(v) => Some(*v as f64),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_types_reject_fractional_steps() {
        assert!(!ZclType::U16.accepts_step(0.1));
        assert!(!ZclType::I16.accepts_step(0.5));
        assert!(ZclType::U16.accepts_step(1.0));
        assert!(ZclType::I16.accepts_step(5.0));
    }

    #[test]
    fn test_float_type_accepts_fractional_steps() {
        assert!(ZclType::Single.accepts_step(0.1));
        assert!(ZclType::Single.accepts_step(1.0));
    }

    #[test]
    fn test_step_must_be_positive() {
        assert!(!ZclType::Single.accepts_step(0.0));
        assert!(!ZclType::U16.accepts_step(-1.0));
        assert!(!ZclType::Single.accepts_step(f64::NAN));
    }

    #[test]
    fn test_numeric_ranges() {
        assert_eq!(ZclType::U16.numeric_range(), Some((0.0, 65535.0)));
        assert_eq!(ZclType::I16.numeric_range(), Some((-32768.0, 32767.0)));
        assert_eq!(ZclType::Bool.numeric_range(), None);
    }

    #[test]
    fn test_type_from_wire_id() {
        assert_eq!(ZclType::from_repr(0x10), Some(ZclType::Bool));
        assert_eq!(ZclType::from_repr(0x39), Some(ZclType::Single));
        assert_eq!(ZclType::from_repr(0xFF), None);
    }

    #[test]
    fn test_value_accessors() {
        assert_eq!(ZclValue::U16(300).as_f64(), Some(300.0));
        assert_eq!(ZclValue::I16(-50).as_f64(), Some(-50.0));
        assert_eq!(ZclValue::Bool(true).as_f64(), None);
        assert_eq!(ZclValue::Bool(true).as_bool(), Some(true));
        assert_eq!(ZclValue::U16(1).as_bool(), None);
        assert_eq!(ZclValue::Single(2.5).zcl_type(), ZclType::Single);
    }
}
