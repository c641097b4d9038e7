//! Built-in device descriptions.

pub mod air_quality;
