//! Declarative codec for short-range wireless advertising payloads.
//!
//! advcodec describes telemetry payloads as fixed catalogs of named numeric
//! fields and translates between raw advertising bytes and name → value maps.
//!
//! # Crate Structure
//!
//! - [`wire`] — Field descriptors, formats and the encode/decode engine
//! - [`profile`] — Device profiles, sensor groups and multi-group packing

/// Re-export wire types.
pub mod wire {
    pub use advcodec_wire::*;
}

/// Re-export profile and group types.
pub mod profile {
    pub use advcodec_profile::*;
}

pub use advcodec_profile::{GroupRegistry, Profile, ProfileRegistry, SensorGroup};
pub use advcodec_wire::{decode, encode, CodecError, DecodedValues, Format};
