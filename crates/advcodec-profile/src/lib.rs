//! Device profiles, sensor groups and multi-group packing.
//!
//! Profiles bundle an identified [`Format`](advcodec_wire::Format) with the
//! hints used to recognize a device: a name pattern and service identifiers.
//! The group layer buckets individually named sensors into coarse categories
//! and packs each category with its canonical profile.
//!
//! Both registries are immutable once built. [`ProfileRegistry::builtin`] and
//! [`GroupRegistry::builtin`] are constructed lazily on first use and can be
//! shared freely across threads.

pub mod catalog;
pub mod config;
pub mod error;
pub mod group;
pub mod json;
pub mod profile;
pub mod registry;

pub use config::{GroupConfig, RegistryConfig};
pub use error::{ProfileError, Result};
pub use group::{
    classify, match_group, GroupEntry, GroupPacket, GroupRegistry, GroupedValues, SensorGroup,
};
pub use json::{sensors_from_json, values_from_json, values_from_value, values_to_json};
pub use profile::Profile;
pub use registry::ProfileRegistry;
