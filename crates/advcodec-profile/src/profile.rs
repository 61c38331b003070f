use std::collections::BTreeSet;

use advcodec_wire::{decode, encode, DecodedValues, Format};
use bytes::Bytes;
use serde::Serialize;

use crate::error::{ProfileError, Result};

/// A device-level bundle of formats and recognition hints.
///
/// The primary format always carries an identifier; auxiliary formats never
/// do. Both invariants are checked on construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Profile {
    name: String,
    device_name_pattern: String,
    service_ids: BTreeSet<String>,
    identifier: u16,
    primary: Format,
    aux: Vec<Format>,
}

impl Profile {
    /// Create a profile around an identified primary format.
    pub fn new(
        name: impl Into<String>,
        device_name_pattern: impl Into<String>,
        primary: Format,
    ) -> Result<Self> {
        let name = name.into();
        let identifier = primary
            .identifier()
            .ok_or_else(|| ProfileError::PrimaryNotIdentified(name.clone()))?;

        Ok(Self {
            name,
            device_name_pattern: device_name_pattern.into(),
            service_ids: BTreeSet::new(),
            identifier,
            primary,
            aux: Vec::new(),
        })
    }

    /// Add a service identifier used to recognize the device.
    pub fn with_service_id(mut self, service_id: impl Into<String>) -> Self {
        self.service_ids.insert(service_id.into());
        self
    }

    /// Append an auxiliary format without identifier.
    pub fn with_aux(mut self, format: Format) -> Result<Self> {
        if format.is_identified() {
            return Err(ProfileError::AuxNotRaw {
                profile: self.name,
                index: self.aux.len(),
            });
        }
        self.aux.push(format);
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn device_name_pattern(&self) -> &str {
        &self.device_name_pattern
    }

    pub fn service_ids(&self) -> &BTreeSet<String> {
        &self.service_ids
    }

    /// Identifier of the primary format.
    pub fn identifier(&self) -> u16 {
        self.identifier
    }

    pub fn primary(&self) -> &Format {
        &self.primary
    }

    pub fn aux(&self) -> &[Format] {
        &self.aux
    }

    /// True when `observed` contains this profile's device-name pattern.
    ///
    /// An empty pattern never matches.
    pub fn matches_device_name(&self, observed: &str) -> bool {
        !self.device_name_pattern.is_empty() && observed.contains(self.device_name_pattern.as_str())
    }

    /// Service identifiers compare ASCII case-insensitively.
    pub fn has_service_id(&self, service_id: &str) -> bool {
        self.service_ids
            .iter()
            .any(|id| id.eq_ignore_ascii_case(service_id))
    }

    /// Decode a buffer with the primary format.
    pub fn decode(&self, buf: &[u8]) -> advcodec_wire::Result<DecodedValues> {
        decode(buf, &self.primary)
    }

    /// Encode values with the primary format.
    pub fn encode(&self, values: &DecodedValues) -> Bytes {
        encode(values, &self.primary)
    }

    /// Decode a buffer with an auxiliary format.
    pub fn decode_aux(&self, index: usize, buf: &[u8]) -> Result<DecodedValues> {
        let format = self.aux.get(index).ok_or_else(|| ProfileError::UnknownAux {
            profile: self.name.clone(),
            index,
        })?;
        Ok(decode(buf, format)?)
    }

    /// Validate every format of the profile.
    pub fn validate(&self) -> Result<()> {
        std::iter::once(&self.primary)
            .chain(&self.aux)
            .try_for_each(|format| format.validate())
            .map_err(|source| ProfileError::Format {
                profile: self.name.clone(),
                source,
            })
    }
}
