use crate::group::SensorGroup;

/// Controls profile registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryConfig {
    /// When true, every format of a profile is validated on registration.
    pub validate_formats: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            validate_formats: true,
        }
    }
}

/// Controls sensor classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupConfig {
    /// Group assigned to sensor names that match no keyword.
    ///
    /// Defaults to [`SensorGroup::Environmental`]. Set it to
    /// [`SensorGroup::Unknown`] to keep unmatched sensors out of packing.
    pub unmatched: SensorGroup,
}

impl Default for GroupConfig {
    fn default() -> Self {
        Self {
            unmatched: SensorGroup::Environmental,
        }
    }
}
