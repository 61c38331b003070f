use advcodec_wire::{CodecError, FormatError};

use crate::group::SensorGroup;

/// Errors raised while building registries or preparing codec input.
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    /// A format of the profile failed validation.
    #[error("invalid format in profile {profile}: {source}")]
    Format {
        profile: String,
        #[source]
        source: FormatError,
    },

    /// A profile with the same name is already registered.
    #[error("duplicate profile name: {0}")]
    DuplicateProfile(String),

    /// The primary format of a profile must carry an identifier.
    #[error("primary format of profile {0} has no identifier")]
    PrimaryNotIdentified(String),

    /// Auxiliary formats must not carry an identifier.
    #[error("auxiliary format {index} of profile {profile} carries an identifier")]
    AuxNotRaw { profile: String, index: usize },

    /// The profile has no auxiliary format at this index.
    #[error("profile {profile} has no auxiliary format {index}")]
    UnknownAux { profile: String, index: usize },

    /// No profile is registered under this name.
    #[error("unknown profile: {0}")]
    UnknownProfile(String),

    /// A sensor group has no canonical profile in the registry.
    #[error("no canonical profile for group {0}")]
    MissingCanonicalProfile(SensorGroup),

    /// A canonical profile does not use its group's reserved identifier.
    #[error(
        "profile {profile} for group {group} uses identifier 0x{found:04X}, expected 0x{expected:04X}"
    )]
    IdentifierMismatch {
        group: SensorGroup,
        profile: String,
        expected: u16,
        found: u16,
    },

    /// The name does not denote a sensor group.
    #[error("unknown sensor group: {0}")]
    UnknownGroup(String),

    /// JSON input was not an object.
    #[error("expected a JSON object")]
    NotAnObject,

    /// Decoding failed.
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    /// JSON serialization/deserialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ProfileError>;
