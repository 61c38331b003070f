/// Errors that abort a decode.
///
/// Per-field problems (a field past the end of the payload, a value missing
/// at encode time) are tolerated and never surface here.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// The leading identifier does not belong to the requested format.
    #[error("format mismatch (expected identifier 0x{expected:04X}, found 0x{found:04X})")]
    FormatMismatch { expected: u16, found: u16 },

    /// The buffer cannot hold the identifier or the declared payload length.
    #[error("buffer too short ({len} bytes, need {required})")]
    TooShort { len: usize, required: usize },
}

/// Configuration errors found when validating a [`Format`](crate::Format).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FormatError {
    /// A field was declared without a name.
    #[error("field at offset {offset} has an empty name")]
    EmptyName { offset: usize },

    /// Two fields share a name.
    #[error("duplicate field name: {0}")]
    DuplicateField(String),

    /// A field extends past the declared payload length.
    #[error("field {name} spans bytes {offset}..{end}, beyond total length {total_length}")]
    FieldOutOfRange {
        name: String,
        offset: usize,
        end: usize,
        total_length: usize,
    },

    /// The scale is zero, NaN or infinite, so encoding cannot invert it.
    #[error("field {name} has unusable scale {scale}")]
    InvalidScale { name: String, scale: f64 },
}

pub type Result<T> = std::result::Result<T, CodecError>;
