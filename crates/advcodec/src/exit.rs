use std::fmt;
use std::io;

use advcodec_profile::ProfileError;
use advcodec_wire::CodecError;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const NOT_FOUND: i32 = 2;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::NotFound => NOT_FOUND,
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        _ => FAILURE,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn codec_error(context: &str, err: CodecError) -> CliError {
    CliError::new(DATA_INVALID, format!("{context}: {err}"))
}

pub fn profile_error(context: &str, err: ProfileError) -> CliError {
    match err {
        ProfileError::Codec(err) => codec_error(context, err),
        ProfileError::Json(_) | ProfileError::NotAnObject => {
            CliError::new(DATA_INVALID, format!("{context}: {err}"))
        }
        ProfileError::UnknownProfile(_) | ProfileError::UnknownAux { .. } => {
            CliError::new(NOT_FOUND, format!("{context}: {err}"))
        }
        ProfileError::UnknownGroup(_) => CliError::new(USAGE, format!("{context}: {err}")),
        other => CliError::new(INTERNAL, format!("{context}: {other}")),
    }
}
