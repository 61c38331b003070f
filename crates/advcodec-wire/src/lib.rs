//! Declarative field layouts and the encode/decode engine for advertising payloads.
//!
//! A [`Format`] is an ordered list of [`FieldDescriptor`]s plus a declared
//! payload length. Identified formats additionally carry a 2-byte
//! little-endian identifier in front of the payload:
//! - [`decode`] turns a buffer into a name → physical value mapping
//! - [`encode`] packs such a mapping back into an exact-length buffer
//!
//! Everything here is pure and allocation-light. No I/O.

pub mod codec;
pub mod error;
pub mod field;
pub mod format;
pub mod wire_type;


pub use codec::{decode, encode, encode_into, peek_identifier, DecodedValues};
pub use error::{CodecError, FormatError, Result};
pub use field::FieldDescriptor;
pub use format::{Format, FormatKind, IDENTIFIER_LEN};
pub use wire_type::{ByteOrder, ScalarKind, WireType};
