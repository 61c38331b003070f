use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::FormatError;
use crate::field::FieldDescriptor;

/// Size of the leading identifier of an identified format.
pub const IDENTIFIER_LEN: usize = 2;

/// Whether a payload is prefixed by a 16-bit identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum FormatKind {
    /// `[identifier: u16 LE][payload]`; fields are addressed from byte 2.
    Identified { identifier: u16 },
    /// `[payload]`; fields are addressed from byte 0.
    Raw,
}

/// The full byte-layout contract for one kind of payload.
///
/// ```text
/// Identified:
/// ┌──────────────────┬──────────────────────────────────┐
/// │ Identifier (2B)  │ Payload (total_length bytes)     │
/// │ u16 LE           │ fields at their declared offsets │
/// └──────────────────┴──────────────────────────────────┘
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Format {
    kind: FormatKind,
    fields: Vec<FieldDescriptor>,
    total_length: usize,
    description: String,
}

impl Format {
    /// An identifier-prefixed format. `total_length` excludes the identifier.
    pub fn identified(identifier: u16, total_length: usize) -> Self {
        Self::with_kind(FormatKind::Identified { identifier }, total_length)
    }

    /// A format without identifier.
    pub fn raw(total_length: usize) -> Self {
        Self::with_kind(FormatKind::Raw, total_length)
    }

    fn with_kind(kind: FormatKind, total_length: usize) -> Self {
        Self {
            kind,
            fields: Vec::new(),
            total_length,
            description: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Append a field.
    pub fn with_field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    /// Append several fields, keeping their order.
    pub fn with_fields(mut self, fields: impl IntoIterator<Item = FieldDescriptor>) -> Self {
        self.fields.extend(fields);
        self
    }

    pub fn kind(&self) -> FormatKind {
        self.kind
    }

    /// The identifier, for identified formats.
    pub fn identifier(&self) -> Option<u16> {
        match self.kind {
            FormatKind::Identified { identifier } => Some(identifier),
            FormatKind::Raw => None,
        }
    }

    pub fn is_identified(&self) -> bool {
        matches!(self.kind, FormatKind::Identified { .. })
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Declared payload length, excluding any identifier.
    pub fn total_length(&self) -> usize {
        self.total_length
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Bytes in front of the payload: 2 for identified formats, 0 otherwise.
    pub fn header_len(&self) -> usize {
        match self.kind {
            FormatKind::Identified { .. } => IDENTIFIER_LEN,
            FormatKind::Raw => 0,
        }
    }

    /// Exact length of an encoded buffer.
    pub fn wire_len(&self) -> usize {
        self.header_len() + self.total_length
    }

    /// Check the layout invariants.
    ///
    /// Decoding never calls this: a misconfigured field simply fails to
    /// decode when it falls outside the payload.
    pub fn validate(&self) -> Result<(), FormatError> {
        let mut seen = HashSet::with_capacity(self.fields.len());

        for field in &self.fields {
            if field.name.is_empty() {
                return Err(FormatError::EmptyName {
                    offset: field.offset,
                });
            }
            if !seen.insert(field.name.as_str()) {
                return Err(FormatError::DuplicateField(field.name.clone()));
            }
            if !field.scale.is_finite() || field.scale == 0.0 {
                return Err(FormatError::InvalidScale {
                    name: field.name.clone(),
                    scale: field.scale,
                });
            }
            if field.end() > self.total_length {
                return Err(FormatError::FieldOutOfRange {
                    name: field.name.clone(),
                    offset: field.offset,
                    end: field.end(),
                    total_length: self.total_length,
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire_type::WireType;

    fn sample() -> Format {
        Format::identified(0x1001, 3)
            .with_description("sample")
            .with_field(FieldDescriptor::new("battery", 0, WireType::U8))
            .with_field(FieldDescriptor::new("temperature", 1, WireType::I16_BE).with_scale(0.01))
    }

    #[test]
    fn identified_lengths() {
        let format = sample();
        assert_eq!(format.identifier(), Some(0x1001));
        assert!(format.is_identified());
        assert_eq!(format.header_len(), IDENTIFIER_LEN);
        assert_eq!(format.wire_len(), 5);
        assert_eq!(format.description(), "sample");
    }

    #[test]
    fn raw_lengths() {
        let format = Format::raw(8);
        assert_eq!(format.identifier(), None);
        assert_eq!(format.header_len(), 0);
        assert_eq!(format.wire_len(), 8);
    }

    #[test]
    fn field_lookup() {
        let format = sample();
        assert_eq!(format.field("temperature").map(|f| f.offset), Some(1));
        assert!(format.field("humidity").is_none());
    }

    #[test]
    fn valid_format_passes() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn duplicate_field_rejected() {
        let format = sample().with_field(FieldDescriptor::new("battery", 2, WireType::U8));
        assert_eq!(
            format.validate(),
            Err(FormatError::DuplicateField("battery".to_string()))
        );
    }

    #[test]
    fn field_past_total_length_rejected() {
        let format = Format::raw(3)
            .with_field(FieldDescriptor::new("pressure", 1, WireType::U32_BE));
        assert!(matches!(
            format.validate(),
            Err(FormatError::FieldOutOfRange { end: 5, total_length: 3, .. })
        ));
    }

    #[test]
    fn zero_and_nan_scale_rejected() {
        let zero = Format::raw(1)
            .with_field(FieldDescriptor::new("x", 0, WireType::U8).with_scale(0.0));
        assert!(matches!(zero.validate(), Err(FormatError::InvalidScale { .. })));

        let nan = Format::raw(1)
            .with_field(FieldDescriptor::new("x", 0, WireType::U8).with_scale(f64::NAN));
        assert!(matches!(nan.validate(), Err(FormatError::InvalidScale { .. })));
    }

    #[test]
    fn empty_name_rejected() {
        let format = Format::raw(1).with_field(FieldDescriptor::new("", 0, WireType::U8));
        assert_eq!(format.validate(), Err(FormatError::EmptyName { offset: 0 }));
    }
}
