use serde::{Deserialize, Serialize};

use crate::wire_type::WireType;

/// A named, typed, offset-addressed, scaled value within a payload.
///
/// `offset` is relative to the start of the payload, which for identified
/// formats begins after the 2-byte identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    pub offset: usize,
    pub wire_type: WireType,
    /// Multiplier from the wire value to the physical value.
    pub scale: f64,
    /// Informational only.
    pub unit: String,
}

impl FieldDescriptor {
    /// Create a field with scale 1.0 and no unit.
    pub fn new(name: impl Into<String>, offset: usize, wire_type: WireType) -> Self {
        Self {
            name: name.into(),
            offset,
            wire_type,
            scale: 1.0,
            unit: String::new(),
        }
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }

    /// Width of the field on the wire.
    pub fn width(&self) -> usize {
        self.wire_type.width()
    }

    /// One past the last payload byte this field occupies.
    pub fn end(&self) -> usize {
        self.offset.saturating_add(self.width())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_and_builders() {
        let field = FieldDescriptor::new("temperature", 1, WireType::I16_BE)
            .with_scale(0.01)
            .with_unit("°C");

        assert_eq!(field.name, "temperature");
        assert_eq!(field.scale, 0.01);
        assert_eq!(field.unit, "°C");
        assert_eq!(field.end(), 3);

        let plain = FieldDescriptor::new("battery", 0, WireType::U8);
        assert_eq!(plain.scale, 1.0);
        assert!(plain.unit.is_empty());
    }
}
