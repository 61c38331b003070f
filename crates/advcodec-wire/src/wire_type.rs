//! On-wire scalar representations.
//!
//! A [`WireType`] is the pair (scalar kind, byte order). Widths are fixed per
//! kind: 1 byte for `U8`/`I8`, 2 for `U16`/`I16`, 4 for `U32`/`I32`/`F32`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Width, signedness and float-ness of a wire value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarKind {
    U8,
    I8,
    U16,
    I16,
    U32,
    I32,
    /// IEEE-754 binary32.
    F32,
}

impl ScalarKind {
    /// Width in bytes.
    pub const fn width(self) -> usize {
        match self {
            ScalarKind::U8 | ScalarKind::I8 => 1,
            ScalarKind::U16 | ScalarKind::I16 => 2,
            ScalarKind::U32 | ScalarKind::I32 | ScalarKind::F32 => 4,
        }
    }

    /// Returns true for the two's-complement kinds.
    pub const fn is_signed(self) -> bool {
        matches!(self, ScalarKind::I8 | ScalarKind::I16 | ScalarKind::I32)
    }

    pub const fn is_float(self) -> bool {
        matches!(self, ScalarKind::F32)
    }

    /// Inclusive range of representable wire values; `None` for floats.
    pub fn bounds(self) -> Option<(f64, f64)> {
        if self.is_float() {
            return None;
        }
        let bits = (self.width() * 8) as i32;
        if self.is_signed() {
            let half = 2f64.powi(bits - 1);
            Some((-half, half - 1.0))
        } else {
            Some((0.0, 2f64.powi(bits) - 1.0))
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            ScalarKind::U8 => "u8",
            ScalarKind::I8 => "i8",
            ScalarKind::U16 => "u16",
            ScalarKind::I16 => "i16",
            ScalarKind::U32 => "u32",
            ScalarKind::I32 => "i32",
            ScalarKind::F32 => "f32",
        }
    }
}

/// Byte order of a multi-byte wire value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ByteOrder {
    Little,
    Big,
}

/// A scalar kind carried in a specific byte order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WireType {
    pub kind: ScalarKind,
    pub order: ByteOrder,
}

impl WireType {
    pub const U8: Self = Self::new(ScalarKind::U8, ByteOrder::Little);
    pub const I8: Self = Self::new(ScalarKind::I8, ByteOrder::Little);
    pub const U16_LE: Self = Self::new(ScalarKind::U16, ByteOrder::Little);
    pub const U16_BE: Self = Self::new(ScalarKind::U16, ByteOrder::Big);
    pub const I16_LE: Self = Self::new(ScalarKind::I16, ByteOrder::Little);
    pub const I16_BE: Self = Self::new(ScalarKind::I16, ByteOrder::Big);
    pub const U32_LE: Self = Self::new(ScalarKind::U32, ByteOrder::Little);
    pub const U32_BE: Self = Self::new(ScalarKind::U32, ByteOrder::Big);
    pub const I32_LE: Self = Self::new(ScalarKind::I32, ByteOrder::Little);
    pub const I32_BE: Self = Self::new(ScalarKind::I32, ByteOrder::Big);
    pub const F32_LE: Self = Self::new(ScalarKind::F32, ByteOrder::Little);
    pub const F32_BE: Self = Self::new(ScalarKind::F32, ByteOrder::Big);

    pub const fn new(kind: ScalarKind, order: ByteOrder) -> Self {
        Self { kind, order }
    }

    /// Width in bytes.
    pub const fn width(self) -> usize {
        self.kind.width()
    }
}

impl fmt::Display for WireType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Byte order is meaningless for single-byte kinds.
        if self.width() == 1 {
            return f.write_str(self.kind.name());
        }
        let suffix = match self.order {
            ByteOrder::Little => "le",
            ByteOrder::Big => "be",
        };
        write!(f, "{}{}", self.kind.name(), suffix)
    }
}
