//! Declared sizes and offsets, resolved against a reference extent during layout.

use std::{
    fmt::{self, Display},
    hash::{Hash, Hasher},
};

use crate::hasher::fnv1a_64;

/// The pixel value that [`Size::Max`] resolves to.
pub const UNCONSTRAINED: f64 = f64::MAX;

#[inline]
fn hash_parts(tag: u8, a: f64, b: f64) -> u64 {
    let h = fnv1a_64(None, &[tag]);
    let h = fnv1a_64(Some(h), &a.to_bits().to_le_bytes());
    fnv1a_64(Some(h), &b.to_bits().to_le_bytes())
}

// ---------- Size ----------

/// A declared width or height.
///
/// Percentages are fractions of the reference node's content extent, so `0.5` is half.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Size {
    Pixels(f64),
    Percentage { fraction: f64, offset: f64 },
    /// No constraint. Used as the default max-width and max-height.
    Max,
}

impl Eq for Size {}

impl Default for Size {
    fn default() -> Self {
        Size::Pixels(0.0)
    }
}

impl Size {
    pub const ZERO: Size = Size::Pixels(0.0);

    /// The full reference extent.
    pub const FULL: Size = Size::Percentage { fraction: 1.0, offset: 0.0 };

    pub const fn px(value: f64) -> Self {
        Size::Pixels(value)
    }

    pub const fn percentage(fraction: f64) -> Self {
        Size::Percentage { fraction, offset: 0.0 }
    }

    /// A percentage plus a fixed pixel adjustment, such as `100% - 20px`.
    pub const fn percentage_offset(fraction: f64, offset: f64) -> Self {
        Size::Percentage { fraction, offset }
    }

    /// Resolves to pixels given the extent percentages are relative to.
    #[inline]
    pub fn to_pixels(&self, reference: f64) -> f64 {
        match *self {
            Size::Pixels(px) => px,
            Size::Percentage { fraction, offset } => reference * fraction + offset,
            Size::Max => UNCONSTRAINED,
        }
    }

    /// A 64-bit hash that is equal for equal descriptors.
    pub fn hash64(&self) -> u64 {
        match *self {
            Size::Pixels(px) => hash_parts(0, px, 0.0),
            Size::Percentage { fraction, offset } => hash_parts(1, fraction, offset),
            Size::Max => hash_parts(2, 0.0, 0.0),
        }
    }
}

impl Hash for Size {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash64());
    }
}

impl Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Size::Pixels(v) => write!(f, "{v}px"),
            Size::Percentage { fraction, offset } if offset == 0.0 => write!(f, "{}%", fraction * 100.0),
            Size::Percentage { fraction, offset } => write!(f, "{}%{offset:+}px", fraction * 100.0),
            Size::Max => f.write_str("max"),
        }
    }
}

impl From<f64> for Size {
    fn from(value: f64) -> Self {
        Self::Pixels(value)
    }
}

impl From<f32> for Size {
    fn from(value: f32) -> Self {
        Self::Pixels(value as f64)
    }
}

impl From<i32> for Size {
    fn from(value: i32) -> Self {
        Self::Pixels(value as f64)
    }
}

// ---------- Offset ----------

/// A declared position, margin, or padding.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Offset {
    Pixels(f64),
    Percentage { fraction: f64, offset: f64 },
}

impl Eq for Offset {}

impl Default for Offset {
    fn default() -> Self {
        Offset::Pixels(0.0)
    }
}

impl Offset {
    pub const ZERO: Offset = Offset::Pixels(0.0);

    pub const fn px(value: f64) -> Self {
        Offset::Pixels(value)
    }

    pub const fn percentage(fraction: f64) -> Self {
        Offset::Percentage { fraction, offset: 0.0 }
    }

    pub const fn percentage_offset(fraction: f64, offset: f64) -> Self {
        Offset::Percentage { fraction, offset }
    }

    #[inline]
    pub fn to_pixels(&self, reference: f64) -> f64 {
        match *self {
            Offset::Pixels(px) => px,
            Offset::Percentage { fraction, offset } => reference * fraction + offset,
        }
    }

    pub fn hash64(&self) -> u64 {
        match *self {
            Offset::Pixels(px) => hash_parts(0, px, 0.0),
            Offset::Percentage { fraction, offset } => hash_parts(1, fraction, offset),
        }
    }
}

impl Hash for Offset {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash64());
    }
}

impl Display for Offset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Offset::Pixels(v) => write!(f, "{v}px"),
            Offset::Percentage { fraction, offset } if offset == 0.0 => write!(f, "{}%", fraction * 100.0),
            Offset::Percentage { fraction, offset } => write!(f, "{}%{offset:+}px", fraction * 100.0),
        }
    }
}

impl From<f64> for Offset {
    fn from(value: f64) -> Self {
        Self::Pixels(value)
    }
}

impl From<f32> for Offset {
    fn from(value: f32) -> Self {
        Self::Pixels(value as f64)
    }
}

impl From<i32> for Offset {
    fn from(value: i32) -> Self {
        Self::Pixels(value as f64)
    }
}
