//! Integer pixel bounding boxes in XYXY order.

use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box `[xmin, ymin, xmax, ymax]` in zero-based
/// pixel coordinates.
///
/// Note: This type does NOT enforce that min < max. Source annotations are
/// passed through as-is; malformed boxes stay representable.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PixelBox {
    pub xmin: i64,
    pub ymin: i64,
    pub xmax: i64,
    pub ymax: i64,
}

impl PixelBox {
    /// Creates a new box from zero-based coordinates.
    #[inline]
    pub fn from_xyxy(xmin: i64, ymin: i64, xmax: i64, ymax: i64) -> Self {
        Self {
            xmin,
            ymin,
            xmax,
            ymax,
        }
    }

    /// Creates a box from one-based coordinates (the VOC convention),
    /// shifting every coordinate down by one. `None` if a shift overflows.
    #[inline]
    pub fn from_one_based(xmin: i64, ymin: i64, xmax: i64, ymax: i64) -> Option<Self> {
        Some(Self::from_xyxy(
            xmin.checked_sub(1)?,
            ymin.checked_sub(1)?,
            xmax.checked_sub(1)?,
            ymax.checked_sub(1)?,
        ))
    }

    /// Returns the coordinates in output order.
    #[inline]
    pub fn to_array(&self) -> [i64; 4] {
        [self.xmin, self.ymin, self.xmax, self.ymax]
    }
}

impl From<[i64; 4]> for PixelBox {
    fn from([xmin, ymin, xmax, ymax]: [i64; 4]) -> Self {
        Self::from_xyxy(xmin, ymin, xmax, ymax)
    }
}

impl std::fmt::Debug for PixelBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.to_array()).finish()
    }
}

// Written as a bare 4-element array, which is what the training loaders read.
impl Serialize for PixelBox {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_array().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PixelBox {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let coords = <[i64; 4]>::deserialize(deserializer)?;
        Ok(PixelBox::from(coords))
    }
}
