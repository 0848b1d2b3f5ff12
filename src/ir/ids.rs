//! Newtype ID for label map entries.
//!
//! Labels are written to the training JSON as bare integers, so the newtype
//! is `#[serde(transparent)]` and only exists to keep label ids from being
//! mixed up with box coordinates or counts.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A dense, non-negative class id. `LabelId::BACKGROUND` is always 0.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelId(pub u32);

impl LabelId {
    /// The id reserved for the background class.
    pub const BACKGROUND: LabelId = LabelId(0);

    /// Creates a new LabelId.
    #[inline]
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the underlying u32 value.
    #[inline]
    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl From<u32> for LabelId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl fmt::Debug for LabelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LabelId({})", self.0)
    }
}

impl fmt::Display for LabelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
