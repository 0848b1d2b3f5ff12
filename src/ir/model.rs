//! Core dataset model for the training JSON.
//!
//! The model mirrors the three output documents: a list of image paths,
//! a parallel list of per-image annotation records, and the label map
//! (see [`LabelMap`](super::LabelMap)).

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::bbox::PixelBox;
use super::ids::LabelId;
use crate::error::BuilderError;

/// Objects annotated on one image.
///
/// Three parallel sequences, one entry per object. They only grow through
/// [`AnnotationRecord::push`], so their lengths always match.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationRecord {
    boxes: Vec<PixelBox>,
    labels: Vec<LabelId>,
    difficulties: Vec<u8>,
}

impl AnnotationRecord {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one object.
    pub fn push(&mut self, bbox: PixelBox, label: LabelId, difficult: bool) {
        self.boxes.push(bbox);
        self.labels.push(label);
        self.difficulties.push(u8::from(difficult));
    }

    /// Number of objects in the record.
    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    /// True if the image has no annotated objects.
    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    pub fn boxes(&self) -> &[PixelBox] {
        &self.boxes
    }

    pub fn labels(&self) -> &[LabelId] {
        &self.labels
    }

    /// Difficulty flags, 0 or 1.
    pub fn difficulties(&self) -> &[u8] {
        &self.difficulties
    }
}

/// Image paths paired with their annotation records.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Dataset {
    /// Absolute image paths, in assembly order.
    pub images: Vec<PathBuf>,

    /// One record per entry of `images`.
    pub records: Vec<AnnotationRecord>,
}

impl Dataset {
    /// Adds one image and its record.
    pub fn push(&mut self, image: PathBuf, record: AnnotationRecord) {
        self.images.push(image);
        self.records.push(record);
    }

    /// Number of images.
    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Total number of objects across every record.
    pub fn object_count(&self) -> usize {
        self.records.iter().map(AnnotationRecord::len).sum()
    }

    /// Fails if the image list and the record list have drifted apart.
    pub fn ensure_in_sync(&self) -> Result<(), BuilderError> {
        if self.images.len() != self.records.len() {
            return Err(BuilderError::DatasetInvariant {
                images: self.images.len(),
                records: self.records.len(),
            });
        }
        Ok(())
    }
}
