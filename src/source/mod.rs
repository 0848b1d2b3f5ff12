//! Pluggable pieces of a build.
//!
//! A dataset format differs from another only in where its image ids come
//! from and how an id turns into an annotation record. Both are traits so
//! the pipeline in [`crate::builder`] stays the same for every format:
//!
//! - [`ImageIdSource`]: [`ManifestIds`] (VOC `trainval.txt`) or
//!   [`DirectoryIds`] (one id per directory entry)
//! - [`AnnotationSource`]: [`VocXmlAnnotations`] (per-image XML documents)
//!   or [`SyntheticAnnotations`] (one fixed box for every image)

mod annotations;
mod ids;

use std::path::Path;

pub use annotations::{SyntheticAnnotations, VocXmlAnnotations};
pub use ids::{DirectoryIds, ManifestIds};

use crate::error::BuilderError;
use crate::ir::{AnnotationRecord, LabelMap};

/// Produces the ids of the images to process.
pub trait ImageIdSource {
    /// Lists image ids for the dataset rooted at `dataset_dir`.
    fn image_ids(&self, dataset_dir: &Path) -> Result<Vec<String>, BuilderError>;
}

/// Produces the annotation record for one image id.
pub trait AnnotationSource {
    fn annotate(
        &self,
        dataset_dir: &Path,
        image_id: &str,
        labels: &LabelMap,
    ) -> Result<Annotated, BuilderError>;
}

/// An annotation record plus the objects that could not be mapped.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Annotated {
    pub record: AnnotationRecord,
    /// Normalized class names with no entry in the label map, one per
    /// dropped object.
    pub discarded: Vec<String>,
}

impl From<AnnotationRecord> for Annotated {
    fn from(record: AnnotationRecord) -> Self {
        Self {
            record,
            discarded: Vec::new(),
        }
    }
}
