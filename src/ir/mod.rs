//! In-memory representation of a training dataset.
//!
//! A build collects everything here before any file is written:
//! - [`Dataset`]: image paths plus one [`AnnotationRecord`] per image
//! - [`LabelMap`]: class name to [`LabelId`], with `background` = 0
//! - [`PixelBox`]: zero-based integer `[xmin, ymin, xmax, ymax]`
//!
//! # Example
//!
//! ```
//! use databuilder::ir::{AnnotationRecord, Dataset, LabelMap, PixelBox};
//!
//! let labels = LabelMap::voc();
//! let mut record = AnnotationRecord::new();
//! record.push(
//!     PixelBox::from_one_based(10, 20, 110, 220).unwrap(),
//!     labels.get("car").unwrap(),
//!     false,
//! );
//!
//! let mut dataset = Dataset::default();
//! dataset.push("/data/VOC2007/JPEGImages/img1.jpg".into(), record);
//! assert_eq!(dataset.object_count(), 1);
//! ```

mod bbox;
mod ids;
pub mod io_json;
pub mod io_voc_xml;
mod label_map;
mod model;

// Re-export core types for convenient access
pub use bbox::PixelBox;
pub use ids::LabelId;
pub use label_map::{normalize_label, LabelMap, BACKGROUND, DOKKI_TOTAL, VOC_CLASSES};
pub use model::{AnnotationRecord, Dataset};
