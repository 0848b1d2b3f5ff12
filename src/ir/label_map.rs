//! Class name to label id mapping.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::ids::LabelId;

/// Name of the class that always maps to id 0.
pub const BACKGROUND: &str = "background";

/// The 20 Pascal VOC object classes, in id order (ids 1..=20).
pub const VOC_CLASSES: [&str; 20] = [
    "aeroplane",
    "bicycle",
    "bird",
    "boat",
    "bottle",
    "bus",
    "car",
    "cat",
    "chair",
    "cow",
    "diningtable",
    "dog",
    "horse",
    "motorbike",
    "person",
    "pottedplant",
    "sheep",
    "sofa",
    "train",
    "tvmonitor",
];

/// The single Dokki class (the invoice total region).
pub const DOKKI_TOTAL: &str = "total";

/// Mapping from normalized class name to label id.
///
/// Names are stored lowercase and trimmed. `background` is always present
/// with id 0; the remaining classes get dense ids starting at 1 in the order
/// they were given.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelMap {
    ids: BTreeMap<String, LabelId>,
}

impl LabelMap {
    /// Builds a label map from class names. Ids are assigned by position,
    /// starting at 1; `background` is then forced to 0.
    pub fn from_classes<I, S>(classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut ids: BTreeMap<String, LabelId> = classes
            .into_iter()
            .enumerate()
            .map(|(idx, name)| (normalize_label(name.as_ref()), LabelId((idx + 1) as u32)))
            .collect();
        ids.insert(BACKGROUND.to_string(), LabelId::BACKGROUND);
        Self { ids }
    }

    /// The Pascal VOC label map: 20 classes plus background.
    pub fn voc() -> Self {
        Self::from_classes(VOC_CLASSES)
    }

    /// The Dokki label map: `total` plus background.
    pub fn dokki() -> Self {
        Self::from_classes([DOKKI_TOTAL])
    }

    /// Looks up a raw class name, normalizing it first.
    pub fn get(&self, name: &str) -> Option<LabelId> {
        self.ids.get(&normalize_label(name)).copied()
    }

    /// Returns true if the (normalized) name is a known class.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Number of entries, background included.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Always false: background is always present.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Iterates entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, LabelId)> {
        self.ids.iter().map(|(name, id)| (name.as_str(), *id))
    }
}

/// Lowercases and trims a class name.
pub fn normalize_label(name: &str) -> String {
    name.trim().to_lowercase()
}
