//! Build report types.
//!
//! The report summarizes a build for the CLI: how many images and objects
//! made it into the training JSON, what was left out, and where the files
//! went.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use crate::ir::io_json::TrainingFiles;

/// Summary of one build.
#[derive(Clone, Debug, Default, Serialize)]
pub struct BuildReport {
    /// Dataset format name (`voc`, `dokki`, ...).
    pub format: String,
    /// Directory the dataset was read from.
    pub dataset_dir: PathBuf,
    /// True if this run extracted the archive, false if it was already staged.
    pub extracted: bool,
    /// Number of image ids enumerated.
    pub image_ids: usize,
    /// Images written to the training JSON.
    pub images: usize,
    /// Objects across all written images.
    pub objects: usize,
    /// Images left out because no object had a known label.
    pub skipped_empty_images: usize,
    /// Objects dropped per unknown label name.
    pub discarded_labels: BTreeMap<String, usize>,
    /// Written documents; `None` until the export has run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files: Option<TrainingFiles>,
}

impl BuildReport {
    /// Create an empty report for a dataset format.
    pub fn new(format: impl Into<String>, dataset_dir: impl Into<PathBuf>) -> Self {
        Self {
            format: format.into(),
            dataset_dir: dataset_dir.into(),
            ..Default::default()
        }
    }

    /// Records one object dropped for an unknown label.
    pub fn discard(&mut self, label: impl Into<String>) {
        *self.discarded_labels.entry(label.into()).or_default() += 1;
    }

    /// Total objects dropped for unknown labels.
    pub fn discarded_objects(&self) -> usize {
        self.discarded_labels.values().sum()
    }
}

impl fmt::Display for BuildReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Built {} dataset from {}", self.format, self.dataset_dir.display())?;
        if self.extracted {
            writeln!(f, "  archive extracted")?;
        }
        writeln!(
            f,
            "  {} image ids, {} images, {} objects",
            self.image_ids, self.images, self.objects
        )?;

        if self.skipped_empty_images > 0 {
            writeln!(
                f,
                "  skipped {} image(s) with no known objects",
                self.skipped_empty_images
            )?;
        }

        if !self.discarded_labels.is_empty() {
            writeln!(f)?;
            writeln!(
                f,
                "Unknown labels ({} object(s) dropped):",
                self.discarded_objects()
            )?;
            for (label, count) in &self.discarded_labels {
                writeln!(f, "  - {label}: {count}")?;
            }
        }

        if let Some(files) = &self.files {
            writeln!(f)?;
            writeln!(f, "Wrote:")?;
            for path in [&files.images, &files.objects, &files.label_map] {
                writeln!(f, "  {}", path.display())?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discard_counts_per_label() {
        let mut report = BuildReport::new("voc", "/data/VOC2007");
        report.discard("unicorn");
        report.discard("unicorn");
        report.discard("dragon");

        assert_eq!(report.discarded_labels["unicorn"], 2);
        assert_eq!(report.discarded_objects(), 3);
    }

    #[test]
    fn display_lists_counts_and_unknown_labels() {
        let mut report = BuildReport::new("voc", "/data/VOC2007");
        report.image_ids = 2;
        report.images = 1;
        report.objects = 1;
        report.skipped_empty_images = 1;
        report.discard("unicorn");

        let text = report.to_string();
        assert!(text.contains("2 image ids, 1 images, 1 objects"));
        assert!(text.contains("skipped 1 image(s)"));
        assert!(text.contains("- unicorn: 1"));
    }

    #[test]
    fn report_serializes_to_json() {
        let mut report = BuildReport::new("dokki", "/data/output");
        report.images = 2;
        report.objects = 2;

        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"format\":\"dokki\""));
        assert!(json.contains("\"objects\":2"));
        assert!(!json.contains("\"files\""));
    }
}
