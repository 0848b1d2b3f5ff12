//! The conversion pipeline.
//!
//! Every format runs the same steps: stage the archive, enumerate image
//! ids, annotate each id, assemble image paths with their records, and
//! export the training JSON. A [`DatasetProfile`] supplies the parts that
//! differ per format; [`DatasetBuilder`] runs the steps.

pub mod report;

pub use report::BuildReport;

use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::error::BuilderError;
use crate::ir::io_json::write_training_json;
use crate::ir::{Dataset, LabelMap};
use crate::source::{
    AnnotationSource, DirectoryIds, ImageIdSource, ManifestIds, SyntheticAnnotations,
    VocXmlAnnotations,
};
use crate::stage::{stage_archive, voc_year_from_archive, ArchiveExtractor, Extractor, StageOutcome};

/// How an image id maps to an image file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImageLocation {
    /// `<dataset_dir>/<id>`
    Verbatim,
    /// `<dataset_dir>/<dir>/<id>.<extension>`
    InDir { dir: PathBuf, extension: String },
}

/// What to do with images whose record ends up with no objects.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EmptyImages {
    Keep,
    Skip,
}

/// Everything that distinguishes one dataset format from another.
pub struct DatasetProfile {
    name: String,
    root: PathBuf,
    labels: LabelMap,
    ids: Box<dyn ImageIdSource>,
    annotations: Box<dyn AnnotationSource>,
    images: ImageLocation,
    empty_images: EmptyImages,
}

impl DatasetProfile {
    /// Creates a profile. `root` is the dataset directory relative to the
    /// output directory, as laid out by the archive.
    ///
    /// Images default to [`ImageLocation::Verbatim`] and
    /// [`EmptyImages::Keep`].
    pub fn new(
        name: impl Into<String>,
        root: impl Into<PathBuf>,
        labels: LabelMap,
        ids: impl ImageIdSource + 'static,
        annotations: impl AnnotationSource + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            root: root.into(),
            labels,
            ids: Box::new(ids),
            annotations: Box::new(annotations),
            images: ImageLocation::Verbatim,
            empty_images: EmptyImages::Keep,
        }
    }

    pub fn with_image_location(mut self, images: ImageLocation) -> Self {
        self.images = images;
        self
    }

    pub fn with_empty_images(mut self, empty_images: EmptyImages) -> Self {
        self.empty_images = empty_images;
        self
    }

    /// Pascal VOC for the given year (`VOCdevkit/VOC<year>`).
    pub fn voc(year: &str) -> Self {
        Self::new(
            "voc",
            Path::new("VOCdevkit").join(format!("VOC{year}")),
            LabelMap::voc(),
            ManifestIds::new(ManifestIds::VOC_TRAINVAL),
            VocXmlAnnotations::default(),
        )
        .with_image_location(ImageLocation::InDir {
            dir: PathBuf::from("JPEGImages"),
            extension: "jpg".to_string(),
        })
        .with_empty_images(EmptyImages::Skip)
    }

    /// Dokki invoice images (`output/`), each with the synthetic total box.
    pub fn dokki() -> Self {
        Self::new(
            "dokki",
            "output",
            LabelMap::dokki(),
            DirectoryIds,
            SyntheticAnnotations::dokki_total(),
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Dataset directory relative to the output directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn labels(&self) -> &LabelMap {
        &self.labels
    }

    /// Resolves the image file for `image_id`.
    pub fn image_path(&self, dataset_dir: &Path, image_id: &str) -> PathBuf {
        match &self.images {
            ImageLocation::Verbatim => dataset_dir.join(image_id),
            ImageLocation::InDir { dir, extension } => {
                dataset_dir.join(dir).join(format!("{image_id}.{extension}"))
            }
        }
    }

    /// Annotates each id and pairs it with its image path.
    ///
    /// Unknown labels are counted into `report`; with [`EmptyImages::Skip`]
    /// images left without objects are dropped from both lists.
    pub fn assemble(
        &self,
        dataset_dir: &Path,
        image_ids: &[String],
        report: &mut BuildReport,
    ) -> Result<Dataset, BuilderError> {
        let mut dataset = Dataset::default();

        for image_id in image_ids {
            let annotated = self
                .annotations
                .annotate(dataset_dir, image_id, &self.labels)?;

            if !annotated.discarded.is_empty() {
                warn!(
                    "Dropping {} object(s) with unknown label(s) in {}: {}",
                    annotated.discarded.len(),
                    image_id,
                    annotated.discarded.join(", ")
                );
                for label in annotated.discarded {
                    report.discard(label);
                }
            }

            if annotated.record.is_empty() && self.empty_images == EmptyImages::Skip {
                debug!("Skipping {image_id}: no known objects");
                report.skipped_empty_images += 1;
                continue;
            }

            dataset.push(self.image_path(dataset_dir, image_id), annotated.record);
        }

        dataset.ensure_in_sync()?;
        Ok(dataset)
    }
}

impl std::fmt::Debug for DatasetProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatasetProfile")
            .field("name", &self.name)
            .field("root", &self.root)
            .field("labels", &self.labels)
            .field("images", &self.images)
            .field("empty_images", &self.empty_images)
            .finish_non_exhaustive()
    }
}

/// Converts one staged dataset into training JSON.
///
/// Construction stages the archive; [`DatasetBuilder::build`] runs the
/// rest of the pipeline and writes the output files.
#[derive(Debug)]
pub struct DatasetBuilder {
    output_dir: PathBuf,
    dataset_dir: PathBuf,
    profile: DatasetProfile,
    staged: StageOutcome,
}

impl DatasetBuilder {
    /// Stages `archive` into `output_dir` with the default extractor.
    pub fn new(
        archive: &Path,
        output_dir: &Path,
        profile: DatasetProfile,
    ) -> Result<Self, BuilderError> {
        Self::with_extractor(archive, output_dir, profile, &ArchiveExtractor)
    }

    /// Stages `archive` into `output_dir` with a custom extractor.
    pub fn with_extractor(
        archive: &Path,
        output_dir: &Path,
        profile: DatasetProfile,
        extractor: &dyn Extractor,
    ) -> Result<Self, BuilderError> {
        let output_dir = std::path::absolute(output_dir).map_err(BuilderError::Io)?;
        let dataset_dir = output_dir.join(profile.root());
        let staged = stage_archive(archive, &output_dir, &dataset_dir, extractor)?;

        Ok(Self {
            output_dir,
            dataset_dir,
            profile,
            staged,
        })
    }

    /// Pascal VOC, with the year taken from the archive name.
    pub fn voc(archive: &Path, output_dir: &Path) -> Result<Self, BuilderError> {
        let year = voc_year_from_archive(archive)?;
        Self::new(archive, output_dir, DatasetProfile::voc(&year))
    }

    /// Dokki invoice images.
    pub fn dokki(archive: &Path, output_dir: &Path) -> Result<Self, BuilderError> {
        Self::new(archive, output_dir, DatasetProfile::dokki())
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn dataset_dir(&self) -> &Path {
        &self.dataset_dir
    }

    pub fn profile(&self) -> &DatasetProfile {
        &self.profile
    }

    /// Reads the staged dataset into memory without writing anything.
    pub fn load(&self) -> Result<(Dataset, BuildReport), BuilderError> {
        let mut report = BuildReport::new(self.profile.name(), &self.dataset_dir);
        report.extracted = self.staged == StageOutcome::Extracted;

        let image_ids = self.profile.ids.image_ids(&self.dataset_dir)?;
        report.image_ids = image_ids.len();

        let dataset = self
            .profile
            .assemble(&self.dataset_dir, &image_ids, &mut report)?;
        report.images = dataset.len();
        report.objects = dataset.object_count();

        if report.discarded_objects() > 0 {
            warn!(
                "Dropped {} object(s) with labels outside the label map",
                report.discarded_objects()
            );
        }
        info!(
            "There are {} training images containing a total of {} objects",
            report.images, report.objects
        );

        Ok((dataset, report))
    }

    /// Runs the pipeline and writes the training JSON into the output
    /// directory, replacing the files of any previous run.
    pub fn build(&self) -> Result<BuildReport, BuilderError> {
        let (dataset, mut report) = self.load()?;
        let files = write_training_json(&self.output_dir, &dataset, self.profile.labels())?;
        report.files = Some(files);
        Ok(report)
    }
}
