//! Training JSON export.
//!
//! A build produces three documents in the output directory:
//! - `TRAIN_images.json`: array of absolute image paths
//! - `TRAIN_objects.json`: array of `{boxes, labels, difficulties}` records
//! - `label_map.json`: object mapping class name to label id
//!
//! All three are serialized to temporary files in the output directory
//! first and only then renamed over their targets, so a failed run never
//! leaves a mix of old and new documents behind.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use log::info;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tempfile::NamedTempFile;

use super::label_map::LabelMap;
use super::model::{AnnotationRecord, Dataset};
use crate::error::BuilderError;

pub const IMAGES_FILE: &str = "TRAIN_images.json";
pub const OBJECTS_FILE: &str = "TRAIN_objects.json";
pub const LABEL_MAP_FILE: &str = "label_map.json";

/// Paths of the documents written by [`write_training_json`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TrainingFiles {
    pub images: PathBuf,
    pub objects: PathBuf,
    pub label_map: PathBuf,
}

impl TrainingFiles {
    /// The document paths inside `output_dir`.
    pub fn in_dir(output_dir: &Path) -> Self {
        Self {
            images: output_dir.join(IMAGES_FILE),
            objects: output_dir.join(OBJECTS_FILE),
            label_map: output_dir.join(LABEL_MAP_FILE),
        }
    }
}

/// Writes the dataset and label map into `output_dir`, replacing any
/// documents left by a previous run.
///
/// # Errors
/// Returns an error if the dataset lists are out of sync, or if any
/// document cannot be serialized or moved into place.
pub fn write_training_json(
    output_dir: &Path,
    dataset: &Dataset,
    labels: &LabelMap,
) -> Result<TrainingFiles, BuilderError> {
    dataset.ensure_in_sync()?;
    fs::create_dir_all(output_dir).map_err(BuilderError::Io)?;

    let files = TrainingFiles::in_dir(output_dir);

    // Stage everything before touching the targets.
    let staged = [
        (stage_json(output_dir, &files.images, &dataset.images)?, &files.images),
        (stage_json(output_dir, &files.objects, &dataset.records)?, &files.objects),
        (stage_json(output_dir, &files.label_map, labels)?, &files.label_map),
    ];

    for (tmp, target) in staged {
        if target.exists() {
            info!("Replacing {}", target.display());
        } else {
            info!("Generating {}", target.display());
        }
        tmp.persist(target)
            .map_err(|source| BuilderError::JsonPersist {
                path: target.clone(),
                source: source.error,
            })?;
    }

    Ok(files)
}

/// Reads the three documents back from `output_dir`.
pub fn read_training_json(output_dir: &Path) -> Result<(Dataset, LabelMap), BuilderError> {
    let files = TrainingFiles::in_dir(output_dir);

    let images: Vec<PathBuf> = read_json(&files.images)?;
    let records: Vec<AnnotationRecord> = read_json(&files.objects)?;
    let labels: LabelMap = read_json(&files.label_map)?;

    let dataset = Dataset { images, records };
    dataset.ensure_in_sync()?;
    Ok((dataset, labels))
}

/// Serializes a dataset's annotation records to a JSON string.
///
/// Useful for testing without file I/O.
pub fn objects_to_json_string(dataset: &Dataset) -> Result<String, serde_json::Error> {
    serde_json::to_string(&dataset.records)
}

fn stage_json<T: Serialize + ?Sized>(
    dir: &Path,
    target: &Path,
    value: &T,
) -> Result<NamedTempFile, BuilderError> {
    let mut tmp = NamedTempFile::new_in(dir).map_err(BuilderError::Io)?;
    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        serde_json::to_writer(&mut writer, value).map_err(|source| BuilderError::JsonWrite {
            path: target.to_path_buf(),
            source,
        })?;
        writer.flush().map_err(BuilderError::Io)?;
    }
    Ok(tmp)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, BuilderError> {
    let file = File::open(path).map_err(BuilderError::Io)?;
    let reader = BufReader::new(file);

    serde_json::from_reader(reader).map_err(|source| BuilderError::JsonParse {
        path: path.to_path_buf(),
        source,
    })
}
