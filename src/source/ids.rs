use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};

use super::ImageIdSource;
use crate::error::BuilderError;

/// Reads ids from a newline-separated manifest file, relative to the
/// dataset directory. Lines are trimmed and blank lines skipped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ManifestIds {
    manifest: PathBuf,
}

impl ManifestIds {
    /// The VOC training manifest.
    pub const VOC_TRAINVAL: &'static str = "ImageSets/Main/trainval.txt";

    pub fn new(manifest: impl Into<PathBuf>) -> Self {
        Self {
            manifest: manifest.into(),
        }
    }

    /// Manifest path relative to the dataset directory.
    pub fn manifest(&self) -> &Path {
        &self.manifest
    }
}

impl ImageIdSource for ManifestIds {
    fn image_ids(&self, dataset_dir: &Path) -> Result<Vec<String>, BuilderError> {
        let path = dataset_dir.join(&self.manifest);
        info!("Loading image ids from {}", path.display());

        let contents = fs::read_to_string(&path)
            .map_err(|source| BuilderError::ManifestRead { path, source })?;

        let ids: Vec<String> = parse_manifest(&contents);
        info!("Total of {} image ids loaded", ids.len());
        Ok(ids)
    }
}

/// Splits manifest text into ids.
pub(crate) fn parse_manifest(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

/// Uses every entry of the dataset directory as an id, verbatim.
///
/// Entries are not filtered: hidden files and subdirectories become ids
/// too. Names that are not valid UTF-8 are skipped with a warning. Ids are
/// returned sorted by name.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DirectoryIds;

impl ImageIdSource for DirectoryIds {
    fn image_ids(&self, dataset_dir: &Path) -> Result<Vec<String>, BuilderError> {
        let dir_error = |source| BuilderError::ImageDirRead {
            path: dataset_dir.to_path_buf(),
            source,
        };

        let mut ids = Vec::new();
        for entry in fs::read_dir(dataset_dir).map_err(dir_error)? {
            let entry = entry.map_err(dir_error)?;
            match entry.file_name().into_string() {
                Ok(name) => ids.push(name),
                Err(name) => warn!(
                    "Skipping {}: file name is not valid UTF-8",
                    dataset_dir.join(name).display()
                ),
            }
        }
        ids.sort();

        info!("Total of {} image ids loaded", ids.len());
        Ok(ids)
    }
}
