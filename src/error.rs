use std::path::PathBuf;
use thiserror::Error;

/// The main error type for dataset builds.
#[derive(Debug, Error)]
pub enum BuilderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to extract archive {path}: {message}")]
    ArchiveExtract { path: PathBuf, message: String },

    #[error("Unsupported archive {path} (supported: .tar, .tar.gz, .tgz, .tar.xz, .txz, .zip)")]
    UnsupportedArchive { path: PathBuf },

    #[error("Invalid archive name {path}: {message}")]
    InvalidArchiveName { path: PathBuf, message: String },

    #[error("Failed to read image id manifest {path}: {source}")]
    ManifestRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to list image directory {path}: {source}")]
    ImageDirRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse VOC XML from {path}: {message}")]
    VocXmlParse { path: PathBuf, message: String },

    #[error("Label '{label}' is not in the label map")]
    UnknownLabel { label: String },

    #[error("Failed to write JSON to {path}: {source}")]
    JsonWrite {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to parse JSON from {path}: {source}")]
    JsonParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to move staged JSON into {path}: {source}")]
    JsonPersist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Dataset is out of sync: {images} image path(s) but {records} annotation record(s)")]
    DatasetInvariant { images: usize, records: usize },
}
