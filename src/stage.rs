//! Archive staging.
//!
//! Before a build reads anything, the source archive must be expanded into
//! the output directory. Staging is idempotent: when the dataset directory
//! the archive would produce is already present, extraction is skipped.

use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::Path;

use log::info;

use crate::error::BuilderError;

/// Expands an archive into a directory.
pub trait Extractor {
    fn extract(&self, archive: &Path, destination: &Path) -> Result<(), BuilderError>;
}

/// Supported archive containers, detected by file suffix.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArchiveKind {
    Tar,
    TarGz,
    TarXz,
    Zip,
}

impl ArchiveKind {
    const SUFFIXES: [(&'static str, ArchiveKind); 6] = [
        (".tar.gz", ArchiveKind::TarGz),
        (".tar.xz", ArchiveKind::TarXz),
        (".tgz", ArchiveKind::TarGz),
        (".txz", ArchiveKind::TarXz),
        (".tar", ArchiveKind::Tar),
        (".zip", ArchiveKind::Zip),
    ];

    /// Detects the archive kind from a path's file name.
    pub fn from_path(path: &Path) -> Option<Self> {
        split_archive_name(path).map(|(_, kind)| kind)
    }
}

/// What staging did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StageOutcome {
    /// The dataset directory already existed; nothing was extracted.
    AlreadyStaged,
    /// The archive was extracted.
    Extracted,
}

/// The default extractor: tar, gzip/xz compressed tar, and zip.
#[derive(Clone, Copy, Debug, Default)]
pub struct ArchiveExtractor;

impl Extractor for ArchiveExtractor {
    fn extract(&self, archive: &Path, destination: &Path) -> Result<(), BuilderError> {
        let kind = ArchiveKind::from_path(archive).ok_or_else(|| {
            BuilderError::UnsupportedArchive {
                path: archive.to_path_buf(),
            }
        })?;

        fs::create_dir_all(destination).map_err(BuilderError::Io)?;

        let file = File::open(archive).map_err(|source| extract_error(archive, source))?;
        let reader = BufReader::new(file);

        match kind {
            ArchiveKind::Tar => unpack_tar(archive, reader, destination),
            ArchiveKind::TarGz => {
                unpack_tar(archive, flate2::read::GzDecoder::new(reader), destination)
            }
            ArchiveKind::TarXz => {
                unpack_tar(archive, xz2::read::XzDecoder::new(reader), destination)
            }
            ArchiveKind::Zip => {
                let mut zip = zip::ZipArchive::new(reader)
                    .map_err(|source| extract_error(archive, source))?;
                zip.extract(destination)
                    .map_err(|source| extract_error(archive, source))
            }
        }
    }
}

/// Ensures `dataset_dir` exists, extracting `archive` into `output_dir`
/// when it does not.
///
/// The archive is not touched at all when `dataset_dir` is already present.
pub fn stage_archive(
    archive: &Path,
    output_dir: &Path,
    dataset_dir: &Path,
    extractor: &dyn Extractor,
) -> Result<StageOutcome, BuilderError> {
    if dataset_dir.exists() {
        info!(
            "Dataset {} already extracted, skipping {}",
            dataset_dir.display(),
            archive.display()
        );
        return Ok(StageOutcome::AlreadyStaged);
    }

    info!(
        "Dataset {} not extracted yet. Extracting {} at {}",
        dataset_dir.display(),
        archive.display(),
        output_dir.display()
    );
    extractor.extract(archive, output_dir)?;
    Ok(StageOutcome::Extracted)
}

/// Reads the VOC year from an archive name such as
/// `VOCtrainval_06-Nov-2007.tar`: the last four characters before the
/// archive suffix.
pub fn voc_year_from_archive(archive: &Path) -> Result<String, BuilderError> {
    let invalid = |message: String| BuilderError::InvalidArchiveName {
        path: archive.to_path_buf(),
        message,
    };

    let (stem, _) = split_archive_name(archive)
        .ok_or_else(|| invalid("unrecognized archive suffix".to_string()))?;

    let chars: Vec<char> = stem.chars().collect();
    if chars.len() < 4 {
        return Err(invalid(format!("'{stem}' is too short to end in a year")));
    }

    let year: String = chars[chars.len() - 4..].iter().collect();
    if !year.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid(format!(
            "expected a 4-digit year before the suffix, found '{year}'"
        )));
    }

    Ok(year)
}

fn split_archive_name(path: &Path) -> Option<(String, ArchiveKind)> {
    let name = path.file_name()?.to_str()?;
    let lower = name.to_ascii_lowercase();

    ArchiveKind::SUFFIXES
        .iter()
        .find(|(suffix, _)| lower.ends_with(suffix))
        .map(|(suffix, kind)| (name[..name.len() - suffix.len()].to_string(), *kind))
}

fn unpack_tar<R: Read>(archive: &Path, reader: R, destination: &Path) -> Result<(), BuilderError> {
    tar::Archive::new(reader)
        .unpack(destination)
        .map_err(|source| extract_error(archive, source))
}

fn extract_error(archive: &Path, source: impl std::fmt::Display) -> BuilderError {
    BuilderError::ArchiveExtract {
        path: archive.to_path_buf(),
        message: source.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::path::PathBuf;

    /// Counts calls and creates the directory real extraction would.
    struct CountingExtractor {
        calls: Cell<usize>,
        creates: PathBuf,
    }

    impl Extractor for CountingExtractor {
        fn extract(&self, _archive: &Path, _destination: &Path) -> Result<(), BuilderError> {
            self.calls.set(self.calls.get() + 1);
            fs::create_dir_all(&self.creates).map_err(BuilderError::Io)
        }
    }

    #[test]
    fn archive_kind_detection() {
        assert_eq!(ArchiveKind::from_path(Path::new("a.tar")), Some(ArchiveKind::Tar));
        assert_eq!(ArchiveKind::from_path(Path::new("a.TAR.GZ")), Some(ArchiveKind::TarGz));
        assert_eq!(ArchiveKind::from_path(Path::new("a.tgz")), Some(ArchiveKind::TarGz));
        assert_eq!(ArchiveKind::from_path(Path::new("a.tar.xz")), Some(ArchiveKind::TarXz));
        assert_eq!(ArchiveKind::from_path(Path::new("a.zip")), Some(ArchiveKind::Zip));
        assert_eq!(ArchiveKind::from_path(Path::new("a.rar")), None);
    }

    #[test]
    fn year_is_read_before_suffix() {
        let year = voc_year_from_archive(Path::new("/d/VOCtrainval_06-Nov-2007.tar")).unwrap();
        assert_eq!(year, "2007");

        let year = voc_year_from_archive(Path::new("VOCtrainval_11-May-2012.tar.gz")).unwrap();
        assert_eq!(year, "2012");
    }

    #[test]
    fn year_must_be_digits() {
        let err = voc_year_from_archive(Path::new("VOCtrainval.tar")).unwrap_err();
        assert!(matches!(err, BuilderError::InvalidArchiveName { .. }));
        assert!(voc_year_from_archive(Path::new("VOC2007.rar")).is_err());
    }

    #[test]
    fn staging_extracts_at_most_once() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let dataset_dir = temp.path().join("output");
        let extractor = CountingExtractor {
            calls: Cell::new(0),
            creates: dataset_dir.clone(),
        };
        let archive = temp.path().join("dokki.tar.xz");

        let first = stage_archive(&archive, temp.path(), &dataset_dir, &extractor).unwrap();
        let second = stage_archive(&archive, temp.path(), &dataset_dir, &extractor).unwrap();

        assert_eq!(first, StageOutcome::Extracted);
        assert_eq!(second, StageOutcome::AlreadyStaged);
        assert_eq!(extractor.calls.get(), 1);
    }

    #[test]
    fn extracts_plain_tar() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let archive = temp.path().join("data.tar");
        {
            let file = File::create(&archive).expect("create archive");
            let mut builder = tar::Builder::new(file);
            let body = b"hello";
            let mut header = tar::Header::new_gnu();
            header.set_size(body.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder
                .append_data(&mut header, "output/a.png", &body[..])
                .expect("append entry");
            builder.finish().expect("finish archive");
        }

        let dest = temp.path().join("staged");
        ArchiveExtractor.extract(&archive, &dest).expect("extract");
        assert_eq!(fs::read(dest.join("output/a.png")).unwrap(), b"hello");
    }

    #[test]
    fn extracts_tar_gz() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let archive = temp.path().join("data.tar.gz");
        {
            let file = File::create(&archive).expect("create archive");
            let encoder = flate2::write::GzEncoder::new(file, flate2::Compression::default());
            let mut builder = tar::Builder::new(encoder);
            let body = b"gzipped";
            let mut header = tar::Header::new_gnu();
            header.set_size(body.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder
                .append_data(&mut header, "output/a.png", &body[..])
                .expect("append entry");
            builder
                .into_inner()
                .expect("finish archive")
                .finish()
                .expect("finish gzip stream");
        }

        let dest = temp.path().join("staged");
        ArchiveExtractor.extract(&archive, &dest).expect("extract");
        assert_eq!(fs::read(dest.join("output/a.png")).unwrap(), b"gzipped");
    }

    #[test]
    fn extracts_zip() {
        use std::io::Write;

        let temp = tempfile::tempdir().expect("create temp dir");
        let archive = temp.path().join("data.zip");
        {
            let file = File::create(&archive).expect("create archive");
            let mut writer = zip::ZipWriter::new(file);
            writer
                .start_file("output/b.png", zip::write::SimpleFileOptions::default())
                .expect("start entry");
            writer.write_all(b"zipped").expect("write entry");
            writer.finish().expect("finish archive");
        }

        let dest = temp.path().join("staged");
        ArchiveExtractor.extract(&archive, &dest).expect("extract");
        assert_eq!(fs::read(dest.join("output/b.png")).unwrap(), b"zipped");
    }

    #[test]
    fn missing_archive_is_an_extract_error() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let err = ArchiveExtractor
            .extract(&temp.path().join("missing.tar"), temp.path())
            .unwrap_err();
        assert!(matches!(err, BuilderError::ArchiveExtract { .. }));
    }

    #[test]
    fn unsupported_suffix_is_rejected() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let err = ArchiveExtractor
            .extract(Path::new("data.rar"), temp.path())
            .unwrap_err();
        assert!(matches!(err, BuilderError::UnsupportedArchive { .. }));
    }
}
