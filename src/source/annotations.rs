use std::path::{Path, PathBuf};

use super::{Annotated, AnnotationSource};
use crate::error::BuilderError;
use crate::ir::io_voc_xml::read_voc_xml;
use crate::ir::{AnnotationRecord, LabelMap, PixelBox, DOKKI_TOTAL};

/// Parses `<annotations_dir>/<id>.xml` VOC documents.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VocXmlAnnotations {
    annotations_dir: PathBuf,
}

impl VocXmlAnnotations {
    pub fn new(annotations_dir: impl Into<PathBuf>) -> Self {
        Self {
            annotations_dir: annotations_dir.into(),
        }
    }

    /// Location of the document for `image_id`.
    pub fn document_path(&self, dataset_dir: &Path, image_id: &str) -> PathBuf {
        dataset_dir
            .join(&self.annotations_dir)
            .join(format!("{image_id}.xml"))
    }
}

impl Default for VocXmlAnnotations {
    fn default() -> Self {
        Self::new("Annotations")
    }
}

impl AnnotationSource for VocXmlAnnotations {
    fn annotate(
        &self,
        dataset_dir: &Path,
        image_id: &str,
        labels: &LabelMap,
    ) -> Result<Annotated, BuilderError> {
        let document = read_voc_xml(&self.document_path(dataset_dir, image_id))?;
        let mapped = document.to_record(labels);

        Ok(Annotated {
            record: mapped.record,
            discarded: mapped.discarded,
        })
    }
}

/// Gives every image the same single box, ignoring the image itself.
///
/// Dokki images carry no annotation documents; the invoice total always
/// sits in the same region of the scanned page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SyntheticAnnotations {
    bbox: PixelBox,
    label: String,
    difficult: bool,
}

impl SyntheticAnnotations {
    pub fn new(bbox: PixelBox, label: impl Into<String>, difficult: bool) -> Self {
        Self {
            bbox,
            label: label.into(),
            difficult,
        }
    }

    /// The Dokki invoice total region.
    pub fn dokki_total() -> Self {
        Self::new(PixelBox::from_xyxy(202, 1496, 1576, 1560), DOKKI_TOTAL, false)
    }
}

impl AnnotationSource for SyntheticAnnotations {
    fn annotate(
        &self,
        _dataset_dir: &Path,
        _image_id: &str,
        labels: &LabelMap,
    ) -> Result<Annotated, BuilderError> {
        let label = labels
            .get(&self.label)
            .ok_or_else(|| BuilderError::UnknownLabel {
                label: self.label.clone(),
            })?;

        let mut record = AnnotationRecord::new();
        record.push(self.bbox, label, self.difficult);
        Ok(record.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::LabelId;
    use std::fs;

    #[test]
    fn synthetic_annotation_is_identical_for_every_image() {
        let source = SyntheticAnnotations::dokki_total();
        let labels = LabelMap::dokki();

        let a = source.annotate(Path::new("/d"), "a.png", &labels).unwrap();
        let b = source.annotate(Path::new("/d"), "b.png", &labels).unwrap();

        assert_eq!(a, b);
        assert_eq!(a.record.boxes()[0].to_array(), [202, 1496, 1576, 1560]);
        assert_eq!(a.record.labels(), &[LabelId(1)]);
        assert_eq!(a.record.difficulties(), &[0]);
        assert!(a.discarded.is_empty());
    }

    #[test]
    fn synthetic_label_must_be_in_label_map() {
        let err = SyntheticAnnotations::dokki_total()
            .annotate(Path::new("/d"), "a.png", &LabelMap::voc())
            .unwrap_err();
        assert!(matches!(err, BuilderError::UnknownLabel { .. }));
    }

    #[test]
    fn voc_annotations_read_document_for_id() {
        let temp = tempfile::tempdir().expect("create temp dir");
        fs::create_dir_all(temp.path().join("Annotations")).expect("create annotations dir");
        fs::write(
            temp.path().join("Annotations/img1.xml"),
            "<annotation><object><name>car</name><difficult>0</difficult><bndbox>\
             <xmin>10</xmin><ymin>20</ymin><xmax>110</xmax><ymax>220</ymax>\
             </bndbox></object></annotation>",
        )
        .expect("write xml");

        let source = VocXmlAnnotations::default();
        let out = source
            .annotate(temp.path(), "img1", &LabelMap::voc())
            .expect("annotate");
        assert_eq!(out.record.boxes()[0].to_array(), [9, 19, 109, 219]);
        assert_eq!(out.record.labels(), &[LabelId(7)]);
    }

    #[test]
    fn missing_document_is_an_error() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let err = VocXmlAnnotations::default()
            .annotate(temp.path(), "ghost", &LabelMap::voc())
            .unwrap_err();
        assert!(matches!(err, BuilderError::Io(_)));
    }
}
