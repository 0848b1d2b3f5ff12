//! Pascal VOC annotation document reader.
//!
//! Each image in a VOC dataset has one `Annotations/<id>.xml` document
//! listing its objects. Only the fields the training JSON needs are read:
//! `name`, `difficult` and `bndbox`. VOC coordinates are one-based; the
//! shift to zero-based happens in [`VocDocument::to_record`].

use std::fs;
use std::path::{Path, PathBuf};

use roxmltree::Node;

use super::bbox::PixelBox;
use super::label_map::{normalize_label, LabelMap};
use super::model::AnnotationRecord;
use crate::error::BuilderError;

/// One `<object>` entry, exactly as written in the document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VocObject {
    /// Class name, trimmed but not yet normalized.
    pub name: String,
    pub difficult: bool,
    /// One-based `[xmin, ymin, xmax, ymax]`.
    pub bndbox: [i64; 4],
}

/// A parsed annotation document.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VocDocument {
    pub objects: Vec<VocObject>,
}

/// Objects of a document mapped through a label map.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VocRecord {
    pub record: AnnotationRecord,
    /// Normalized names of objects dropped because the label map has no
    /// entry for them, one per dropped object.
    pub discarded: Vec<String>,
}

impl VocDocument {
    /// Converts the document into an annotation record.
    ///
    /// Objects whose normalized name is not in `labels`, or whose box cannot
    /// be shifted to zero-based coordinates, are left out of the record and
    /// reported in [`VocRecord::discarded`].
    pub fn to_record(&self, labels: &LabelMap) -> VocRecord {
        let mut out = VocRecord::default();

        for object in &self.objects {
            let Some(label) = labels.get(&object.name) else {
                out.discarded.push(normalize_label(&object.name));
                continue;
            };

            let [xmin, ymin, xmax, ymax] = object.bndbox;
            let Some(bbox) = PixelBox::from_one_based(xmin, ymin, xmax, ymax) else {
                out.discarded.push(normalize_label(&object.name));
                continue;
            };
            out.record.push(bbox, label, object.difficult);
        }

        out
    }
}

/// Reads and parses one annotation document.
pub fn read_voc_xml(path: &Path) -> Result<VocDocument, BuilderError> {
    let xml = fs::read_to_string(path).map_err(BuilderError::Io)?;
    parse_voc_xml_str(&xml, path)
}

/// Parse VOC XML from a UTF-8 string.
///
/// This helper is primarily useful for testing/fuzzing parse behavior in-memory.
pub fn from_voc_xml_str(xml: &str) -> Result<VocDocument, BuilderError> {
    parse_voc_xml_str(xml, Path::new("<memory>"))
}

/// Parse VOC XML from bytes.
///
/// The input must be valid UTF-8.
pub fn from_voc_xml_slice(bytes: &[u8]) -> Result<VocDocument, BuilderError> {
    let xml = std::str::from_utf8(bytes).map_err(|source| BuilderError::VocXmlParse {
        path: PathBuf::from("<memory>"),
        message: format!("input is not valid UTF-8: {source}"),
    })?;
    from_voc_xml_str(xml)
}

fn parse_voc_xml_str(xml: &str, path: &Path) -> Result<VocDocument, BuilderError> {
    let document =
        roxmltree::Document::parse(xml).map_err(|source| BuilderError::VocXmlParse {
            path: path.to_path_buf(),
            message: source.to_string(),
        })?;

    // Objects may sit at any depth below the root.
    let mut objects = Vec::new();
    for object in document
        .root_element()
        .descendants()
        .filter(|node| node.is_element() && node.tag_name().name() == "object")
    {
        let difficult = optional_child_text(object, "difficult").as_deref() == Some("1");
        let name = required_child_text(object, "name", path, "<object>")?;
        let bndbox = required_child_element(object, "bndbox", path, "<object>")?;

        let xmin = parse_required_coord(bndbox, "xmin", path)?;
        let ymin = parse_required_coord(bndbox, "ymin", path)?;
        let xmax = parse_required_coord(bndbox, "xmax", path)?;
        let ymax = parse_required_coord(bndbox, "ymax", path)?;

        objects.push(VocObject {
            name,
            difficult,
            bndbox: [xmin, ymin, xmax, ymax],
        });
    }

    Ok(VocDocument { objects })
}

fn required_child_element<'a, 'input>(
    node: Node<'a, 'input>,
    tag: &str,
    path: &Path,
    context: &str,
) -> Result<Node<'a, 'input>, BuilderError> {
    child_element(node, tag).ok_or_else(|| BuilderError::VocXmlParse {
        path: path.to_path_buf(),
        message: format!("missing <{tag}> in {context}"),
    })
}

fn required_child_text(
    node: Node<'_, '_>,
    tag: &str,
    path: &Path,
    context: &str,
) -> Result<String, BuilderError> {
    optional_child_text(node, tag).ok_or_else(|| BuilderError::VocXmlParse {
        path: path.to_path_buf(),
        message: format!("missing <{tag}> in {context}"),
    })
}

/// Integer coordinates are the norm; decimals are truncated toward zero.
/// Values whose one-based shift would leave the `i64` range are rejected.
fn parse_required_coord(node: Node<'_, '_>, tag: &str, path: &Path) -> Result<i64, BuilderError> {
    let raw = required_child_text(node, tag, path, "<bndbox>")?;
    let invalid = |expected: &str| BuilderError::VocXmlParse {
        path: path.to_path_buf(),
        message: format!("invalid <{tag}> value '{raw}' in <bndbox>; expected {expected}"),
    };

    let value = match raw.parse::<i64>() {
        Ok(value) => value,
        Err(_) => {
            let value = raw
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite())
                .ok_or_else(|| invalid("integer"))?
                .trunc();
            if !(i64::MIN as f64..i64::MAX as f64).contains(&value) {
                return Err(invalid("coordinate within i64 range"));
            }
            value as i64
        }
    };

    if value.checked_sub(1).is_none() {
        return Err(invalid("coordinate within i64 range"));
    }
    Ok(value)
}

fn child_element<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|child| child.is_element() && child.tag_name().name() == tag)
}

fn optional_child_text(node: Node<'_, '_>, tag: &str) -> Option<String> {
    child_element(node, tag)
        .and_then(|child| child.text())
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(ToOwned::to_owned)
}
