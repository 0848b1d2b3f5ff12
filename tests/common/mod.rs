#![allow(dead_code)]

use std::fs::{self, File};
use std::path::Path;

pub fn voc_object_xml(name: &str, difficult: bool, bndbox: [i64; 4]) -> String {
    format!(
        "  <object>\n    <name>{name}</name>\n    <pose>Unspecified</pose>\n    \
         <truncated>0</truncated>\n    <difficult>{}</difficult>\n    <bndbox>\n      \
         <xmin>{}</xmin>\n      <ymin>{}</ymin>\n      <xmax>{}</xmax>\n      \
         <ymax>{}</ymax>\n    </bndbox>\n  </object>\n",
        u8::from(difficult),
        bndbox[0],
        bndbox[1],
        bndbox[2],
        bndbox[3],
    )
}

pub fn voc_document_xml(filename: &str, objects: &[String]) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<annotation>\n  <folder>VOC2007</folder>\n  \
         <filename>{filename}</filename>\n  <size>\n    <width>500</width>\n    \
         <height>375</height>\n    <depth>3</depth>\n  </size>\n{}</annotation>\n",
        objects.concat()
    )
}

/// Lays out `<root>/VOCdevkit/VOC<year>` with a trainval manifest, one
/// annotation document and one (empty) JPEG per id.
pub fn write_voc_tree(root: &Path, year: &str, docs: &[(&str, String)]) {
    let dataset = root.join("VOCdevkit").join(format!("VOC{year}"));
    fs::create_dir_all(dataset.join("ImageSets/Main")).expect("create manifest dir");
    fs::create_dir_all(dataset.join("Annotations")).expect("create annotations dir");
    fs::create_dir_all(dataset.join("JPEGImages")).expect("create images dir");

    let manifest: String = docs.iter().map(|(id, _)| format!("{id}\n")).collect();
    fs::write(dataset.join("ImageSets/Main/trainval.txt"), manifest).expect("write manifest");

    for (id, xml) in docs {
        fs::write(dataset.join(format!("Annotations/{id}.xml")), xml).expect("write xml");
        fs::write(dataset.join(format!("JPEGImages/{id}.jpg")), b"").expect("write jpg");
    }
}

/// The two-image VOC scenario: `img1` has one car, `img2` nothing known.
pub fn two_image_voc_docs() -> Vec<(&'static str, String)> {
    vec![
        (
            "img1",
            voc_document_xml("img1.jpg", &[voc_object_xml("car", false, [10, 20, 110, 220])]),
        ),
        (
            "img2",
            voc_document_xml("img2.jpg", &[voc_object_xml("unicorn", false, [1, 1, 5, 5])]),
        ),
    ]
}

/// Packs the contents of `src` into a plain tar at `archive`.
pub fn tar_dir(src: &Path, archive: &Path) {
    let file = File::create(archive).expect("create archive");
    let mut builder = tar::Builder::new(file);
    builder.append_dir_all(".", src).expect("append directory");
    builder.finish().expect("finish archive");
}

/// Packs the contents of `src` into an xz-compressed tar at `archive`.
pub fn tar_xz_dir(src: &Path, archive: &Path) {
    let file = File::create(archive).expect("create archive");
    let encoder = xz2::write::XzEncoder::new(file, 6);
    let mut builder = tar::Builder::new(encoder);
    builder.append_dir_all(".", src).expect("append directory");
    builder
        .into_inner()
        .expect("finish archive")
        .finish()
        .expect("finish xz stream");
}
