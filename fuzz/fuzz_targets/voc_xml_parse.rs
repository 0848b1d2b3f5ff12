//! Fuzz target for VOC annotation document parsing.
//!
//! Feeds arbitrary bytes to the parser and maps whatever parses through the
//! VOC label map, checking for panics, crashes, or hangs.

#![no_main]

use databuilder::ir::io_voc_xml::from_voc_xml_slice;
use databuilder::ir::LabelMap;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Cap input size to avoid excessive memory usage.
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    if let Ok(doc) = from_voc_xml_slice(data) {
        let out = doc.to_record(&LabelMap::voc());
        assert_eq!(out.record.len() + out.discarded.len(), doc.objects.len());
    }
});
