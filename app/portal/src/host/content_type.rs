//! Content-type detection for local files.
//!
//! Order of evidence: directories, magic numbers (`infer`), file extension
//! (`mime_guess`), then two cheap heuristics for empty and textual files.
//! Extension guesses are reported under their shared-mime-info names.

use std::io::Read;
use std::path::Path;

use super::mime_db::canonical_name;
use super::traits::ContentClassifier;
use crate::core::constants::content_class;

/// Bytes inspected by the text heuristic.
const SNIFF_LEN: usize = 512;

/// Classifier combining magic-number and extension lookups.
#[derive(Debug, Clone, Copy, Default)]
pub struct MimeSniffer;

impl ContentClassifier for MimeSniffer {
    fn classify(&self, path: &Path) -> Option<String> {
        let metadata = std::fs::metadata(path).ok()?;
        if metadata.is_dir() {
            return Some(content_class::DIRECTORY.to_string());
        }

        if let Ok(Some(kind)) = infer::get_from_path(path) {
            return Some(kind.mime_type().to_string());
        }

        if let Some(mime) = mime_guess::from_path(path).first_raw() {
            return Some(canonical_name(mime).to_string());
        }

        if metadata.len() == 0 {
            return Some(content_class::ZERO_SIZE.to_string());
        }

        looks_like_text(path).then(|| content_class::PLAIN_TEXT.to_string())
    }
}

/// Returns whether the leading bytes are UTF-8 without NUL bytes.
fn looks_like_text(path: &Path) -> bool {
    let Ok(file) = std::fs::File::open(path) else {
        return false;
    };

    let mut buffer = Vec::with_capacity(SNIFF_LEN);
    if file.take(SNIFF_LEN as u64).read_to_end(&mut buffer).is_err() {
        return false;
    }

    if buffer.contains(&0) {
        return false;
    }

    match std::str::from_utf8(&buffer) {
        Ok(_) => true,
        // The sniff window may cut a multi-byte character in half
        Err(err) => err.error_len().is_none(),
    }
}
