use std::{
    ffi::OsStr,
    path::{Path, PathBuf},
    sync::OnceLock,
};

use regex::Regex;
use tempfile::NamedTempFile;

use crate::{result::Result, types::Extension};

/// Longest file name (before the suffix convention) kept for outputs
const MAX_FILENAME_LEN: usize = 50;

/// Fallback name when nothing survives sanitization
const FALLBACK_FILENAME: &str = "video.mp4";

static UNSAFE_CHARS: OnceLock<Regex> = OnceLock::new();

/// Remove potentially unsafe characters and truncate for OS safety.
/// Only letters, digits, underscore, hyphen, period and space survive.
pub fn sanitize_filename(filename: &str) -> String {
    let re = UNSAFE_CHARS.get_or_init(|| Regex::new(r"[^a-zA-Z0-9_\-\. ]").unwrap());

    re.replace_all(filename, "")
        .chars()
        .take(MAX_FILENAME_LEN)
        .collect()
}

/// Build the output path for a highlight of `source` inside `out_dir`:
/// the sanitized source file name with an `_highlights` suffix.
/// Unknown or missing extensions fall back to `.mp4`.
pub fn highlight_output_path(out_dir: &Path, source: &Path) -> PathBuf {
    let name = source.file_name().and_then(OsStr::to_str).unwrap_or("");
    let mut name = sanitize_filename(name);
    if name.is_empty() {
        name = FALLBACK_FILENAME.to_owned();
    }

    let ext = Extension::from_path(&name).unwrap_or(Extension::Mp4);
    let base = Path::new(&name)
        .file_stem()
        .and_then(OsStr::to_str)
        .unwrap_or("video");

    out_dir.join(format!("{base}_highlights{}", ext.with_dot()))
}

/// Create a named temporary file and return its handle.
///
/// The file destructor will be called at the handle drop.
/// **As such, one must not simply get the file path and drop the handle.**
pub fn named_tempfile(suffix: &str) -> Result<NamedTempFile> {
    Ok(tempfile::Builder::new().suffix(suffix).tempfile()?)
}
