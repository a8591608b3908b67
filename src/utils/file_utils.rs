//! File system utilities

use anyhow::{anyhow, Result};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

/// Characters that are not allowed in file names on common host filesystems
pub const INVALID_FILENAME_CHARS: [char; 9] = ['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Ensure directory exists
pub fn ensure_dir_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .map_err(|e| anyhow!("Failed to create directory {}: {}", path.display(), e))?;
    }
    Ok(())
}

/// Get file extension
pub fn get_file_extension(filename: &str) -> Option<&str> {
    Path::new(filename).extension().and_then(|ext| ext.to_str())
}

/// Sanitize filename for filesystem
///
/// Strips `< > : " / \ | ? *` and trims surrounding whitespace. Total and
/// idempotent.
pub fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .filter(|c| !INVALID_FILENAME_CHARS.contains(c))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Append `.ext` to a path stem.
///
/// Unlike [`Path::with_extension`] this never replaces an existing dot in the
/// stem, so `Mr. Blue Sky` becomes `Mr. Blue Sky.mp3`.
pub fn append_extension(stem: &Path, ext: &str) -> PathBuf {
    let mut name = OsString::from(stem.as_os_str());
    name.push(".");
    name.push(ext);
    PathBuf::from(name)
}
