//! Archive intake and layout validation
//!
//! Persists and unpacks the uploaded ZIP into an isolated scratch directory
//! and validates the top-level percentile folder layout before any series
//! file is opened.

use regex::Regex;
use std::collections::BTreeMap;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{debug, warn};

use super::{ImportError, Result};

/// Filename under which the raw upload is persisted inside the scratch dir.
pub const UPLOAD_FILE_NAME: &str = "upload.zip";

/// Subdirectory of the scratch dir holding the unpacked archive.
pub const EXTRACT_DIR_NAME: &str = "extracted";

fn percentile_dir_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^p(\d{1,2})$").unwrap_or_else(|_| unreachable!()))
}

/// Scratch directory for one import attempt, keyed by scenario id.
///
/// Creating the guard clears any directory left behind by a previous attempt
/// with the same key; dropping it removes the directory again, so cleanup
/// runs on every exit path of the pipeline.
#[derive(Debug)]
pub struct ScratchDir {
    path: PathBuf,
}

impl ScratchDir {
    pub fn create(root: &Path, key: &str) -> Result<Self> {
        let path = root.join(key);
        if path.exists() {
            fs::remove_dir_all(&path)?;
        }
        fs::create_dir_all(&path)?;
        debug!(path = %path.display(), "Created import scratch directory");
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_dir_all(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Failed to clean up import scratch directory"
                );
            }
        }
    }
}

/// Reject uploads before touching the filesystem: a body must be present and
/// the claimed filename must carry the archive extension.
pub fn validate_upload(filename: &str, payload: &[u8]) -> Result<()> {
    if payload.is_empty() {
        return Err(ImportError::EmptyUpload);
    }
    if !filename.to_ascii_lowercase().ends_with(".zip") {
        return Err(ImportError::UnsupportedExtension(filename.to_string()));
    }
    Ok(())
}

/// Unpack a ZIP archive into `dest`, creating it if necessary.
///
/// Blocking; callers on the async runtime offload this via `spawn_blocking`.
pub fn extract_zip(data: &[u8], dest: &Path) -> Result<()> {
    let cursor = Cursor::new(data);
    let mut archive =
        zip::ZipArchive::new(cursor).map_err(|e| ImportError::InvalidArchive(e.to_string()))?;
    fs::create_dir_all(dest)?;
    archive
        .extract(dest)
        .map_err(|e| ImportError::InvalidArchive(e.to_string()))?;
    debug!(entries = archive.len(), dest = %dest.display(), "Extracted upload archive");
    Ok(())
}

/// Parse a top-level archive entry name as a percentile folder name.
///
/// Accepts `p` followed by 1-2 decimal digits (percentile 0-99).
pub fn parse_percentile_dir_name(name: &str) -> Option<u8> {
    percentile_dir_pattern()
        .captures(name)
        .and_then(|captures| captures.get(1))
        .and_then(|digits| digits.as_str().parse().ok())
}

/// Enumerate the percentile folders of an extracted archive.
///
/// Every immediate child of `extract_root` must be a directory matching the
/// percentile naming pattern; a single non-conforming entry rejects the
/// whole archive, naming the entry, before any contained file is opened.
pub fn percentile_folders(extract_root: &Path) -> Result<BTreeMap<u8, PathBuf>> {
    let mut folders = BTreeMap::new();

    for entry in fs::read_dir(extract_root)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        let is_dir = entry.file_type()?.is_dir();

        let percentile = match parse_percentile_dir_name(&name) {
            Some(p) if is_dir => p,
            _ => return Err(ImportError::MalformedLayout(name)),
        };

        folders.insert(percentile, entry.path());
    }

    if folders.is_empty() {
        return Err(ImportError::NoPercentileFolders);
    }

    Ok(folders)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn build_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        for (name, content) in entries {
            writer
                .start_file(*name, SimpleFileOptions::default())
                .unwrap();
            writer.write_all(content).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_validate_upload_rejects_empty_body() {
        assert!(matches!(
            validate_upload("results.zip", b""),
            Err(ImportError::EmptyUpload)
        ));
    }

    #[test]
    fn test_validate_upload_rejects_wrong_extension() {
        assert!(matches!(
            validate_upload("results.tar.gz", b"data"),
            Err(ImportError::UnsupportedExtension(_))
        ));
        assert!(validate_upload("results.ZIP", b"data").is_ok());
    }

    #[test]
    fn test_extract_rejects_corrupt_archive() {
        let dir = tempfile::tempdir().unwrap();
        let result = extract_zip(b"definitely not a zip", dir.path());
        assert!(matches!(result, Err(ImportError::InvalidArchive(_))));
    }

    #[test]
    fn test_percentile_dir_name_parsing() {
        assert_eq!(parse_percentile_dir_name("p5"), Some(5));
        assert_eq!(parse_percentile_dir_name("p50"), Some(50));
        assert_eq!(parse_percentile_dir_name("p05"), Some(5));
        assert_eq!(parse_percentile_dir_name("p"), None);
        assert_eq!(parse_percentile_dir_name("p100"), None);
        assert_eq!(parse_percentile_dir_name("percentile_50"), None);
        assert_eq!(parse_percentile_dir_name("P50"), None);
    }

    #[test]
    fn test_percentile_folders_happy_path() {
        let dir = tempfile::tempdir().unwrap();
        let data = build_zip(&[
            ("p25/node.json", b"{}".as_slice()),
            ("p50/node.json", b"{}".as_slice()),
        ]);
        extract_zip(&data, dir.path()).unwrap();

        let folders = percentile_folders(dir.path()).unwrap();
        assert_eq!(folders.keys().copied().collect::<Vec<_>>(), vec![25, 50]);
    }

    #[test]
    fn test_percentile_folders_rejects_bad_name() {
        let dir = tempfile::tempdir().unwrap();
        let data = build_zip(&[
            ("p25/node.json", b"{}".as_slice()),
            ("percentile_50/node.json", b"{}".as_slice()),
        ]);
        extract_zip(&data, dir.path()).unwrap();

        let result = percentile_folders(dir.path());
        assert!(
            matches!(result, Err(ImportError::MalformedLayout(ref name)) if name == "percentile_50")
        );
    }

    #[test]
    fn test_percentile_folders_rejects_empty_archive() {
        let empty = tempfile::tempdir().unwrap();
        assert!(matches!(
            percentile_folders(empty.path()),
            Err(ImportError::NoPercentileFolders)
        ));
    }

    #[test]
    fn test_scratch_dir_clears_previous_attempt() {
        let root = tempfile::tempdir().unwrap();
        let stale = root.path().join("abc").join("leftover");
        std::fs::create_dir_all(&stale).unwrap();
        std::fs::write(stale.join("old.bin"), b"stale").unwrap();

        let scratch = ScratchDir::create(root.path(), "abc").unwrap();
        assert!(scratch.path().exists());
        assert!(!scratch.path().join("leftover").exists());

        let kept = scratch.path().to_path_buf();
        drop(scratch);
        assert!(!kept.exists());
    }
}
