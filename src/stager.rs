//! Archive staging: extracting the export zip into the raw data directory.

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::error::{AnalysisError, Result};
use crate::logging::OperationTimer;

/// `<raw root>/messages/inbox`
#[must_use]
pub fn inbox_dir(raw_root: &Path) -> PathBuf {
    raw_root.join("messages").join("inbox")
}

/// Check that an extracted export looks usable
pub fn check_raw_root(raw_root: &Path) -> Result<()> {
    if !raw_root.is_dir() {
        return Err(AnalysisError::MissingArchive(raw_root.to_path_buf()));
    }
    if !inbox_dir(raw_root).is_dir() {
        return Err(AnalysisError::MissingInbox(raw_root.to_path_buf()));
    }
    Ok(())
}

/// Extract `zip_path` into `raw_root`, creating it if needed
pub fn extract_archive(zip_path: &Path, raw_root: &Path) -> Result<()> {
    let timer = OperationTimer::new("extract_archive");
    info!("Unzipping {} to {}", zip_path.display(), raw_root.display());

    let file = File::open(zip_path)?;
    let mut archive = zip::ZipArchive::new(file)?;
    fs::create_dir_all(raw_root)?;
    archive.extract(raw_root)?;

    info!(entries = archive.len(), "Extracted archive");
    timer.finish();
    Ok(())
}

/// Make sure `raw_root` holds an extracted export.
///
/// Extracts when the extract is missing, or always when `force` is set and
/// the zip is available. Fails if the result still does not check out.
pub fn stage(zip_path: &Path, raw_root: &Path, force: bool) -> Result<()> {
    let existing = check_raw_root(raw_root);
    let zip_present = zip_path.is_file();

    match (&existing, force, zip_present) {
        (Ok(()), false, _) => info!("Using existing raw data"),
        (Ok(()), true, false) => {
            warn!("Debug mode but no zip at {}, reusing existing raw data", zip_path.display());
        }
        (_, _, true) => {
            if let Err(e) = &existing {
                info!("{e}");
            }
            extract_archive(zip_path, raw_root)?;
        }
        (Err(_), _, false) => return Err(AnalysisError::MissingZip(zip_path.to_path_buf())),
    }

    check_raw_root(raw_root)?;
    info!("Raw data ready at {}", raw_root.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_check_missing_root() {
        let dir = tempdir().unwrap();
        let err = check_raw_root(&dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, AnalysisError::MissingArchive(_)));
    }

    #[test]
    fn test_check_missing_inbox() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("messages")).unwrap();
        let err = check_raw_root(dir.path()).unwrap_err();
        assert!(matches!(err, AnalysisError::MissingInbox(_)));
    }

    #[test]
    fn test_check_valid_root() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(inbox_dir(dir.path())).unwrap();
        assert!(check_raw_root(dir.path()).is_ok());
    }

    #[test]
    fn test_stage_without_zip_or_extract() {
        let dir = tempdir().unwrap();
        let err = stage(&dir.path().join("x.zip"), &dir.path().join("raw"), false).unwrap_err();
        assert!(matches!(err, AnalysisError::MissingZip(_)));
    }

    #[test]
    fn test_stage_reuses_existing_extract() {
        let dir = tempdir().unwrap();
        let raw = dir.path().join("raw");
        fs::create_dir_all(inbox_dir(&raw)).unwrap();
        assert!(stage(&dir.path().join("x.zip"), &raw, true).is_ok());
    }
}
