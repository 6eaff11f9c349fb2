use std::{
    fs,
    path::{Path, PathBuf},
    time::SystemTime,
};

use crate::error::{CoinlensResult, IoError};

/// Lists the entries of `dir` whose file name ends with `extension`, sorted by name.
///
/// The suffix match is case-sensitive. A missing or unreadable directory is an error.
pub fn list_candidates(dir: &Path, extension: &str) -> CoinlensResult<Vec<PathBuf>> {
    let unreadable = |source| IoError::DirectoryUnreadable {
        path: dir.to_path_buf(),
        source,
    };

    let mut candidates = Vec::new();
    for entry in fs::read_dir(dir).map_err(unreadable)? {
        let entry = entry.map_err(unreadable)?;
        if entry.file_name().to_string_lossy().ends_with(extension) {
            candidates.push(entry.path());
        }
    }
    candidates.sort();
    Ok(candidates)
}

/// Display name of a source file for diagnostics.
pub(crate) fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Snapshot of a directory used to detect changes between loads.
///
/// Two fingerprints compare equal only if the directory mtime and the name,
/// size and mtime of every candidate file are unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirFingerprint {
    modified: Option<SystemTime>,
    files: Vec<FileStamp>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct FileStamp {
    name: String,
    len: u64,
    modified: Option<SystemTime>,
}

impl DirFingerprint {
    pub fn capture(dir: &Path, extension: &str) -> CoinlensResult<Self> {
        let meta = fs::metadata(dir).map_err(|source| IoError::DirectoryUnreadable {
            path: dir.to_path_buf(),
            source,
        })?;

        let files = list_candidates(dir, extension)?
            .iter()
            .map(|path| {
                // A file vanishing between listing and stat is a change in itself.
                let meta = fs::metadata(path).ok();
                FileStamp {
                    name: file_name_of(path),
                    len: meta.as_ref().map_or(0, |m| m.len()),
                    modified: meta.and_then(|m| m.modified().ok()),
                }
            })
            .collect();

        Ok(Self {
            modified: meta.modified().ok(),
            files,
        })
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_candidates_filters_and_sorts() {
        let tmp = tempfile::tempdir().expect("failed to create temp dir");
        for name in ["ETH.csv", "BTC.csv", "notes.txt", "ADA.CSV", "backup.csv.bak"] {
            fs::write(tmp.path().join(name), "x").expect("failed to write file");
        }

        let names = list_candidates(tmp.path(), ".csv")
            .expect("listing failed")
            .iter()
            .map(|p| file_name_of(p))
            .collect::<Vec<_>>();

        assert_eq!(names, vec!["BTC.csv", "ETH.csv"]);
    }

    #[test]
    fn test_list_candidates_missing_directory_is_fatal() {
        let tmp = tempfile::tempdir().expect("failed to create temp dir");
        let missing = tmp.path().join("does-not-exist");

        let err = list_candidates(&missing, ".csv").expect_err("missing dir must fail");
        assert!(matches!(
            err,
            crate::error::CoinlensError::Io(IoError::DirectoryUnreadable { .. })
        ));
    }

    #[test]
    fn test_fingerprint_changes_when_file_added() {
        let tmp = tempfile::tempdir().expect("failed to create temp dir");
        fs::write(tmp.path().join("BTC.csv"), "a").expect("failed to write file");

        let before = DirFingerprint::capture(tmp.path(), ".csv").expect("fingerprint");
        let again = DirFingerprint::capture(tmp.path(), ".csv").expect("fingerprint");
        assert_eq!(before, again);

        fs::write(tmp.path().join("ETH.csv"), "b").expect("failed to write file");
        let after = DirFingerprint::capture(tmp.path(), ".csv").expect("fingerprint");
        assert_ne!(before, after);
        assert_eq!(after.file_count(), 2);
    }
}
