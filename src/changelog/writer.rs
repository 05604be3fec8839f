//! Write the rendered release notes to disk.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::ChangelogError;

/// Default document name (written as `changelog.md`).
pub const DEFAULT_NAME: &str = "changelog";

/// Path of the document `name` inside `dir`.
pub fn changelog_path(dir: &Path, name: &str) -> PathBuf {
    let file = if name.ends_with(".md") {
        name.to_string()
    } else {
        format!("{}.md", name)
    };
    dir.join(file)
}

/// Write `content` to `<dir>/<name>.md`, replacing any previous file.
///
/// The file is written to a temporary sibling and renamed into place, so a
/// failed run never leaves a truncated document.
pub fn write_changelog(dir: &Path, name: &str, content: &str) -> Result<PathBuf, ChangelogError> {
    let path = changelog_path(dir, name);
    let write_err = |source| ChangelogError::WriteFailed {
        path: path.clone(),
        source,
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
    tmp.write_all(content.as_bytes()).map_err(write_err)?;
    tmp.persist(&path).map_err(|e| write_err(e.error))?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_changelog_path_appends_extension() {
        let dir = Path::new("/work");
        assert_eq!(changelog_path(dir, "changelog"), PathBuf::from("/work/changelog.md"));
        assert_eq!(changelog_path(dir, "NOTES.md"), PathBuf::from("/work/NOTES.md"));
    }

    #[test]
    fn test_write_creates_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();

        let path = write_changelog(dir.path(), DEFAULT_NAME, "# 1.0.0\n").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# 1.0.0\n");

        write_changelog(dir.path(), DEFAULT_NAME, "# 1.1.0\n").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# 1.1.0\n");
    }

    #[test]
    fn test_write_into_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(matches!(
            write_changelog(&missing, DEFAULT_NAME, "x"),
            Err(ChangelogError::WriteFailed { .. })
        ));
    }
}
