//! Export Delivery
//!
//! Writes export artifacts to disk. The contents go to a staging file next to
//! the target and are renamed over it at the end, so the target is either
//! the old file or the complete new one.

use super::options::{ExportArtifact, ExportFormat};
use crate::editor::Document;
use crate::error::{Error, Result};
use log::{debug, info, warn};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

// ─────────────────────────────────────────────────────────────────────────────
// Markdown Export
// ─────────────────────────────────────────────────────────────────────────────

/// Export the buffer as-is.
pub fn export_markdown(document: &Document) -> ExportArtifact {
    ExportArtifact::new(ExportFormat::Markdown, document.content.clone())
}

// ─────────────────────────────────────────────────────────────────────────────
// Staged File
// ─────────────────────────────────────────────────────────────────────────────

/// A staging file that is removed on drop unless it was persisted.
struct StagedFile {
    path: PathBuf,
    persisted: bool,
}

impl StagedFile {
    /// Create an empty staging file next to `target`.
    fn create(target: &Path) -> Result<(Self, File)> {
        let path = staging_path(target);
        let file = File::create(&path).map_err(|e| Error::FileWrite {
            path: path.clone(),
            source: e,
        })?;
        debug!("Created staging file {}", path.display());
        Ok((
            Self {
                path,
                persisted: false,
            },
            file,
        ))
    }

    fn path(&self) -> &Path {
        &self.path
    }

    /// Move the staging file onto `target`.
    fn persist(mut self, target: &Path) -> Result<()> {
        fs::rename(&self.path, target).map_err(|e| Error::FileWrite {
            path: target.to_path_buf(),
            source: e,
        })?;
        self.persisted = true;
        Ok(())
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        if self.persisted {
            return;
        }
        if let Err(e) = fs::remove_file(&self.path) {
            warn!(
                "Failed to remove staging file {}: {}",
                self.path.display(),
                e
            );
        } else {
            debug!("Removed staging file {}", self.path.display());
        }
    }
}

/// `dir/.name.<random>.part` for a target `dir/name`.
fn staging_path(target: &Path) -> PathBuf {
    let name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "export".to_string());
    let staged = format!(".{}.{:08x}.part", name, fastrand::u32(..));
    match target.parent() {
        Some(parent) => parent.join(staged),
        None => PathBuf::from(staged),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Writing
// ─────────────────────────────────────────────────────────────────────────────

/// Write `artifact` to `path` via a staging file.
///
/// On any failure the staging file is removed and the error returned; an
/// existing file at `path` is left untouched.
pub fn write_artifact(artifact: &ExportArtifact, path: &Path) -> Result<()> {
    let (staged, mut file) = StagedFile::create(path)?;

    file.write_all(artifact.contents.as_bytes())
        .and_then(|()| file.sync_all())
        .map_err(|e| Error::FileWrite {
            path: staged.path().to_path_buf(),
            source: e,
        })?;
    drop(file);

    staged.persist(path)?;
    info!(
        "Exported {} ({}) to {}",
        artifact.file_name,
        artifact.mime,
        path.display()
    );
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_export_markdown_is_verbatim() {
        let artifact = export_markdown(&Document::new("# Hi"));
        assert_eq!(artifact.contents, "# Hi");
        assert_eq!(artifact.file_name, "document.md");
        assert_eq!(artifact.mime, "text/markdown");
    }

    #[test]
    fn test_export_markdown_keeps_multibyte_text() {
        let text = "# مرحبا\n\n- [ ] مهمة\n";
        assert_eq!(export_markdown(&Document::new(text)).contents, text);
    }

    #[test]
    fn test_write_artifact_creates_file() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("document.md");
        let artifact = export_markdown(&Document::new("hello"));

        write_artifact(&artifact, &target).unwrap();

        assert_eq!(fs::read_to_string(&target).unwrap(), "hello");
        assert_eq!(entries(dir.path()), vec!["document.md".to_string()]);
    }

    #[test]
    fn test_write_artifact_overwrites_existing() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("document.md");
        fs::write(&target, "old contents").unwrap();

        write_artifact(&export_markdown(&Document::new("new")), &target).unwrap();

        assert_eq!(fs::read_to_string(&target).unwrap(), "new");
        assert_eq!(entries(dir.path()), vec!["document.md".to_string()]);
    }

    #[test]
    fn test_failed_rename_removes_staging_file() {
        let dir = TempDir::new().unwrap();
        // A non-empty directory cannot be replaced by a file
        let target = dir.path().join("document.html");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("keep.txt"), "x").unwrap();

        let result = write_artifact(&export_markdown(&Document::new("body")), &target);

        assert!(matches!(result, Err(Error::FileWrite { .. })));
        assert_eq!(entries(dir.path()), vec!["document.html".to_string()]);
        assert_eq!(entries(&target), vec!["keep.txt".to_string()]);
    }

    #[test]
    fn test_missing_directory_leaves_nothing_behind() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("missing").join("document.md");

        let result = write_artifact(&export_markdown(&Document::new("body")), &target);

        assert!(matches!(result, Err(Error::FileWrite { .. })));
        assert!(entries(dir.path()).is_empty());
    }

    #[test]
    fn test_dropped_staged_file_is_removed() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("document.md");

        let (staged, mut file) = StagedFile::create(&target).unwrap();
        file.write_all(b"partial").unwrap();
        let staged_path = staged.path().to_path_buf();
        assert!(staged_path.exists());

        drop(file);
        drop(staged);

        assert!(!staged_path.exists());
        assert!(!target.exists());
    }

    #[test]
    fn test_staging_path_is_sibling() {
        let target = Path::new("/tmp/out/document.html");
        let staged = staging_path(target);
        assert_eq!(staged.parent(), target.parent());
        let name = staged.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with(".document.html."));
        assert!(name.ends_with(".part"));
    }
}
