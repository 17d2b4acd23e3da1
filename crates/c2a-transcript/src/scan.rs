use c2a_core::{AccessError, TRANSCRIPT_EXTENSION};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Whether `path` names a Colloquy transcript (by extension only).
pub fn is_transcript(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext == TRANSCRIPT_EXTENSION)
}

/// Enumerate every transcript under `root`, recursively.
///
/// The root is checked eagerly so a missing or unreadable input directory
/// fails before anything is yielded. The walk itself is lazy, sorted by file
/// name within each directory, and does not descend into symlinked
/// directories; symlinks to transcript files are yielded. Entries that
/// cannot be read mid-walk are logged and skipped.
pub fn scan_transcripts(root: &Path) -> Result<impl Iterator<Item = PathBuf>, AccessError> {
    let meta = std::fs::metadata(root).map_err(|source| match source.kind() {
        ErrorKind::NotFound => AccessError::NotFound(root.to_path_buf()),
        _ => AccessError::Unreadable {
            path: root.to_path_buf(),
            source,
        },
    })?;
    if !meta.is_dir() {
        return Err(AccessError::NotADirectory(root.to_path_buf()));
    }

    let unreadable = |source| AccessError::Unreadable {
        path: root.to_path_buf(),
        source,
    };
    let root = root.canonicalize().map_err(unreadable)?;
    std::fs::read_dir(&root).map_err(unreadable)?;

    let walker = WalkDir::new(&root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                tracing::warn!(
                    path = ?err.path(),
                    error = %err,
                    "skipping unreadable entry"
                );
                None
            }
        })
        .filter(|entry| {
            let is_file = entry.file_type().is_file()
                || (entry.path_is_symlink() && entry.path().is_file());
            is_file && is_transcript(entry.path())
        })
        .map(walkdir::DirEntry::into_path);

    Ok(walker)
}
