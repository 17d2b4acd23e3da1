use c2a_core::{Timestamp, WriteError, CHATLOG_EXTENSION, SERVICE_IRC};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Default transcript root: `~/Documents/Colloquy Transcripts`.
pub fn default_input_root() -> PathBuf {
    let documents = dirs::document_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join("Documents")))
        .unwrap_or_else(|| PathBuf::from("."));
    documents.join("Colloquy Transcripts")
}

/// Default Adium log root:
/// `~/Library/Application Support/Adium 2.0/Users/Default/Logs`.
pub fn default_output_root() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Library")
        .join("Application Support")
        .join("Adium 2.0")
        .join("Users")
        .join("Default")
        .join("Logs")
}

/// First whitespace-delimited token of the transcript's file stem, which
/// Colloquy sets to the channel or query name (`#rust 2024-01-01` → `#rust`).
pub fn conversation_prefix(input: &Path) -> Option<String> {
    let stem = input.file_stem()?.to_string_lossy();
    stem.split_whitespace().next().map(path_component)
}

/// Replace path separators and the `.`/`..` names so a name cannot escape
/// its directory.
fn path_component(name: &str) -> String {
    match name {
        "" | "." | ".." => "_".to_string(),
        _ => name.replace(['/', '\\'], "_"),
    }
}

/// Account directory name: `IRC.{nickname}`.
pub fn account_dir_name(nickname: &str) -> String {
    format!("{SERVICE_IRC}.{}", path_component(nickname))
}

/// `{output_root}/IRC.{nickname}/{prefix}/{prefix} ({timestamp}).chatlog`
pub fn chatlog_path(
    output_root: &Path,
    nickname: &str,
    input: &Path,
    began: Timestamp,
) -> Result<PathBuf, WriteError> {
    let prefix =
        conversation_prefix(input).ok_or_else(|| WriteError::BadFileName(input.to_path_buf()))?;
    let file_name = format!("{prefix} ({}).{CHATLOG_EXTENSION}", began.file_token());
    Ok(output_root
        .join(account_dir_name(nickname))
        .join(&prefix)
        .join(file_name))
}

/// Create `dir` and any missing parents. Existing directories are fine.
pub fn ensure_dir(dir: &Path) -> Result<(), WriteError> {
    fs::create_dir_all(dir).map_err(|source| WriteError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })
}

/// Atomic write: write to temp file in same dir, then rename over `path`.
pub fn write_atomic(path: &Path, data: &[u8]) -> Result<(), WriteError> {
    let parent = path
        .parent()
        .ok_or_else(|| WriteError::BadFileName(path.to_path_buf()))?;
    ensure_dir(parent)?;

    let write_err = |source| WriteError::Write {
        path: path.to_path_buf(),
        source,
    };
    let mut tmp = tempfile::NamedTempFile::new_in(parent).map_err(write_err)?;
    tmp.write_all(data).map_err(write_err)?;
    tmp.flush().map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;
    Ok(())
}

/// Store a rendered chatlog, replacing any previous conversion of the same
/// transcript.
pub fn write_chatlog(path: &Path, data: &[u8]) -> Result<(), WriteError> {
    if path.exists() {
        tracing::debug!(path = %path.display(), "overwriting existing chatlog");
    }
    write_atomic(path, data)
}
