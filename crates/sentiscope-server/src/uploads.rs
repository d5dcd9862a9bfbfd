//! Storage of uploaded images

use std::path::{Path, PathBuf};
use tracing::debug;

const FALLBACK_NAME: &str = "upload";

/// Reduce a client-supplied file name to its final path component.
///
/// Both `/` and `\` count as separators; names that reduce to nothing or to
/// `.`/`..` are replaced by a fixed name.
pub fn sanitize_filename(name: &str) -> String {
    let last = name
        .rsplit(|c| c == '/' || c == '\\')
        .next()
        .unwrap_or_default()
        .trim();

    match last {
        "" | "." | ".." => FALLBACK_NAME.to_string(),
        other => other.to_string(),
    }
}

/// Write `bytes` under `dir`; an existing file with the same name is replaced
pub async fn save_upload(dir: &Path, file_name: &str, bytes: &[u8]) -> std::io::Result<PathBuf> {
    let path = dir.join(sanitize_filename(file_name));
    tokio::fs::write(&path, bytes).await?;
    debug!(path = %path.display(), size = bytes.len(), "stored upload");
    Ok(path)
}
