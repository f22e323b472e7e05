//! Output directory staging.

use crate::error::BuildError;
use std::path::Path;
use tokio::fs;
use tracing::{debug, warn};

/// Make sure `dir` exists and holds nothing from a previous build.
///
/// Creating the directory must succeed. Removing stale entries is best
/// effort: failures are logged and the build goes ahead.
pub async fn prepare_output_dir(dir: &Path) -> Result<(), BuildError> {
    fs::create_dir_all(dir)
        .await
        .map_err(|e| BuildError::Staging(dir.to_path_buf(), e.to_string()))?;

    let mut entries = match fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Failed to list output directory {:?}: {}", dir, e);
            return Ok(());
        }
    };

    let mut removed = 0usize;
    loop {
        let entry = match entries.next_entry().await {
            Ok(Some(entry)) => entry,
            Ok(None) => break,
            Err(e) => {
                warn!("Failed to list output directory {:?}: {}", dir, e);
                break;
            }
        };

        let path = entry.path();
        let result = match entry.file_type().await {
            Ok(kind) if kind.is_dir() => fs::remove_dir_all(&path).await,
            _ => fs::remove_file(&path).await,
        };
        match result {
            Ok(()) => removed += 1,
            Err(e) => debug!("Failed to remove stale output {:?}: {}", path, e),
        }
    }

    debug!("Removed {} stale entries from {:?}", removed, dir);
    Ok(())
}
