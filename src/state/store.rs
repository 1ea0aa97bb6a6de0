//! Checkpoint store implementation
//!
//! Two artifacts per dataset: the accumulated records (a JSON array) and the
//! last completed page (decimal text). Each is replaced atomically by writing
//! a synced temp file and renaming it over the target. The records artifact is
//! always replaced before the marker, so the marker never points past the
//! records on disk. A crash between the two renames only causes the next run
//! to fetch and append that one page again.

use super::types::{PullState, Record};
use crate::config::DatasetLocation;
use crate::error::{Error, Result};
use std::io::ErrorKind as IoErrorKind;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

/// File-backed store for [`PullState`]
///
/// Assumes it is the only writer of its two artifacts for the duration of a
/// run; there is no locking.
#[derive(Debug, Clone)]
pub struct CheckpointStore {
    /// Path to the records artifact
    data_path: PathBuf,
    /// Path to the marker artifact
    marker_path: PathBuf,
}

impl CheckpointStore {
    /// Create a store over explicit artifact paths
    pub fn new(data_path: impl AsRef<Path>, marker_path: impl AsRef<Path>) -> Self {
        Self {
            data_path: data_path.as_ref().to_path_buf(),
            marker_path: marker_path.as_ref().to_path_buf(),
        }
    }

    /// Create a store for a dataset location
    pub fn for_dataset(dataset: &DatasetLocation) -> Self {
        Self::new(dataset.data_path(), dataset.marker_path())
    }

    /// Get the records artifact path
    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    /// Get the marker artifact path
    pub fn marker_path(&self) -> &Path {
        &self.marker_path
    }

    /// Create the directories holding the artifacts
    pub async fn prepare(&self) -> Result<()> {
        for path in [&self.data_path, &self.marker_path] {
            if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
                tokio::fs::create_dir_all(dir)
                    .await
                    .map_err(|e| Error::storage(dir, format!("Failed to create directory: {e}")))?;
            }
        }
        Ok(())
    }

    /// Read the marker; `None` when the artifact does not exist
    pub async fn read_marker(&self) -> Result<Option<u32>> {
        let contents = match tokio::fs::read_to_string(&self.marker_path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == IoErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(Error::storage(
                    &self.marker_path,
                    format!("Failed to read marker: {e}"),
                ))
            }
        };

        contents.trim().parse::<u32>().map(Some).map_err(|e| {
            Error::corrupt_state(
                &self.marker_path,
                format!("marker {:?} is not a page number: {e}", contents.trim()),
            )
        })
    }

    /// Load prior progress
    ///
    /// No marker (or a marker of 0) means a fresh pull. A positive marker
    /// requires a readable records artifact holding a JSON array.
    pub async fn load(&self) -> Result<PullState> {
        let Some(last_completed_page) = self.read_marker().await? else {
            if tokio::fs::try_exists(&self.data_path).await.unwrap_or(false) {
                warn!(
                    "Found {} without a page marker; starting from page 1",
                    self.data_path.display()
                );
            } else {
                info!("No page history found; starting from page 1");
            }
            return Ok(PullState::new());
        };

        if last_completed_page == 0 {
            return Ok(PullState::new());
        }

        let contents = match tokio::fs::read(&self.data_path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == IoErrorKind::NotFound => {
                return Err(Error::corrupt_state(
                    &self.data_path,
                    format!("marker reports page {last_completed_page} but records are missing"),
                ))
            }
            Err(e) => {
                return Err(Error::storage(
                    &self.data_path,
                    format!("Failed to read records: {e}"),
                ))
            }
        };

        let records: Vec<Record> = serde_json::from_slice(&contents).map_err(|e| {
            Error::corrupt_state(
                &self.data_path,
                format!("records are not a JSON array: {e}"),
            )
        })?;

        info!(
            "Loaded {} records through page {} from {}",
            records.len(),
            last_completed_page,
            self.data_path.display()
        );

        Ok(PullState::resumed(last_completed_page, records))
    }

    /// Persist `state`: records first, then the marker
    pub async fn commit(&self, state: &PullState) -> Result<()> {
        let data = serde_json::to_vec(&state.records).map_err(|e| {
            Error::storage(&self.data_path, format!("Failed to serialize records: {e}"))
        })?;

        write_atomic(&self.data_path, &data).await?;
        write_atomic(
            &self.marker_path,
            state.last_completed_page.to_string().as_bytes(),
        )
        .await?;

        debug!(
            "Committed page {} ({} records) to {}",
            state.last_completed_page,
            state.records.len(),
            self.data_path.display()
        );
        Ok(())
    }
}

/// Sibling temp path: `<file name>.tmp` in the same directory
fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Write to a temp file, sync it, then rename it over `path`
async fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let temp = temp_path(path);

    let mut file = tokio::fs::File::create(&temp)
        .await
        .map_err(|e| Error::storage(path, format!("Failed to create temp file: {e}")))?;
    file.write_all(contents)
        .await
        .map_err(|e| Error::storage(path, format!("Failed to write temp file: {e}")))?;
    file.sync_all()
        .await
        .map_err(|e| Error::storage(path, format!("Failed to sync temp file: {e}")))?;
    drop(file);

    tokio::fs::rename(&temp, path)
        .await
        .map_err(|e| Error::storage(path, format!("Failed to rename temp file: {e}")))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temp_path_keeps_extension() {
        assert_eq!(
            temp_path(Path::new("/out/users_2024-01-01.json")),
            PathBuf::from("/out/users_2024-01-01.json.tmp")
        );
        assert_eq!(
            temp_path(Path::new("/out/users_2024-01-01.txt")),
            PathBuf::from("/out/users_2024-01-01.txt.tmp")
        );
    }
}
