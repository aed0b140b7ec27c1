use super::central;
use super::LabelStore;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

const LABELS_FILE: &str = "labels.json";

#[derive(Error, Debug)]
pub enum LabelStoreError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Version conflict: expected version {expected}, found {found}. Another process modified the labels.")]
    VersionConflict { expected: u64, found: u64 },
    #[error("Central storage error: {0}")]
    Central(#[from] central::CentralError),
}

fn labels_path(batch_path: &Path) -> Result<PathBuf, LabelStoreError> {
    Ok(central::get_batch_storage_dir(batch_path)?.join(LABELS_FILE))
}

/// Load the labels for a batch file, or an empty store if none were saved.
pub fn load_store(batch_path: &Path) -> Result<LabelStore, LabelStoreError> {
    let path = labels_path(batch_path)?;
    if path.exists() {
        let content = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&content)?)
    } else {
        Ok(LabelStore::new(batch_path.display().to_string()))
    }
}

/// Save labels with optimistic concurrency control.
///
/// Call `store.prepare_for_save()` first. The on-disk version must then be
/// exactly one behind, otherwise `VersionConflict` is returned and nothing
/// is written.
pub fn save_store(batch_path: &Path, store: &LabelStore) -> Result<(), LabelStoreError> {
    let dir = central::register_batch(batch_path)?;
    let path = dir.join(LABELS_FILE);

    if path.exists() && store.version > 0 {
        let existing_content = fs::read_to_string(&path)?;
        if let Ok(existing) = serde_json::from_str::<LabelStore>(&existing_content) {
            let expected = store.version - 1;
            if existing.version != expected {
                return Err(LabelStoreError::VersionConflict {
                    expected,
                    found: existing.version,
                });
            }
        }
    }

    let tmp_path = dir.join(format!("{LABELS_FILE}.tmp"));
    fs::write(&tmp_path, serde_json::to_string_pretty(store)?)?;
    fs::rename(&tmp_path, &path)?;
    log::debug!(
        "[labels] Saved {} annotation(s) (version {}) to {}",
        store.len(),
        store.version,
        path.display()
    );
    Ok(())
}

/// Delete the labels of a batch and drop it from the index.
pub fn delete_store(batch_path: &Path) -> Result<(), LabelStoreError> {
    central::unregister_batch(&central::compute_batch_id(batch_path))?;
    Ok(())
}

/// Summary of a saved label store, for cross-batch listing.
#[derive(Debug, Clone, Serialize)]
pub struct StoreSummary {
    pub batch_id: String,
    pub path: String,
    pub name: String,
    pub labelled: usize,
    pub updated_at: String,
}

/// All saved label stores, most recently updated first.
pub fn list_stores() -> Result<Vec<StoreSummary>, LabelStoreError> {
    let root = central::get_central_root()?;
    let mut summaries = Vec::new();

    for entry in central::list_registered_batches()? {
        let path = root.join("batches").join(&entry.batch_id).join(LABELS_FILE);
        if !path.exists() {
            continue;
        }
        let store = match fs::read_to_string(&path)
            .map_err(LabelStoreError::from)
            .and_then(|content| {
                serde_json::from_str::<LabelStore>(&content).map_err(LabelStoreError::from)
            })
        {
            Ok(store) => store,
            Err(e) => {
                log::warn!("[labels] Failed to read {}: {e}", path.display());
                continue;
            }
        };
        summaries.push(StoreSummary {
            batch_id: entry.batch_id,
            path: entry.path,
            name: entry.name,
            labelled: store.len(),
            updated_at: store.updated_at,
        });
    }

    summaries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    Ok(summaries)
}
