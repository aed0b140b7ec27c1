//! Centralized storage location for label stores.
//!
//! Labels for every input batch live under `~/.envdiff/` (or
//! `$ENVDIFF_HOME`), keyed by a hash of the batch file's canonical path.
//!
//! Layout:
//! ```text
//! ~/.envdiff/
//!   index.json                        # batch_id -> { path, name, last_accessed }
//!   batches/
//!     <16-char-hex-hash>/
//!       labels.json                   # LabelStore
//! ```

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

pub const HOME_ENV: &str = "ENVDIFF_HOME";

#[derive(Error, Debug)]
pub enum CentralError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Could not determine home directory")]
    Home,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchIndexEntry {
    pub batch_id: String,
    pub path: String,
    pub name: String,
    pub last_accessed: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BatchIndex {
    pub batches: HashMap<String, BatchIndexEntry>,
}

/// Return the central storage root: `$ENVDIFF_HOME` if set, otherwise
/// `~/.envdiff/`.
pub fn get_central_root() -> Result<PathBuf, CentralError> {
    if let Ok(home) = std::env::var(HOME_ENV) {
        return Ok(PathBuf::from(home));
    }
    let home = dirs::home_dir().ok_or(CentralError::Home)?;
    Ok(home.join(".envdiff"))
}

fn canonical_path(batch_path: &Path) -> PathBuf {
    batch_path
        .canonicalize()
        .unwrap_or_else(|_| batch_path.to_path_buf())
}

/// 16-character hex id derived from the batch file's canonical path.
pub fn compute_batch_id(batch_path: &Path) -> String {
    let canonical = canonical_path(batch_path);
    let digest = Sha256::digest(canonical.to_string_lossy().as_bytes());
    hex::encode(&digest[..8])
}

pub fn get_batch_storage_dir(batch_path: &Path) -> Result<PathBuf, CentralError> {
    Ok(get_central_root()?
        .join("batches")
        .join(compute_batch_id(batch_path)))
}

pub fn load_index() -> Result<BatchIndex, CentralError> {
    let index_path = get_central_root()?.join("index.json");
    if !index_path.exists() {
        return Ok(BatchIndex::default());
    }
    let content = fs::read_to_string(&index_path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Save the index (atomic: write tmp + rename).
pub fn save_index(index: &BatchIndex) -> Result<(), CentralError> {
    let root = get_central_root()?;
    fs::create_dir_all(&root)?;

    let index_path = root.join("index.json");
    let tmp_path = root.join("index.json.tmp");
    fs::write(&tmp_path, serde_json::to_string_pretty(index)?)?;
    fs::rename(&tmp_path, &index_path)?;
    Ok(())
}

/// Record a batch in the index and create its storage directory.
pub fn register_batch(batch_path: &Path) -> Result<PathBuf, CentralError> {
    let batch_id = compute_batch_id(batch_path);
    let dir = get_batch_storage_dir(batch_path)?;
    fs::create_dir_all(&dir)?;

    let canonical = canonical_path(batch_path);
    let name = canonical
        .file_name()
        .map_or_else(|| "unknown".to_owned(), |n| n.to_string_lossy().into_owned());

    let mut index = load_index()?;
    index.batches.insert(
        batch_id.clone(),
        BatchIndexEntry {
            batch_id,
            path: canonical.to_string_lossy().into_owned(),
            name,
            last_accessed: now_iso8601(),
        },
    );
    save_index(&index)?;
    Ok(dir)
}

/// Registered batches, most recently used first.
pub fn list_registered_batches() -> Result<Vec<BatchIndexEntry>, CentralError> {
    let mut batches: Vec<BatchIndexEntry> = load_index()?.batches.into_values().collect();
    batches.sort_by(|a, b| b.last_accessed.cmp(&a.last_accessed));
    Ok(batches)
}

/// Drop a batch from the index and delete its stored labels.
pub fn unregister_batch(batch_id: &str) -> Result<(), CentralError> {
    let dir = get_central_root()?.join("batches").join(batch_id);
    if dir.exists() {
        fs::remove_dir_all(&dir)?;
    }
    let mut index = load_index()?;
    index.batches.remove(batch_id);
    save_index(&index)
}

/// Current UTC time as `YYYY-MM-DDTHH:MM:SS.mmmZ`.
pub fn now_iso8601() -> String {
    let elapsed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format_timestamp(elapsed.as_secs(), elapsed.subsec_millis())
}

fn format_timestamp(secs: u64, millis: u32) -> String {
    let days = (secs / 86_400) as i64;
    let rem = secs % 86_400;
    let (year, month, day) = civil_from_days(days);
    format!(
        "{year:04}-{month:02}-{day:02}T{:02}:{:02}:{:02}.{millis:03}Z",
        rem / 3600,
        (rem % 3600) / 60,
        rem % 60
    )
}

/// Days since 1970-01-01 to a proleptic Gregorian (year, month, day).
fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = if mp < 10 { mp + 3 } else { mp - 9 } as u32;
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year, month, day)
}
