// THEORY:
// The color store is the persistence boundary of the picker. It is deliberately tiny: an
// append-only collection of `StoredColorRecord`s with two operations, "append one" and
// "give me the newest". There is no update and no delete.
//
// Stores are plain values that are constructed once and injected into whoever needs them
// (`Arc<dyn ColorStore>`); there is no process-wide client. Dropping the last handle is
// the teardown.
//
// "Newest" means the largest `createdAt`. Two saves inside the same millisecond tie on
// timestamp, so ties go to the record that was appended later.

use crate::record::{NewColorRecord, StoredColorRecord, now_millis};
use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Append-only storage for picked colors.
pub trait ColorStore: Send + Sync {
    /// Stamps `record` with the current time and appends it.
    fn save(&self, record: NewColorRecord) -> StoreResult<StoredColorRecord>;

    /// The record with the greatest `createdAt`, or `None` when nothing was saved yet.
    fn fetch_latest(&self) -> StoreResult<Option<StoredColorRecord>>;
}

fn latest(records: impl Iterator<Item = StoredColorRecord>) -> Option<StoredColorRecord> {
    // `max_by_key` returns the last of equal maxima, which is the later append.
    records.max_by_key(|record| record.created_at)
}

/// Keeps records in memory for the lifetime of the process.
#[derive(Debug, Default)]
pub struct MemoryColorStore {
    records: Mutex<Vec<StoredColorRecord>>,
}

impl MemoryColorStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.lock().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ColorStore for MemoryColorStore {
    fn save(&self, record: NewColorRecord) -> StoreResult<StoredColorRecord> {
        let stored = record.into_stored(now_millis());
        self.records
            .lock()
            .map_err(|_| StoreError::Unavailable("record lock poisoned".to_string()))?
            .push(stored.clone());
        Ok(stored)
    }

    fn fetch_latest(&self) -> StoreResult<Option<StoredColorRecord>> {
        let records = self
            .records
            .lock()
            .map_err(|_| StoreError::Unavailable("record lock poisoned".to_string()))?;
        Ok(latest(records.iter().cloned()))
    }
}

/// Appends one JSON document per line to a file.
///
/// Each save is a single `write_all` of a complete, newline-terminated line. If a write
/// is cut short, the unterminated tail is skipped on read and cut off before the next
/// save, so a failed save never shows up as a record and never merges with a later one.
/// Lines that do not parse are logged and skipped.
#[derive(Debug)]
pub struct JsonLinesColorStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonLinesColorStore {
    /// Opens (creating if needed) the store file and its parent directory.
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        OpenOptions::new().create(true).append(true).open(&path)?;
        debug!(path = %path.display(), "Opened JSON lines color store");
        Ok(Self {
            path,
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> StoreResult<Vec<StoredColorRecord>> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut records = Vec::new();
        for (index, line) in contents.split_inclusive('\n').enumerate() {
            let Some(line) = line.strip_suffix('\n') else {
                warn!(path = %self.path.display(), line = index + 1, "Skipping unterminated trailing record");
                break;
            };
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str(line) {
                Ok(record) => records.push(record),
                Err(e) => {
                    warn!(path = %self.path.display(), line = index + 1, error = %e, "Skipping corrupt record")
                }
            }
        }
        Ok(records)
    }
}

impl ColorStore for JsonLinesColorStore {
    fn save(&self, record: NewColorRecord) -> StoreResult<StoredColorRecord> {
        let stored = record.into_stored(now_millis());
        let mut line = serde_json::to_string(&stored)?;
        line.push('\n');

        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| StoreError::Unavailable("write lock poisoned".to_string()))?;
        let mut file = OpenOptions::new()
            .read(true)
            .create(true)
            .append(true)
            .open(&self.path)?;
        let dropped = drop_torn_tail(&mut file)?;
        if dropped > 0 {
            warn!(path = %self.path.display(), bytes = dropped, "Dropped unterminated record left by an earlier save");
        }
        file.write_all(line.as_bytes())?;
        file.flush()?;
        Ok(stored)
    }

    fn fetch_latest(&self) -> StoreResult<Option<StoredColorRecord>> {
        Ok(latest(self.read_all()?.into_iter()))
    }
}

/// Truncates the file back to its last newline when it ends mid-line. Returns how many
/// bytes were removed.
fn drop_torn_tail(file: &mut File) -> std::io::Result<u64> {
    let len = file.metadata()?.len();
    if len == 0 {
        return Ok(0);
    }

    let mut last = [0u8; 1];
    file.seek(SeekFrom::End(-1))?;
    file.read_exact(&mut last)?;
    if last[0] == b'\n' {
        return Ok(0);
    }

    let mut contents = Vec::with_capacity(len as usize);
    file.seek(SeekFrom::Start(0))?;
    file.read_to_end(&mut contents)?;
    let keep = contents
        .iter()
        .rposition(|&b| b == b'\n')
        .map_or(0, |i| i as u64 + 1);
    file.set_len(keep)?;
    Ok(len - keep)
}
