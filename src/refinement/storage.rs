//! Persistent, append-only log of user edits to generated drafts

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, instrument, warn};

use super::error::EditLogError;

/// Storage configuration
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// JSON file holding the edit log
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(".outreach/edit_history.json"),
        }
    }
}

/// One user revision of a generated draft
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EditRecord {
    /// The draft as generated
    pub original: String,

    /// The draft as the user left it
    pub edited: String,

    /// Unified diff from `original` to `edited`
    pub diff: String,

    /// When the edit was saved; absent in logs written by older versions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recorded_at: Option<DateTime<Utc>>,
}

/// Ordered sequence of edit records, oldest first
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(transparent)]
pub struct EditLog {
    records: Vec<EditRecord>,
}

impl EditLog {
    pub fn records(&self) -> &[EditRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The last `n` records by append order, still oldest first
    pub fn recent(&self, n: usize) -> &[EditRecord] {
        let start = self.records.len().saturating_sub(n);
        &self.records[start..]
    }

    fn push(&mut self, record: EditRecord) {
        self.records.push(record);
    }
}

impl From<Vec<EditRecord>> for EditLog {
    fn from(records: Vec<EditRecord>) -> Self {
        Self { records }
    }
}

type Result<T> = std::result::Result<T, EditLogError>;

/// File-backed edit log
///
/// The whole file is rewritten on every append. Appends from this process are
/// serialized; concurrent processes get last-writer-wins.
#[derive(Debug, Clone)]
pub struct EditLogStore {
    config: StorageConfig,
    write_lock: Arc<Mutex<()>>,
}

impl Default for EditLogStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EditLogStore {
    /// Create a new store with default configuration
    pub fn new() -> Self {
        Self::with_config(StorageConfig::default())
    }

    /// Create a new store with custom configuration
    pub fn with_config(config: StorageConfig) -> Self {
        Self {
            config,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.config.path
    }

    /// Load the log; a missing or unparsable file yields an empty log
    #[instrument(skip(self), fields(path = %self.config.path.display()))]
    pub async fn load(&self) -> EditLog {
        match self.read().await {
            Ok(log) => log,
            Err(EditLogError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No edit log yet");
                EditLog::default()
            }
            Err(e) => {
                warn!("Ignoring unreadable edit log: {}", e);
                EditLog::default()
            }
        }
    }

    /// Append one record and rewrite the file
    #[instrument(skip_all, fields(path = %self.config.path.display()))]
    pub async fn append(&self, record: EditRecord) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        let mut log = match self.read().await {
            Ok(log) => log,
            Err(EditLogError::Io(e)) if e.kind() == io::ErrorKind::NotFound => EditLog::default(),
            Err(e) if e.is_corrupt() => {
                let backup = self.config.path.with_extension("json.bak");
                warn!("Edit log is corrupt ({}), moving it to {}", e, backup.display());
                fs::rename(&self.config.path, &backup).await?;
                EditLog::default()
            }
            Err(e) => return Err(e),
        };

        log.push(record);
        self.write(&log).await?;
        debug!("Edit log now holds {} records", log.len());
        Ok(())
    }

    async fn read(&self) -> Result<EditLog> {
        let content = fs::read_to_string(&self.config.path).await?;
        if content.trim().is_empty() {
            return Ok(EditLog::default());
        }
        Ok(serde_json::from_str(&content)?)
    }

    /// Write through a temp file so a crash never leaves a truncated log
    async fn write(&self, log: &EditLog) -> Result<()> {
        if let Some(parent) = self.config.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        let tmp = self.config.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_string_pretty(log)?).await?;
        fs::rename(&tmp, &self.config.path).await?;
        Ok(())
    }
}
