//! Audit record storage and persistence.

use async_trait::async_trait;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::error::{SignerError, SignerResult};

/// One signing attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub id: i64,
    pub network: String,
    /// Request as JSON text.
    pub payload: String,
    /// `None` while the request is in flight.
    pub success: Option<bool>,
    /// Response as JSON text, set on success.
    pub response: Option<String>,
    /// Error message, set on failure.
    pub error: Option<String>,
}

impl AuditRecord {
    pub fn is_finalized(&self) -> bool {
        self.success.is_some()
    }
}

/// Terminal state of a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditOutcome {
    Success { response: String },
    Failure { error: String },
}

/// Backing store for audit records.
#[async_trait]
pub trait AuditStore: Send + Sync {
    /// Insert an in-flight record and return its id.
    async fn create(&self, network: &str, payload: String) -> SignerResult<i64>;

    /// Apply `outcome` to record `id` if it is still in flight.
    ///
    /// Returns `false` when the record was already finalized.
    async fn finalize(&self, id: i64, outcome: AuditOutcome) -> SignerResult<bool>;

    async fn get(&self, id: i64) -> SignerResult<Option<AuditRecord>>;
}

/// Thread-safe in-memory store with optional JSON file persistence.
///
/// With a path configured, every `create` and `finalize` rewrites the file
/// before returning, so a crash never loses a record whose signature was
/// handed out.
#[derive(Clone, Debug)]
pub struct MemoryAuditStore {
    records: Arc<DashMap<i64, AuditRecord>>,
    next_id: Arc<AtomicI64>,
    persistence_path: Option<PathBuf>,
    // Serializes snapshots so an older one never overwrites a newer one.
    write_lock: Arc<Mutex<()>>,
}

impl Default for MemoryAuditStore {
    fn default() -> Self {
        Self::new(None)
    }
}

impl MemoryAuditStore {
    pub fn new(persistence_path: Option<PathBuf>) -> Self {
        Self {
            records: Arc::new(DashMap::new()),
            next_id: Arc::new(AtomicI64::new(1)),
            persistence_path,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Open a store backed by `path`, loading existing records if the file exists.
    pub fn load_from_file(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let store = Self::new(Some(path.to_path_buf()));

        if path.exists() {
            let reader = BufReader::new(File::open(path)?);
            let records: Vec<AuditRecord> = serde_json::from_reader(reader)?;

            let mut max_id = 0;
            for record in records {
                max_id = max_id.max(record.id);
                store.records.insert(record.id, record);
            }
            store.next_id.store(max_id + 1, Ordering::SeqCst);

            tracing::info!(
                path = %path.display(),
                records = store.records.len(),
                "Loaded audit records"
            );
        }

        Ok(store)
    }

    /// Write all records to the persistence path, ordered by id. No-op without a path.
    pub fn save_to_file(&self) -> std::io::Result<()> {
        let Some(path) = &self.persistence_path else {
            return Ok(());
        };

        let records = self.snapshot();
        write_atomically(path, &records)?;

        tracing::info!(path = %path.display(), records = records.len(), "Saved audit records");
        Ok(())
    }

    fn snapshot(&self) -> Vec<AuditRecord> {
        let mut records: Vec<AuditRecord> =
            self.records.iter().map(|r| r.value().clone()).collect();
        records.sort_by_key(|r| r.id);
        records
    }

    /// Write the current records through to disk. No-op without a path.
    async fn persist(&self) -> SignerResult<()> {
        let Some(path) = self.persistence_path.clone() else {
            return Ok(());
        };

        let _guard = self.write_lock.lock().await;
        let records = self.snapshot();
        let target = path.clone();

        tokio::task::spawn_blocking(move || write_atomically(&target, &records))
            .await
            .map_err(|e| SignerError::Audit(format!("audit write task failed: {}", e)))?
            .map_err(|e| {
                SignerError::Audit(format!("cannot write '{}': {}", path.display(), e))
            })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of records still waiting for an outcome.
    pub fn pending(&self) -> usize {
        self.records.iter().filter(|r| !r.is_finalized()).count()
    }
}

/// Write `records` to a sibling temp file, sync it, then rename over `path`.
fn write_atomically(path: &Path, records: &[AuditRecord]) -> std::io::Result<()> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    let file = File::create(&tmp)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, records)?;
    writer.flush()?;
    writer.get_ref().sync_all()?;
    drop(writer);

    std::fs::rename(&tmp, path)
}

#[async_trait]
impl AuditStore for MemoryAuditStore {
    async fn create(&self, network: &str, payload: String) -> SignerResult<i64> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.records.insert(
            id,
            AuditRecord {
                id,
                network: network.to_string(),
                payload,
                success: None,
                response: None,
                error: None,
            },
        );

        // An unpersisted record would let signing run unaudited.
        if let Err(e) = self.persist().await {
            self.records.remove(&id);
            return Err(e);
        }
        Ok(id)
    }

    async fn finalize(&self, id: i64, outcome: AuditOutcome) -> SignerResult<bool> {
        {
            let mut record = self
                .records
                .get_mut(&id)
                .ok_or_else(|| SignerError::Audit(format!("unknown audit record {}", id)))?;

            if record.is_finalized() {
                return Ok(false);
            }

            match outcome {
                AuditOutcome::Success { response } => {
                    record.success = Some(true);
                    record.response = Some(response);
                }
                AuditOutcome::Failure { error } => {
                    record.success = Some(false);
                    record.error = Some(error);
                }
            }
        }

        self.persist().await?;
        Ok(true)
    }

    async fn get(&self, id: i64) -> SignerResult<Option<AuditRecord>> {
        Ok(self.records.get(&id).map(|r| r.value().clone()))
    }
}
