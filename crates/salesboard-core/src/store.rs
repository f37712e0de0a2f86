//! Record storage: the store trait the engine queries and an in-memory implementation

use async_trait::async_trait;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::models::TransactionRecord;
use crate::query::RecordQuery;

/// Store-level failures
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Duplicate productId: {product_id}")]
    DuplicateProductId { product_id: String },

    #[error("Snapshot {path} could not be read or written: {message}")]
    Snapshot { path: String, message: String },
}

/// Store reference type
pub type StoreRef = Arc<dyn TransactionStore>;

/// Capabilities the query engine needs from a record store
#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Insert records, rejecting the whole batch if any productId already exists
    async fn insert_many(&self, records: Vec<TransactionRecord>) -> Result<usize, StoreError>;

    /// Remove every record, returning how many were removed
    async fn delete_all(&self) -> Result<usize, StoreError>;

    /// Matching records in insertion order, after skipping `skip`, at most `limit`
    async fn find(
        &self,
        query: &RecordQuery,
        skip: usize,
        limit: usize,
    ) -> Result<Vec<TransactionRecord>, StoreError>;

    /// Number of matching records
    async fn count(&self, query: &RecordQuery) -> Result<usize, StoreError>;

    /// Match count and one page of matches, read from the same state
    ///
    /// The default issues `count` and `find` separately; stores that can do
    /// both under one read should override it.
    async fn find_page(
        &self,
        query: &RecordQuery,
        skip: usize,
        limit: usize,
    ) -> Result<(usize, Vec<TransactionRecord>), StoreError> {
        let total = self.count(query).await?;
        let page = self.find(query, skip, limit).await?;
        Ok((total, page))
    }

    /// Every matching record in insertion order
    async fn find_all(&self, query: &RecordQuery) -> Result<Vec<TransactionRecord>, StoreError> {
        self.find(query, 0, usize::MAX).await
    }

    /// Replace the whole record set
    ///
    /// Implementations should make this all-or-nothing; the default is only
    /// delete-then-insert.
    async fn replace_all(&self, records: Vec<TransactionRecord>) -> Result<usize, StoreError> {
        self.delete_all().await?;
        self.insert_many(records).await
    }
}

/// In-memory record store with an optional JSON snapshot on disk
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<Vec<TransactionRecord>>,
    snapshot: Option<PathBuf>,
}

impl MemoryStore {
    /// Create an empty store without persistence
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `records`
    pub fn with_records(records: Vec<TransactionRecord>) -> Result<Self, StoreError> {
        ensure_unique(&records, &HashSet::new())?;
        Ok(Self {
            records: RwLock::new(records),
            snapshot: None,
        })
    }

    /// Open a store backed by a snapshot file, loading it when it exists
    pub async fn open(snapshot: Option<PathBuf>) -> Result<Self, StoreError> {
        let Some(path) = snapshot else {
            return Ok(Self::new());
        };

        let records = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice::<Vec<TransactionRecord>>(&bytes).map_err(|e| {
                StoreError::Snapshot {
                    path: path.display().to_string(),
                    message: e.to_string(),
                }
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                return Err(StoreError::Snapshot {
                    path: path.display().to_string(),
                    message: e.to_string(),
                })
            }
        };
        ensure_unique(&records, &HashSet::new())?;
        log::info!("Loaded {} records from snapshot {}", records.len(), path.display());

        Ok(Self {
            records: RwLock::new(records),
            snapshot: Some(path),
        })
    }

    /// Number of stored records
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    async fn persist(&self, records: &[TransactionRecord]) -> Result<(), StoreError> {
        let Some(path) = &self.snapshot else {
            return Ok(());
        };
        let to_error = |message: String| StoreError::Snapshot {
            path: path.display().to_string(),
            message,
        };

        let json = serde_json::to_vec(records).map_err(|e| to_error(e.to_string()))?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| to_error(e.to_string()))?;
        }
        let tmp = path.with_extension("tmp");
        tokio::fs::write(&tmp, json)
            .await
            .map_err(|e| to_error(e.to_string()))?;
        tokio::fs::rename(&tmp, path)
            .await
            .map_err(|e| to_error(e.to_string()))?;
        log::debug!("Wrote {} records to snapshot {}", records.len(), path.display());
        Ok(())
    }
}

fn ensure_unique(records: &[TransactionRecord], existing: &HashSet<&str>) -> Result<(), StoreError> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(records.len());
    for record in records {
        let id = record.product_id.as_str();
        if existing.contains(id) || !seen.insert(id) {
            return Err(StoreError::DuplicateProductId {
                product_id: record.product_id.clone(),
            });
        }
    }
    Ok(())
}

#[async_trait]
impl TransactionStore for MemoryStore {
    async fn insert_many(&self, records: Vec<TransactionRecord>) -> Result<usize, StoreError> {
        let mut guard = self.records.write().await;
        {
            let existing: HashSet<&str> = guard.iter().map(|r| r.product_id.as_str()).collect();
            ensure_unique(&records, &existing)?;
        }
        let inserted = records.len();
        guard.extend(records);
        self.persist(&guard).await?;
        Ok(inserted)
    }

    async fn delete_all(&self) -> Result<usize, StoreError> {
        let mut guard = self.records.write().await;
        let removed = guard.len();
        guard.clear();
        self.persist(&guard).await?;
        Ok(removed)
    }

    async fn find(
        &self,
        query: &RecordQuery,
        skip: usize,
        limit: usize,
    ) -> Result<Vec<TransactionRecord>, StoreError> {
        let guard = self.records.read().await;
        Ok(guard
            .iter()
            .filter(|record| query.matches(record))
            .skip(skip)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn count(&self, query: &RecordQuery) -> Result<usize, StoreError> {
        let guard = self.records.read().await;
        Ok(guard.iter().filter(|record| query.matches(record)).count())
    }

    async fn find_page(
        &self,
        query: &RecordQuery,
        skip: usize,
        limit: usize,
    ) -> Result<(usize, Vec<TransactionRecord>), StoreError> {
        let guard = self.records.read().await;
        let mut total = 0;
        let mut page = Vec::new();
        for record in guard.iter().filter(|record| query.matches(record)) {
            if total >= skip && page.len() < limit {
                page.push(record.clone());
            }
            total += 1;
        }
        Ok((total, page))
    }

    async fn replace_all(&self, records: Vec<TransactionRecord>) -> Result<usize, StoreError> {
        ensure_unique(&records, &HashSet::new())?;
        let mut guard = self.records.write().await;
        self.persist(&records).await?;
        let inserted = records.len();
        *guard = records;
        Ok(inserted)
    }
}

// ==================== Tests ====================
