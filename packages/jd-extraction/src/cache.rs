//! Persistent structured-record cache keyed by job id.
//!
//! A single JSON document on disk mapping `job_id` to its record. The
//! pipeline only ever inserts; there is no update, delete, TTL, or
//! invalidation. Single-process, single-writer discipline is assumed.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use tracing::debug;

use crate::error::{ExtractionError, Result};
use crate::types::JobRecord;

/// File-backed `job_id -> JobRecord` store.
pub struct JobCache {
    path: PathBuf,
    entries: IndexMap<String, JobRecord>,
}

impl JobCache {
    /// Open a cache file, creating parent directories as needed.
    ///
    /// A missing file is an empty cache; it is created on first insert.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let entries = if path.exists() {
            let data = std::fs::read_to_string(&path)?;
            serde_json::from_str(&data)?
        } else {
            IndexMap::new()
        };

        debug!(path = %path.display(), entries = entries.len(), "cache opened");
        Ok(Self { path, entries })
    }

    /// Whether a record for this job id is cached.
    pub fn contains(&self, job_id: &str) -> bool {
        self.entries.contains_key(job_id)
    }

    /// Get the cached record for a job id.
    ///
    /// Callers must gate with [`contains`](Self::contains); an absent id is
    /// a contract violation surfaced as [`ExtractionError::NotFound`].
    pub fn get(&self, job_id: &str) -> Result<JobRecord> {
        self.entries
            .get(job_id)
            .cloned()
            .ok_or_else(|| ExtractionError::NotFound {
                job_id: job_id.to_string(),
            })
    }

    /// Insert a record under its `job_id` and persist to disk.
    ///
    /// The record must carry a `job_id`. Re-inserting an existing id
    /// overwrites the stored record (map semantics); the pipeline never
    /// does this deliberately, but duplicate ids within one run would.
    pub fn insert(&mut self, record: &JobRecord) -> Result<()> {
        let job_id = record
            .job_id
            .clone()
            .ok_or(ExtractionError::MissingJobId)?;

        self.entries.insert(job_id, record.clone());
        self.persist()
    }

    /// Number of cached records.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn persist(&self) -> Result<()> {
        let data = serde_json::to_string_pretty(&self.entries)?;
        std::fs::write(&self.path, data)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, title: &str) -> JobRecord {
        JobRecord {
            job_id: Some(id.to_string()),
            title: Some(title.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_insert_get_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = JobCache::open(dir.path().join("jobs.json")).unwrap();

        let rec = record("101", "Data Engineer");
        cache.insert(&rec).unwrap();

        assert!(cache.contains("101"));
        assert_eq!(cache.get("101").unwrap(), rec);
    }

    #[test]
    fn test_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jobs.json");

        {
            let mut cache = JobCache::open(&path).unwrap();
            cache.insert(&record("101", "Data Engineer")).unwrap();
            cache.insert(&record("102", "ML Engineer")).unwrap();
        }

        let cache = JobCache::open(&path).unwrap();
        assert_eq!(cache.len(), 2);
        assert_eq!(
            cache.get("102").unwrap().title.as_deref(),
            Some("ML Engineer")
        );
    }

    #[test]
    fn test_get_absent_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let cache = JobCache::open(dir.path().join("jobs.json")).unwrap();

        let err = cache.get("999").unwrap_err();
        assert!(matches!(err, ExtractionError::NotFound { job_id } if job_id == "999"));
    }

    #[test]
    fn test_insert_without_job_id_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = JobCache::open(dir.path().join("jobs.json")).unwrap();

        let err = cache.insert(&JobRecord::default()).unwrap_err();
        assert!(matches!(err, ExtractionError::MissingJobId));
    }

    #[test]
    fn test_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("cache").join("jobs.json");

        let mut cache = JobCache::open(&nested).unwrap();
        cache.insert(&record("1", "x")).unwrap();
        assert!(nested.exists());
    }
}
