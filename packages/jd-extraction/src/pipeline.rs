//! Pipeline orchestrator - the only component with cross-cutting control
//! flow.
//!
//! Per input batch: partition into cached and uncached ids, extract the
//! uncached subset with one model call, zip records back onto their ids,
//! persist, and keep going. A failed batch is logged and dropped; cached
//! hits and earlier batches are never lost.

use tracing::{error, info};

use crate::cache::JobCache;
use crate::error::Result;
use crate::extractor::JdExtractor;
use crate::types::{JobRecord, RawJob};

/// Drives collection output through extraction and the cache.
pub struct Pipeline {
    extractor: JdExtractor,
    cache: JobCache,
    save_raw_job_text: bool,
}

impl Pipeline {
    /// Create a pipeline over an extractor and an open cache.
    pub fn new(extractor: JdExtractor, cache: JobCache) -> Self {
        Self {
            extractor,
            cache,
            save_raw_job_text: false,
        }
    }

    /// Attach the original posting text to each extracted record.
    pub fn with_raw_job_text(mut self, save: bool) -> Self {
        self.save_raw_job_text = save;
        self
    }

    /// Process every batch and return the full ordered result sequence.
    ///
    /// Cached ids are served from the cache and never re-sent to the model.
    /// Extraction failures drop that batch's uncached documents from the
    /// output; the run continues. Re-running with the same cache extracts
    /// each id at most once.
    pub async fn run(&mut self, batches: &[Vec<RawJob>]) -> Result<Vec<JobRecord>> {
        let mut results = Vec::new();

        for (index, batch) in batches.iter().enumerate() {
            let batch_no = index + 1;
            info!(batch = batch_no, jobs = batch.len(), "processing batch");

            let mut uncached: Vec<&RawJob> = Vec::new();
            for job in batch {
                if self.cache.contains(&job.id) {
                    info!(job_id = %job.id, "cache hit");
                    results.push(self.cache.get(&job.id)?);
                } else {
                    uncached.push(job);
                }
            }

            if uncached.is_empty() {
                continue;
            }

            let texts: Vec<&str> = uncached.iter().map(|job| job.text.as_str()).collect();
            let records = match self.extractor.extract_batch(&texts).await {
                Ok(records) => records,
                Err(e) => {
                    error!(batch = batch_no, error = %e, "batch failed; skipping");
                    continue;
                }
            };

            // extract_batch guarantees records.len() == uncached.len()
            for (job, mut record) in uncached.into_iter().zip(records) {
                record.job_id = Some(job.id.clone());
                if self.save_raw_job_text {
                    record.raw_job_text = Some(job.text.clone());
                }
                self.cache.insert(&record)?;
                results.push(record);
            }
        }

        info!(records = results.len(), "pipeline finished");
        Ok(results)
    }

    /// The cache backing this pipeline.
    pub fn cache(&self) -> &JobCache {
        &self.cache
    }
}
