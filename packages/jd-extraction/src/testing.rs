//! Testing utilities including a mock model backend.
//!
//! Lets pipeline and extractor logic be tested without network access or a
//! real LLM.

use std::collections::VecDeque;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::batch::JOB_START;
use crate::error::{ExtractionError, Result};
use crate::traits::JobModel;
use crate::types::JobRecord;

enum MockResponse {
    Records(Vec<JobRecord>),
    Failure,
}

/// A deterministic mock implementation of [`JobModel`].
///
/// `extract` serves queued canned responses first; once the queue is empty
/// it synthesizes one record per `### JOB START ###` delimiter in the blob,
/// so well-behaved batches of any size work without setup. `translate`
/// returns its input unchanged. All calls are recorded for assertions.
#[derive(Default)]
pub struct MockModel {
    responses: Arc<RwLock<VecDeque<MockResponse>>>,
    translate_calls: Arc<RwLock<Vec<String>>>,
    extract_calls: Arc<RwLock<Vec<String>>>,
}

impl MockModel {
    /// Create a new mock with default behavior.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a canned response for the next `extract` call.
    pub fn with_response(self, records: Vec<JobRecord>) -> Self {
        self.responses
            .write()
            .unwrap()
            .push_back(MockResponse::Records(records));
        self
    }

    /// Queue a failure for the next `extract` call.
    pub fn with_failure(self) -> Self {
        self.responses
            .write()
            .unwrap()
            .push_back(MockResponse::Failure);
        self
    }

    /// Blobs passed to `translate` so far.
    pub fn translate_calls(&self) -> Vec<String> {
        self.translate_calls.read().unwrap().clone()
    }

    /// Blobs passed to `extract` so far.
    pub fn extract_calls(&self) -> Vec<String> {
        self.extract_calls.read().unwrap().clone()
    }

    fn synthesize(blob: &str) -> Vec<JobRecord> {
        (0..blob.matches(JOB_START).count())
            .map(|i| JobRecord {
                title: Some(format!("Extracted job {}", i + 1)),
                ..Default::default()
            })
            .collect()
    }
}

#[async_trait]
impl JobModel for MockModel {
    async fn translate(&self, text: &str) -> Result<String> {
        self.translate_calls
            .write()
            .unwrap()
            .push(text.to_string());
        Ok(text.to_string())
    }

    async fn extract(&self, text: &str) -> Result<Vec<JobRecord>> {
        self.extract_calls.write().unwrap().push(text.to_string());

        match self.responses.write().unwrap().pop_front() {
            Some(MockResponse::Records(records)) => Ok(records),
            Some(MockResponse::Failure) => Err(ExtractionError::MalformedResponse {
                reason: "mock failure".to_string(),
            }),
            None => Ok(Self::synthesize(text)),
        }
    }
}
