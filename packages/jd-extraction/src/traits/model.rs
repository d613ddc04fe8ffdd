//! Model trait for LLM-backed transforms.
//!
//! The trait abstracts the two capabilities the pipeline needs from a
//! language model, so the extractor and tests can substitute a
//! deterministic fake without network access.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::JobRecord;

/// Language-model capabilities used by the extraction pipeline.
///
/// Implementations wrap a specific provider and handle prompting and
/// response parsing. Safe to reuse across many batches sequentially; not
/// claimed safe for concurrent shared use.
#[async_trait]
pub trait JobModel: Send + Sync {
    /// Translate a delimited batch blob to English, preserving the
    /// document markers and order.
    async fn translate(&self, text: &str) -> Result<String>;

    /// Extract one structured record per delimited posting, in input
    /// order.
    ///
    /// The model is the authority on the record count; callers verify it
    /// against the number of documents sent.
    async fn extract(&self, text: &str) -> Result<Vec<JobRecord>>;
}
