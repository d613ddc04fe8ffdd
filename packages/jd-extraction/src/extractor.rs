//! Field extractor - one batch of raw text in, ordered records out.

use std::sync::Arc;

use tracing::debug;

use crate::batch::format_batch;
use crate::error::{ExtractionError, Result};
use crate::traits::JobModel;
use crate::types::JobRecord;

/// Turns a batch of raw posting texts into structured records.
///
/// Two pipeline shapes, selected once at construction: extraction only, or
/// translation followed by extraction. No state beyond the model handle.
pub struct JdExtractor {
    model: Arc<dyn JobModel>,
    use_translation: bool,
}

impl JdExtractor {
    /// Create an extractor over the given model backend.
    pub fn new(model: Arc<dyn JobModel>) -> Self {
        Self {
            model,
            use_translation: false,
        }
    }

    /// Route batches through a translation step before extraction.
    pub fn with_translation(mut self, use_translation: bool) -> Self {
        self.use_translation = use_translation;
        self
    }

    /// Extract one record per input text, preserving input order.
    ///
    /// Fails with [`ExtractionError::BatchCountMismatch`] when the model
    /// returns a different number of records than documents sent; a
    /// positional zip over mismatched lengths would silently misalign ids
    /// and records.
    pub async fn extract_batch<S: AsRef<str>>(&self, texts: &[S]) -> Result<Vec<JobRecord>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let mut blob = format_batch(texts);

        if self.use_translation {
            debug!(documents = texts.len(), "translating batch");
            blob = self.model.translate(&blob).await?;
        }

        debug!(documents = texts.len(), "extracting batch");
        let records = self.model.extract(&blob).await?;

        if records.len() != texts.len() {
            return Err(ExtractionError::BatchCountMismatch {
                expected: texts.len(),
                actual: records.len(),
            });
        }

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockModel;

    #[tokio::test]
    async fn test_extract_batch_returns_one_record_per_text() {
        let model = Arc::new(MockModel::new());
        let extractor = JdExtractor::new(model.clone());

        let records = extractor
            .extract_batch(&["job one", "job two", "job three"])
            .await
            .unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(model.extract_calls().len(), 1);
        assert!(model.translate_calls().is_empty());
    }

    #[tokio::test]
    async fn test_translation_step_runs_first_when_enabled() {
        let model = Arc::new(MockModel::new());
        let extractor = JdExtractor::new(model.clone()).with_translation(true);

        extractor.extract_batch(&["un poste"]).await.unwrap();

        assert_eq!(model.translate_calls().len(), 1);
        assert_eq!(model.extract_calls().len(), 1);
    }

    #[tokio::test]
    async fn test_count_mismatch_fails_hard() {
        let model = Arc::new(MockModel::new().with_response(vec![JobRecord::default()]));
        let extractor = JdExtractor::new(model);

        let err = extractor.extract_batch(&["a", "b"]).await.unwrap_err();
        assert!(matches!(
            err,
            ExtractionError::BatchCountMismatch {
                expected: 2,
                actual: 1
            }
        ));
    }

    #[tokio::test]
    async fn test_empty_batch_skips_model() {
        let model = Arc::new(MockModel::new());
        let extractor = JdExtractor::new(model.clone());

        let texts: Vec<&str> = vec![];
        let records = extractor.extract_batch(&texts).await.unwrap();

        assert!(records.is_empty());
        assert!(model.extract_calls().is_empty());
    }
}
