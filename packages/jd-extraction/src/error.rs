//! Typed errors for the extraction pipeline.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during extraction and caching.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// Scrape operation failed
    #[error("scrape failed: {0}")]
    Scrape(#[from] ScrapeError),

    /// LLM model name is not on the allow-list
    #[error("unsupported model: {name}")]
    UnsupportedModel { name: String },

    /// Prompt template file is missing or unreadable
    #[error("prompt template not found: {path}")]
    PromptNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Model backend unavailable or failed
    #[error("model error: {0}")]
    Model(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Model response could not be parsed into structured records
    #[error("malformed model response: {reason}")]
    MalformedResponse { reason: String },

    /// Model returned a different number of records than documents sent
    #[error("record count mismatch: sent {expected} documents, got {actual} records")]
    BatchCountMismatch { expected: usize, actual: usize },

    /// Job id not present in the cache
    #[error("job not found in cache: {job_id}")]
    NotFound { job_id: String },

    /// Record offered for caching carries no job id
    #[error("record has no job_id; cannot cache")]
    MissingJobId,

    /// Cache or export file I/O failed
    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// JSON (de)serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV read/write failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// CSV input lacks a column the operation needs
    #[error("CSV missing required column: {name}")]
    MissingColumn { name: String },
}

/// Errors that can occur while scraping the job board.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Raw-text cache file I/O failed
    #[error("raw cache error: {0}")]
    Io(#[from] std::io::Error),

    /// Raw-text cache file could not be parsed
    #[error("raw cache parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Errors that can occur during evaluation.
#[derive(Debug, Error)]
pub enum EvalError {
    /// Ground-truth and prediction corpora differ in length
    #[error("length mismatch: {ground_truths} ground truths vs {predictions} predictions")]
    LengthMismatch {
        ground_truths: usize,
        predictions: usize,
    },
}

/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Result type alias for scrape operations.
pub type ScrapeResult<T> = std::result::Result<T, ScrapeError>;

/// Result type alias for evaluation operations.
pub type EvalResult<T> = std::result::Result<T, EvalError>;
