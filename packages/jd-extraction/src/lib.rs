//! Job-Posting Scraping and Structured-Extraction Library
//!
//! Scrapes job postings from a public job board, extracts structured
//! fields (title, skills, salary, experience, education) from the
//! unstructured text through a language-model pipeline, caches results to
//! avoid redundant work, and scores extractions against ground truth with
//! field-level metrics.
//!
//! # Design
//!
//! - Model-agnostic: the pipeline talks to a [`JobModel`] trait, so tests
//!   run against a deterministic mock and production against Gemini
//! - Batch-oriented: one model call extracts a whole batch of postings
//! - Cache-first: a posting id already in the [`JobCache`] is never
//!   re-sent to the model
//! - Fail-soft: a failed batch is logged and skipped, never aborts a run
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use jd_extraction::{
//!     models, JdExtractor, JobCache, Pipeline, PromptSet,
//!     JobBoardScraper, ScrapeConfig,
//! };
//!
//! let model = models::from_name("gemini-2.0-flash", PromptSet::default())?;
//! let extractor = JdExtractor::new(Arc::new(model));
//! let cache = JobCache::open("cache/job_cache.json")?;
//!
//! let mut scraper = JobBoardScraper::new(ScrapeConfig::new("ML Engineer", "Paris"));
//! scraper.collect().await?;
//!
//! let mut pipeline = Pipeline::new(extractor, cache);
//! let records = pipeline.run(&scraper.batches()).await?;
//! ```
//!
//! # Modules
//!
//! - [`traits`] - the [`JobModel`] capability trait
//! - [`types`] - raw postings and the structured record shape
//! - [`batch`] - delimited batch formatting
//! - [`extractor`] - translate-then-extract chain over a model
//! - [`cache`] - persistent structured-record cache
//! - [`pipeline`] - end-to-end orchestration
//! - [`scraper`] - job board collection
//! - [`eval`] - field-level precision/recall/F1
//! - [`export`] - CSV interchange with the review tool
//! - [`testing`] - deterministic mock model

pub mod batch;
pub mod cache;
pub mod error;
pub mod eval;
pub mod export;
pub mod extractor;
pub mod models;
pub mod pipeline;
pub mod prompts;
pub mod scraper;
pub mod testing;
pub mod traits;
pub mod types;

// Re-export core types at crate root
pub use error::{EvalError, ExtractionError, ScrapeError};
pub use traits::JobModel;
pub use types::{Education, JobRecord, RawJob, RequiredExperience, Salary, Skills, YearsRange};

pub use batch::{format_batch, JOB_END, JOB_START};
pub use cache::JobCache;
pub use eval::{resolve_field_path, Evaluator, FieldMetric, FieldScores};
pub use export::{read_eval_csv, write_csv};
pub use extractor::JdExtractor;
pub use models::GeminiModel;
pub use pipeline::Pipeline;
pub use prompts::PromptSet;
pub use scraper::{JobBoardScraper, ScrapeConfig};

// Re-export testing utilities
pub use testing::MockModel;
