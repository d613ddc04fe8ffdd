//! Prompt templates for translation and structured extraction.
//!
//! Templates use a `{text}` placeholder filled with the delimited batch
//! blob. Defaults are embedded; a prompt directory containing
//! `jd_extraction.txt` and `translation.txt` overrides them.

use std::path::Path;

use crate::error::{ExtractionError, Result};

/// Default template for structured extraction.
///
/// Instructs the model to emit one JSON object per delimited posting, in
/// input order, following the `JobRecord` shape.
pub const EXTRACTION_TEMPLATE: &str = r####"You are an information extraction system for job postings.

The input below contains one or more job postings, each wrapped between
"### JOB START ###" and "### JOB END ###" markers.

For EVERY posting, in the order given, produce one JSON object:
{
    "title": "job title",
    "industry": "industry or sector",
    "employment_type": "full-time | part-time | internship | ...",
    "employment_contract": "permanent | fixed-term | freelance | ...",
    "skills": {
        "hard_skills": ["technical skills, tools, frameworks"],
        "soft_skills": ["interpersonal skills"],
        "required_languages": ["spoken languages required"],
        "nice_to_have": ["explicitly optional skills"]
    },
    "required_experience": {
        "years": {"min": 0, "max": 0},
        "level": "junior | mid | senior | lead"
    },
    "salary": {"min": 0, "max": 0, "currency": "ISO currency code"},
    "education": {"degrees": "comma-separated degree levels", "fields_of_study": "comma-separated fields"}
}

Rules:
- Output a single JSON array with exactly one object per posting, in input order.
- Omit any key whose value is not stated in the posting. Do not guess.
- Output raw JSON only, no prose and no markdown fences.

Postings:
{text}"####;

/// Default template for translation to English.
pub const TRANSLATION_TEMPLATE: &str = r####"Translate the following job postings to English.

Keep the "### JOB START ###" and "### JOB END ###" markers exactly as they
are, and keep the postings in their original order. If a posting is already
in English, copy it unchanged. Output the translated text only.

Postings:
{text}"####;

/// The pair of templates the extractor works with.
#[derive(Debug, Clone)]
pub struct PromptSet {
    /// Free text to structured records
    pub extraction: String,

    /// Source language to English
    pub translation: String,
}

impl Default for PromptSet {
    fn default() -> Self {
        Self {
            extraction: EXTRACTION_TEMPLATE.to_string(),
            translation: TRANSLATION_TEMPLATE.to_string(),
        }
    }
}

impl PromptSet {
    /// Load both templates from a prompt directory.
    ///
    /// Expects `jd_extraction.txt` and `translation.txt`. A missing or
    /// unreadable file is a configuration error, surfaced immediately.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        Ok(Self {
            extraction: read_template(&dir.join("jd_extraction.txt"))?,
            translation: read_template(&dir.join("translation.txt"))?,
        })
    }

    /// Fill a template's `{text}` placeholder.
    pub fn fill(template: &str, text: &str) -> String {
        template.replace("{text}", text)
    }
}

fn read_template(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| ExtractionError::PromptNotFound {
        path: path.to_path_buf(),
        source,
    })
}
