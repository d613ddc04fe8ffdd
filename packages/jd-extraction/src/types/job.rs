//! Job types - raw scraped postings and structured records.

use serde::{Deserialize, Serialize};

/// A raw job posting as collected from the job board.
///
/// The id is the board's stable external identifier. Uniqueness is assumed
/// but not enforced by the collection step; duplicate ids collide in the
/// structured cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawJob {
    /// External job identifier
    pub id: String,

    /// Plain-text posting (salary line + description)
    pub text: String,
}

impl RawJob {
    /// Create a new raw job.
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

// The raw-text cache on disk is a flat JSON array of [id, text] pairs,
// so RawJob round-trips as a 2-tuple rather than an object.
impl Serialize for RawJob {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (&self.id, &self.text).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for RawJob {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (id, text) = <(String, String)>::deserialize(deserializer)?;
        Ok(Self { id, text })
    }
}

/// A structured record extracted from one job posting.
///
/// Every field is optional or default-valued: the model may omit any key and
/// consumers treat a missing key as empty, never as an error. `job_id` is
/// attached by the pipeline after extraction and is the record's identity
/// for caching.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    /// External job identifier, attached after extraction
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,

    /// Job title
    #[serde(default)]
    pub title: Option<String>,

    /// Industry or sector
    #[serde(default)]
    pub industry: Option<String>,

    /// Full-time, part-time, internship, ...
    #[serde(default)]
    pub employment_type: Option<String>,

    /// Permanent, fixed-term, freelance, ...
    #[serde(default)]
    pub employment_contract: Option<String>,

    /// Skill sets grouped by kind
    #[serde(default)]
    pub skills: Skills,

    /// Required experience (years range and seniority level)
    #[serde(default)]
    pub required_experience: RequiredExperience,

    /// Salary range and currency
    #[serde(default)]
    pub salary: Salary,

    /// Education requirements
    #[serde(default)]
    pub education: Education,

    /// Original posting text, attached only when requested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_job_text: Option<String>,
}

impl JobRecord {
    /// Create an empty record carrying only a job id.
    pub fn with_job_id(id: impl Into<String>) -> Self {
        Self {
            job_id: Some(id.into()),
            ..Default::default()
        }
    }
}

/// Skill sets extracted from a posting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Skills {
    /// Technical skills (languages, tools, frameworks)
    #[serde(default)]
    pub hard_skills: Vec<String>,

    /// Interpersonal skills
    #[serde(default)]
    pub soft_skills: Vec<String>,

    /// Spoken languages required by the role
    #[serde(default)]
    pub required_languages: Vec<String>,

    /// Explicitly optional skills
    #[serde(default)]
    pub nice_to_have: Vec<String>,
}

/// A min/max range of years.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct YearsRange {
    #[serde(default)]
    pub min: Option<u32>,

    #[serde(default)]
    pub max: Option<u32>,
}

/// Experience requirements.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequiredExperience {
    /// Years of experience asked for
    #[serde(default)]
    pub years: YearsRange,

    /// Seniority level (junior, senior, lead, ...)
    #[serde(default)]
    pub level: Option<String>,
}

/// Salary range as stated in the posting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Salary {
    #[serde(default)]
    pub min: Option<f64>,

    #[serde(default)]
    pub max: Option<f64>,

    #[serde(default)]
    pub currency: Option<String>,
}

/// Education requirements.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Education {
    /// Degree levels (comma-separated as emitted by the model)
    #[serde(default)]
    pub degrees: Option<String>,

    /// Fields of study (comma-separated as emitted by the model)
    #[serde(default)]
    pub fields_of_study: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_keys_deserialize_to_defaults() {
        let record: JobRecord = serde_json::from_str(r#"{"title": "Data Scientist"}"#).unwrap();

        assert_eq!(record.title.as_deref(), Some("Data Scientist"));
        assert!(record.job_id.is_none());
        assert!(record.skills.hard_skills.is_empty());
        assert!(record.salary.min.is_none());
        assert!(record.required_experience.years.max.is_none());
    }

    #[test]
    fn test_nested_fields_deserialize() {
        let json = r#"{
            "title": "ML Engineer",
            "skills": {"hard_skills": ["Python", "SQL"], "soft_skills": ["communication"]},
            "required_experience": {"years": {"min": 2, "max": 5}, "level": "senior"},
            "salary": {"min": 50000.0, "max": 70000.0, "currency": "EUR"},
            "education": {"degrees": "Master", "fields_of_study": "Computer Science"}
        }"#;

        let record: JobRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.skills.hard_skills, vec!["Python", "SQL"]);
        assert_eq!(record.required_experience.years.min, Some(2));
        assert_eq!(record.salary.currency.as_deref(), Some("EUR"));
        assert_eq!(record.education.degrees.as_deref(), Some("Master"));
    }

    #[test]
    fn test_raw_job_round_trips_as_pair() {
        let job = RawJob::new("4242", "Salary: Not specified.\n\nDescription:\ntext");
        let json = serde_json::to_string(&job).unwrap();
        assert!(json.starts_with('['));

        let back: RawJob = serde_json::from_str(&json).unwrap();
        assert_eq!(back, job);
    }
}
