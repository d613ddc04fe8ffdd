//! Data types for raw documents and structured job records.

pub mod job;

pub use job::{Education, JobRecord, RawJob, RequiredExperience, Salary, Skills, YearsRange};
