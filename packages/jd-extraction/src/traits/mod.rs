//! Core trait abstractions.

pub mod model;

pub use model::JobModel;
