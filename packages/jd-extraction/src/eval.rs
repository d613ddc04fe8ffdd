//! Field-level evaluation with NER-style set-overlap metrics.
//!
//! Compares ground-truth and predicted records field by field, where a
//! field is addressed by a dotted path into the nested record (e.g.
//! `skills.hard_skills`). Counts are accumulated over the whole corpus
//! before rates are computed (micro-averaging).

use std::collections::HashSet;

use indexmap::IndexMap;
use serde_json::Value;
use tracing::warn;

use crate::error::{EvalError, EvalResult};

/// Resolve a dotted field path against a nested record.
///
/// A missing segment or a non-object intermediate resolves to an empty
/// list (logged at warn, never fatal). A resolved array is used as-is, a
/// resolved string is split on commas and trimmed, any other scalar is
/// wrapped as a single item. JSON null resolves to nothing.
pub fn resolve_field_path(record: &Value, field_path: &str) -> Vec<String> {
    let mut current = record;

    for key in field_path.split('.') {
        match current {
            Value::Object(map) => match map.get(key) {
                Some(value) => current = value,
                None => {
                    warn!(field = field_path, "field not found in record");
                    return Vec::new();
                }
            },
            _ => {
                warn!(
                    field = field_path,
                    "field not found: intermediate value is not an object"
                );
                return Vec::new();
            }
        }
    }

    match current {
        Value::Array(items) => items.iter().filter_map(item_to_string).collect(),
        Value::String(s) => s.split(',').map(|item| item.trim().to_string()).collect(),
        Value::Null => Vec::new(),
        other => vec![value_to_string(other)],
    }
}

fn item_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        other => Some(value_to_string(other)),
    }
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Accumulated true-positive / false-positive / false-negative counts for
/// one field across a corpus.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldMetric {
    pub true_positives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
}

impl FieldMetric {
    /// Update counts from one document's item lists.
    ///
    /// Items are compared as case-insensitive sets: whole-item exact match
    /// after lowercasing, not fuzzy or token-level. A predicted synonym
    /// that is not an exact match counts as both a false positive and a
    /// false negative.
    pub fn update(&mut self, true_items: &[String], pred_items: &[String]) {
        let true_set: HashSet<String> = true_items.iter().map(|s| s.to_lowercase()).collect();
        let pred_set: HashSet<String> = pred_items.iter().map(|s| s.to_lowercase()).collect();

        self.true_positives += true_set.intersection(&pred_set).count();
        self.false_positives += pred_set.difference(&true_set).count();
        self.false_negatives += true_set.difference(&pred_set).count();
    }

    /// Derived precision/recall/F1, each 0.0 when its denominator is 0.
    pub fn scores(&self) -> FieldScores {
        let predicted = self.true_positives + self.false_positives;
        let actual = self.true_positives + self.false_negatives;

        let precision = if predicted > 0 {
            self.true_positives as f64 / predicted as f64
        } else {
            0.0
        };
        let recall = if actual > 0 {
            self.true_positives as f64 / actual as f64
        } else {
            0.0
        };
        let f1 = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };

        FieldScores {
            precision,
            recall,
            f1,
        }
    }
}

/// Precision, recall and F1 for one field over the corpus.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct FieldScores {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

/// Evaluates structured extraction over a list of dotted field paths.
pub struct Evaluator {
    fields: Vec<String>,
}

impl Evaluator {
    /// Create an evaluator for the given field paths.
    pub fn new(fields: Vec<String>) -> Self {
        Self { fields }
    }

    /// Evaluate a corpus of paired ground-truth and predicted records.
    ///
    /// Fails with [`EvalError::LengthMismatch`] before any per-field
    /// computation when the corpora differ in length. Accumulators reset at
    /// the start of every call.
    pub fn evaluate_batch(
        &self,
        ground_truths: &[Value],
        predictions: &[Value],
    ) -> EvalResult<IndexMap<String, FieldScores>> {
        if ground_truths.len() != predictions.len() {
            return Err(EvalError::LengthMismatch {
                ground_truths: ground_truths.len(),
                predictions: predictions.len(),
            });
        }

        let mut metrics: IndexMap<String, FieldMetric> = self
            .fields
            .iter()
            .map(|field| (field.clone(), FieldMetric::default()))
            .collect();

        for (truth, prediction) in ground_truths.iter().zip(predictions) {
            for field in &self.fields {
                let true_items = resolve_field_path(truth, field);
                let pred_items = resolve_field_path(prediction, field);
                metrics[field].update(&true_items, &pred_items);
            }
        }

        Ok(metrics
            .into_iter()
            .map(|(field, metric)| (field, metric.scores()))
            .collect())
    }
}
