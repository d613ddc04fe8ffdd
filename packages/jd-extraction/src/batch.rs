//! Batch formatting - concatenate documents for a single model call.
//!
//! Wrapping each posting between distinct delimiters lets one model
//! invocation return one structured record per posting, amortizing latency
//! and cost over the batch while keeping document boundaries visible to the
//! model.

/// Marks the start of one posting inside a batch blob.
pub const JOB_START: &str = "### JOB START ###";

/// Marks the end of one posting inside a batch blob.
pub const JOB_END: &str = "### JOB END ###";

/// Join raw posting texts into a single delimited blob.
///
/// Each document is trimmed and wrapped between [`JOB_START`] and
/// [`JOB_END`], with a blank line between documents. Input order is
/// preserved. An empty input yields an empty string; callers must not send
/// an empty blob to the model.
pub fn format_batch<S: AsRef<str>>(texts: &[S]) -> String {
    texts
        .iter()
        .map(|text| format!("{}\n{}\n{}", JOB_START, text.as_ref().trim(), JOB_END))
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_delimiter_pair_per_document() {
        let texts = vec!["first job", "second job", "third job"];
        let blob = format_batch(&texts);

        assert_eq!(blob.matches(JOB_START).count(), 3);
        assert_eq!(blob.matches(JOB_END).count(), 3);
    }

    #[test]
    fn test_input_order_preserved() {
        let blob = format_batch(&["alpha", "beta"]);

        let alpha = blob.find("alpha").unwrap();
        let beta = blob.find("beta").unwrap();
        assert!(alpha < beta);
    }

    #[test]
    fn test_documents_trimmed_and_separated() {
        let blob = format_batch(&["  padded text \n"]);

        assert!(blob.contains(&format!("{}\npadded text\n{}", JOB_START, JOB_END)));

        let blob = format_batch(&["a", "b"]);
        assert!(blob.contains(&format!("{}\n\n{}", JOB_END, JOB_START)));
    }

    #[test]
    fn test_empty_input_yields_empty_blob() {
        let texts: Vec<&str> = vec![];
        assert_eq!(format_batch(&texts), "");
    }
}
