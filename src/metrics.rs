//! Metric names and descriptions for blobgate.
//!
//! The crate only emits through the `metrics` facade; installing a
//! recorder/exporter is left to the embedding application.

use metrics::describe_counter;

// -- Metric name constants ----------------------------------------------------

/// URLs generated (counter). Labels: kind (`public`, `temporary`).
pub const URLS_TOTAL: &str = "blobgate_urls_total";

/// Storage operations forwarded by the adapter (counter). Labels: operation.
pub const STORAGE_OPERATIONS_TOTAL: &str = "blobgate_storage_operations_total";

/// Register metric descriptions with the global recorder.
pub fn describe_metrics() {
    describe_counter!(URLS_TOTAL, "Total blob URLs generated by kind");
    describe_counter!(
        STORAGE_OPERATIONS_TOTAL,
        "Total storage operations forwarded by the adapter"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_names_are_namespaced() {
        for name in [URLS_TOTAL, STORAGE_OPERATIONS_TOTAL] {
            assert!(name.starts_with("blobgate_"));
            assert!(name.ends_with("_total"));
        }
    }

    #[test]
    fn test_describe_without_recorder() {
        // No recorder installed: describing must be a no-op.
        describe_metrics();
    }
}
