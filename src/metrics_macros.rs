//! Metrics helper macros
//!
//! The wrapped statement is compiled out without the `metrics` feature, so
//! call sites need no `#[cfg]` of their own.

/// Increment a CounterVec with given labels.
///
/// Usage:
/// ```ignore
/// inc_counter!(METRICS.redirects_total, &["302"]);
/// ```
macro_rules! inc_counter {
    ($counter:expr, $labels:expr) => {
        #[cfg(feature = "metrics")]
        $counter.with_label_values($labels).inc();
    };
}
