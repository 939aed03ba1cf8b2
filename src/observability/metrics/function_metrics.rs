//! # Function Metrics
//!
//! Metrics for function runs: invocations, results by severity, binding
//! decisions and run duration.

use crate::observability::metrics::registry::REGISTRY;
use anyhow::Result;
use prometheus::{Histogram, IntCounter, IntCounterVec};
use std::sync::LazyLock;

static RUNS_TOTAL: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "servicebinding_function_runs_total",
        "Total number of RunFunction calls",
    )
    .expect("Failed to create RUNS_TOTAL metric - this should never happen")
});

static RESULTS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "servicebinding_function_results_total",
            "Total number of results returned, by severity",
        ),
        &["severity"],
    )
    .expect("Failed to create RESULTS_TOTAL metric - this should never happen")
});

static DECISIONS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "servicebinding_binding_decisions_total",
            "Total number of binding decisions, by outcome",
        ),
        &["decision"],
    )
    .expect("Failed to create DECISIONS_TOTAL metric - this should never happen")
});

static RUN_DURATION: LazyLock<Histogram> = LazyLock::new(|| {
    Histogram::with_opts(
        prometheus::HistogramOpts::new(
            "servicebinding_function_duration_seconds",
            "Duration of RunFunction calls in seconds",
        )
        .buckets(vec![0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5]),
    )
    .expect("Failed to create RUN_DURATION metric - this should never happen")
});

/// Register function metrics with the registry
pub(crate) fn register_function_metrics() -> Result<()> {
    REGISTRY.register(Box::new(RUNS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(RESULTS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(DECISIONS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(RUN_DURATION.clone()))?;
    Ok(())
}

pub fn increment_runs() {
    RUNS_TOTAL.inc();
}

pub fn increment_results(severity: &str, count: usize) {
    RESULTS_TOTAL
        .with_label_values(&[severity])
        .inc_by(u64::try_from(count).unwrap_or(u64::MAX));
}

pub fn increment_decisions(decision: &str) {
    DECISIONS_TOTAL.with_label_values(&[decision]).inc();
}

pub fn observe_run_duration(duration: f64) {
    RUN_DURATION.observe(duration);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_increment_runs() {
        let before = RUNS_TOTAL.get();
        increment_runs();
        assert!(RUNS_TOTAL.get() > before);
    }

    #[test]
    fn test_increment_results_by_severity() {
        let before = RESULTS_TOTAL.with_label_values(&["warning"]).get();
        increment_results("warning", 2);
        let after = RESULTS_TOTAL.with_label_values(&["warning"]).get();
        assert!(after >= before + 2);
    }

    #[test]
    fn test_increment_decisions() {
        let before = DECISIONS_TOTAL.with_label_values(&["not_bindable"]).get();
        increment_decisions("not_bindable");
        let after = DECISIONS_TOTAL.with_label_values(&["not_bindable"]).get();
        assert!(after > before);
    }

    #[test]
    fn test_observe_run_duration() {
        let before = RUN_DURATION.get_sample_count();
        observe_run_duration(0.002);
        assert!(RUN_DURATION.get_sample_count() > before);
    }
}
