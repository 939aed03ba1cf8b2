//! # Metrics Module
//!
//! Prometheus metrics for monitoring the function, organized by responsibility.
//!
//! ## Sub-modules
//!
//! - `registry` - Metrics registry setup, registration and text encoding
//! - `function_metrics` - Function run metrics (runs, results, binding decisions, duration)

pub mod function_metrics;
pub mod registry;

pub use function_metrics::*;
pub use registry::*;
