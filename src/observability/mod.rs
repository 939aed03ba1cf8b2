//! # Observability
//!
//! Prometheus metrics and the HTTP server exposing them alongside health probes.

pub mod metrics;
pub mod server;
