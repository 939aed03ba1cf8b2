//! # Service Binding Decorator
//!
//! A Crossplane composition function that exposes an XR's connection details
//! to its claim as a service binding secret.
//!
//! ## Overview
//!
//! For every XR bound to a claim, the function picks the name of a Secret in
//! the claim's namespace and records it on the XR as `status.binding.name`:
//!
//! 1. **Existing secret** - the claim's own `spec.writeConnectionSecretToRef`,
//!    when it points into the claim's namespace
//! 2. **Synthesized secret** - otherwise, a Secret named after the XR's UID is
//!    composed through provider-kubernetes, holding the merged connection
//!    details of every composed resource
//!
//! ## Features
//!
//! - **Overrides**: `bindingSecretOverrides` entries always win over merged
//!   connection details
//! - **Strict mode**: `requireWriteConnectionSecretToRef` skips synthesis
//! - **mTLS**: serves Crossplane over mutual TLS, or plaintext with `--insecure`
//! - **Prometheus metrics**: runs, results, decisions and latency
//! - **Health probes**: HTTP endpoints for liveness and readiness checks

pub mod config;
pub mod constants;
pub mod crd;
pub mod error;
pub mod function;
pub mod observability;
pub mod proto;
pub mod request;
pub mod resource;
pub mod response;
pub mod runtime;
pub mod server;

pub use function::{run_function, BindingDecision};
