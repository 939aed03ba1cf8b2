//! gRPC protocol definitions for the Crossplane composition function contract
//!
//! Generated from `proto/run_function.proto`. Crossplane dials the function,
//! sends a `RunFunctionRequest` carrying the observed and desired state of a
//! composite resource, and expects a `RunFunctionResponse` with the amended
//! desired state and any results.

#![allow(missing_docs)] // Generated code doesn't have docs
#![allow(clippy::doc_overindented_list_items)] // Generated proto docs have formatting issues
#![allow(clippy::pedantic)]

/// Generated protobuf and gRPC code for the function runner service
pub mod v1beta1 {
    tonic::include_proto!("apiextensions.r#fn.proto.v1beta1");
}

// Re-export commonly used types at the module level for convenience
pub use v1beta1::*;
