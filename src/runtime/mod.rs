//! # Runtime Module
//!
//! Process startup: tracing, transport security, the gRPC server and the
//! metrics/probe server.

pub mod initialization;
pub mod tls;

pub use initialization::*;
