//! # Service Binding Decorator
//!
//! Serves the composition function over gRPC until SIGTERM or Ctrl-C.
//!
//! ## Usage
//!
//! ```text
//! servicebinding-decorator --tls-server-certs-dir /tls/server
//! servicebinding-decorator --insecure --debug
//! ```

use anyhow::Result;
use clap::Parser;
use servicebinding_decorator::config::FunctionArgs;
use servicebinding_decorator::runtime;

#[tokio::main]
async fn main() -> Result<()> {
    runtime::run(FunctionArgs::parse()).await
}
