//! # Function Configuration
//!
//! Process-level configuration from command-line flags, each with an
//! environment variable fallback.
//!
//! The flags follow the Crossplane function SDKs so the function can be
//! packaged and run the same way: Crossplane mounts TLS certificates and sets
//! `TLS_SERVER_CERTS_DIR`; local development passes `--insecure`.

use crate::constants::{DEFAULT_ADDRESS, DEFAULT_GRPC_MAX_MESSAGE_SIZE, DEFAULT_METRICS_PORT};
use anyhow::{bail, Result};
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Command-line arguments of the function server
#[derive(Debug, Clone, Parser)]
#[command(
    name = "servicebinding-decorator",
    version,
    about = "Crossplane composition function that binds claims to connection secrets"
)]
pub struct FunctionArgs {
    /// Address at which to listen for gRPC connections
    #[arg(long, env = "FUNCTION_ADDRESS", default_value = DEFAULT_ADDRESS)]
    pub address: SocketAddr,

    /// Directory containing tls.crt, tls.key and ca.crt for mTLS
    #[arg(long = "tls-server-certs-dir", env = "TLS_SERVER_CERTS_DIR")]
    pub tls_server_certs_dir: Option<PathBuf>,

    /// Run without mTLS credentials
    #[arg(long)]
    pub insecure: bool,

    /// Emit debug logs
    #[arg(short, long)]
    pub debug: bool,

    /// HTTP port for metrics and health probes
    #[arg(long, env = "METRICS_PORT", default_value_t = DEFAULT_METRICS_PORT)]
    pub metrics_port: u16,

    /// Maximum gRPC message size in bytes
    #[arg(long, env = "GRPC_MAX_MESSAGE_SIZE", default_value_t = DEFAULT_GRPC_MAX_MESSAGE_SIZE)]
    pub max_message_size: usize,
}

/// How the gRPC server secures its transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportSecurity {
    /// Plaintext, for local development
    Insecure,
    /// mTLS with certificates from a directory
    Mtls(PathBuf),
}

impl FunctionArgs {
    /// Transport security selected by the flags
    ///
    /// `--insecure` wins over a certificates directory.
    ///
    /// # Errors
    ///
    /// Fails if neither `--insecure` nor a certificates directory is given.
    pub fn transport_security(&self) -> Result<TransportSecurity> {
        if self.insecure {
            return Ok(TransportSecurity::Insecure);
        }
        match &self.tls_server_certs_dir {
            Some(dir) => Ok(TransportSecurity::Mtls(dir.clone())),
            None => bail!(
                "either --insecure or --tls-server-certs-dir (TLS_SERVER_CERTS_DIR) is required"
            ),
        }
    }
}
