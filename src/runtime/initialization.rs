//! # Initialization
//!
//! Function runtime startup: rustls setup, tracing, metrics, the probe
//! server and the gRPC server, with graceful shutdown on SIGTERM or Ctrl-C.

use crate::config::{FunctionArgs, TransportSecurity};
use crate::constants::{DEBUG_LOG_FILTER, DEFAULT_LOG_FILTER};
use crate::observability;
use crate::observability::server::{start_server, ServerState};
use crate::runtime::tls::ServerTlsFiles;
use crate::server::DecoratorService;
use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::transport::Server;
use tracing::{error, info, warn};

/// Set up the tracing subscriber
///
/// `RUST_LOG` wins; otherwise `--debug` selects the debug filter.
pub fn init_tracing(debug: bool) {
    let default_filter = if debug {
        DEBUG_LOG_FILTER
    } else {
        DEFAULT_LOG_FILTER
    };
    if let Err(e) = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .try_init()
    {
        // A subscriber may already be installed, e.g. in tests
        warn!("Tracing subscriber init returned error: {}", e);
    }
}

/// Run the function until a shutdown signal arrives
///
/// # Errors
///
/// Fails if metrics cannot be registered, TLS material cannot be loaded, or
/// the gRPC server cannot bind its address.
pub async fn run(args: FunctionArgs) -> Result<()> {
    // Configure rustls crypto provider before any TLS work
    // Ignored if a provider is already installed
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        warn!("rustls crypto provider was already installed");
    }

    init_tracing(args.debug);
    info!(
        version = env!("CARGO_PKG_VERSION"),
        address = %args.address,
        "Starting service binding decorator"
    );

    let security = args.transport_security()?;
    observability::metrics::register_metrics().context("Failed to register metrics")?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        shutdown_signal().await;
        info!("Shutdown signal received");
        let _ = shutdown_tx.send(true);
    });

    // Bind before spawning so a taken port fails startup
    let server_state = Arc::new(ServerState::default());
    let probe_listener = observability::server::bind(args.metrics_port).await?;
    let probe_handle = tokio::spawn(start_server(
        probe_listener,
        Arc::clone(&server_state),
        wait_for(shutdown_rx.clone()),
    ));

    let mut builder = Server::builder();
    match &security {
        TransportSecurity::Insecure => {
            warn!("Serving without mTLS; use only for local development");
        }
        TransportSecurity::Mtls(dir) => {
            let files = ServerTlsFiles::load(dir).with_context(|| {
                format!("Failed to load TLS credentials from {}", dir.display())
            })?;
            builder = builder
                .tls_config(files.to_tonic_config())
                .context("Failed to configure mTLS")?;
            info!(certs_dir = %dir.display(), "mTLS enabled");
        }
    }

    let service = DecoratorService::new().into_service(args.max_message_size);
    let grpc_listener = TcpListener::bind(args.address)
        .await
        .with_context(|| format!("Failed to bind gRPC server to {}", args.address))?;
    info!(address = %args.address, "gRPC server listening");
    server_state.mark_ready();

    let result = builder
        .add_service(service)
        .serve_with_incoming_shutdown(
            TcpListenerStream::new(grpc_listener),
            wait_for(shutdown_rx),
        )
        .await
        .context("gRPC server failed");

    server_state.mark_not_ready();
    if result.is_err() {
        // The probe server only stops on the shutdown signal
        probe_handle.abort();
    } else {
        match probe_handle.await {
            Ok(Err(e)) => error!("HTTP server error: {:#}", e),
            Err(e) => error!("HTTP server task failed: {}", e),
            Ok(Ok(())) => {}
        }
    }
    info!("Service binding decorator stopped");
    result
}

/// Resolve once the shutdown flag flips to true
async fn wait_for(mut rx: watch::Receiver<bool>) {
    while !*rx.borrow() {
        if rx.changed().await.is_err() {
            return;
        }
    }
}

/// Wait for Ctrl-C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
