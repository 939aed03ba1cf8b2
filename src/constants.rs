//! # Constants
//!
//! Default values and fixed names used across the function.

/// Default gRPC listen address, matching the Crossplane function SDKs
pub const DEFAULT_ADDRESS: &str = "0.0.0.0:9443";

/// Default HTTP port for metrics and health probes
pub const DEFAULT_METRICS_PORT: u16 = 8080;

/// Default maximum gRPC message size (bytes) for both directions
pub const DEFAULT_GRPC_MAX_MESSAGE_SIZE: usize = 16 * 1024 * 1024;

/// Time-to-live attached to every response, in seconds
pub const DEFAULT_RESPONSE_TTL_SECS: i64 = 60;

/// Logical name of the composed resource that carries the binding secret
pub const BINDING_SECRET_RESOURCE_NAME: &str = "bindingsecret";

/// Provider config used when the input does not name one
pub const DEFAULT_PROVIDER_CONFIG_NAME: &str = "default";

/// Field path on the composite that records the binding secret name
pub const STATUS_BINDING_NAME_PATH: &str = "status.binding.name";

/// File names expected in the TLS server certificates directory
pub const TLS_CERT_FILE: &str = "tls.crt";
pub const TLS_KEY_FILE: &str = "tls.key";
pub const TLS_CA_FILE: &str = "ca.crt";

/// Default tracing filter when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "servicebinding_decorator=info";
pub const DEBUG_LOG_FILTER: &str = "servicebinding_decorator=debug";
