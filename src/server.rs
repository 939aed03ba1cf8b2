//! gRPC server for the composition function
//!
//! Crossplane calls `RunFunction` once per reconcile of every XR whose
//! Composition pipeline includes this function. Each call is independent and
//! handled synchronously; the service holds no state.

use crate::function;
use crate::proto::function_runner_service_server::{
    FunctionRunnerService, FunctionRunnerServiceServer,
};
use crate::proto::{RunFunctionRequest, RunFunctionResponse};
use tonic::{Request, Response, Status};
use tracing::{debug, instrument};

/// Function runner service answering Crossplane's `RunFunction` calls
#[derive(Debug, Clone, Copy, Default)]
pub struct DecoratorService;

impl DecoratorService {
    pub fn new() -> Self {
        Self
    }

    /// Convert to a tonic service with the given message size limit
    pub fn into_service(self, max_message_size: usize) -> FunctionRunnerServiceServer<Self> {
        FunctionRunnerServiceServer::new(self)
            .max_decoding_message_size(max_message_size)
            .max_encoding_message_size(max_message_size)
    }
}

#[tonic::async_trait]
impl FunctionRunnerService for DecoratorService {
    #[instrument(skip_all)]
    async fn run_function(
        &self,
        request: Request<RunFunctionRequest>,
    ) -> Result<Response<RunFunctionResponse>, Status> {
        debug!(remote_addr = ?request.remote_addr(), "RunFunction called");
        let req = request.into_inner();
        Ok(Response::new(function::run_function(&req)))
    }
}
