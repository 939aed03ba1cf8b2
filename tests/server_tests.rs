//! # gRPC Server Integration Tests
//!
//! Serves `DecoratorService` on a loopback port and calls it with the
//! generated client, the way Crossplane does.

use serde_json::json;
use servicebinding_decorator::proto::function_runner_service_client::FunctionRunnerServiceClient;
use servicebinding_decorator::proto::{self, RequestMeta, RunFunctionRequest, Severity, State};
use servicebinding_decorator::resource::{json_to_struct, Unstructured};
use servicebinding_decorator::server::DecoratorService;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::transport::Server;

const MAX_MESSAGE_SIZE: usize = 4 * 1024 * 1024;

async fn serve() -> (SocketAddr, oneshot::Sender<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel::<()>();
    tokio::spawn(async move {
        Server::builder()
            .add_service(DecoratorService::new().into_service(MAX_MESSAGE_SIZE))
            .serve_with_incoming_shutdown(TcpListenerStream::new(listener), async {
                let _ = rx.await;
            })
            .await
            .unwrap();
    });
    (addr, tx)
}

fn request(tag: &str, xr: serde_json::Value) -> RunFunctionRequest {
    RunFunctionRequest {
        meta: Some(RequestMeta {
            tag: tag.to_string(),
        }),
        observed: Some(State {
            composite: Some(proto::Resource {
                resource: Some(json_to_struct(xr).unwrap()),
                ..Default::default()
            }),
            resources: Default::default(),
        }),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_run_function_over_grpc() {
    let (addr, shutdown) = serve().await;
    let mut client = FunctionRunnerServiceClient::connect(format!("http://{addr}"))
        .await
        .unwrap();

    let rsp = client
        .run_function(request(
            "grpc",
            json!({
                "metadata": {"uid": "my-uid"},
                "spec": {"claimRef": {"name": "my-claim", "namespace": "my-ns"}}
            }),
        ))
        .await
        .unwrap()
        .into_inner();

    assert_eq!(rsp.meta.as_ref().unwrap().tag, "grpc");
    assert!(rsp.results.is_empty());
    let desired = rsp.desired.unwrap();
    assert!(desired.resources.contains_key("bindingsecret"));
    let xr = Unstructured::from_struct(desired.composite.unwrap().resource.as_ref().unwrap())
        .unwrap();
    assert_eq!(xr.get_string("status.binding.name"), Some("my-uid"));

    let _ = shutdown.send(());
}

#[tokio::test]
async fn test_fatal_results_do_not_fail_the_call() {
    let (addr, shutdown) = serve().await;
    let mut client = FunctionRunnerServiceClient::connect(format!("http://{addr}"))
        .await
        .unwrap();

    let mut req = request(
        "fatal",
        json!({"spec": {"claimRef": {"name": "my-claim", "namespace": "my-ns"}}}),
    );
    req.input = Some(
        json_to_struct(json!({"config": {"requireWriteConnectionSecretToRef": "yes"}})).unwrap(),
    );

    let rsp = client.run_function(req).await.unwrap().into_inner();

    assert_eq!(rsp.results.len(), 1);
    assert_eq!(rsp.results[0].severity(), Severity::Fatal);
    assert!(rsp.results[0]
        .message
        .starts_with("cannot get function input from RunFunctionRequest: "));

    let _ = shutdown.send(());
}
