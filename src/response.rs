//! # Response Helpers
//!
//! Builds a [`RunFunctionResponse`] from a request and records results and
//! desired state on it.

use crate::constants::DEFAULT_RESPONSE_TTL_SECS;
use crate::proto::{self, ResponseMeta, RunFunctionRequest, RunFunctionResponse, Severity};
use crate::resource::{Composite, DesiredComposed, Unstructured};
use std::collections::BTreeMap;

/// Time-to-live Crossplane may cache a response for
pub fn default_ttl() -> prost_types::Duration {
    prost_types::Duration {
        seconds: DEFAULT_RESPONSE_TTL_SECS,
        nanos: 0,
    }
}

/// Start a response for `req`
///
/// The tag is echoed back and the desired state and context are carried over,
/// so a function that changes nothing passes the pipeline state through
/// untouched.
pub fn to(req: &RunFunctionRequest, ttl: prost_types::Duration) -> RunFunctionResponse {
    RunFunctionResponse {
        meta: Some(ResponseMeta {
            tag: crate::request::tag(req).to_string(),
            ttl: Some(ttl),
        }),
        desired: req.desired.clone(),
        results: Vec::new(),
        context: req.context.clone(),
    }
}

/// Add a result with the given severity and optional machine-readable reason
pub fn add_result(
    rsp: &mut RunFunctionResponse,
    severity: Severity,
    message: impl Into<String>,
    reason: Option<&str>,
) {
    rsp.results.push(proto::Result {
        severity: severity as i32,
        message: message.into(),
        reason: reason.map(str::to_string),
        target: None,
    });
}

/// Add a normal result
pub fn normal(rsp: &mut RunFunctionResponse, message: impl Into<String>) {
    add_result(rsp, Severity::Normal, message, None);
}

/// Add a fatal result
///
/// The whole error chain is rendered, outermost context first.
pub fn fatal(rsp: &mut RunFunctionResponse, err: &anyhow::Error) {
    add_result(rsp, Severity::Fatal, format!("{err:#}"), None);
}

/// Replace the desired composite resource
pub fn set_desired_composite_resource(rsp: &mut RunFunctionResponse, composite: &Composite) {
    let desired = rsp.desired.get_or_insert_with(Default::default);
    let resource = desired.composite.get_or_insert_with(Default::default);
    resource.resource = Some(composite.resource.to_struct());
    resource.connection_details = composite
        .connection_details
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
}

/// Replace the desired composed resources
///
/// Callers read the current set with
/// [`get_desired_composed_resources`](crate::request::get_desired_composed_resources)
/// and add to it, so resources from earlier pipeline steps survive.
pub fn set_desired_composed_resources(
    rsp: &mut RunFunctionResponse,
    resources: &BTreeMap<String, DesiredComposed>,
) {
    let desired = rsp.desired.get_or_insert_with(Default::default);
    desired.resources = resources
        .iter()
        .map(|(name, dc)| {
            let mut resource = proto::Resource {
                resource: dc.resource.as_ref().map(Unstructured::to_struct),
                connection_details: dc
                    .connection_details
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect(),
                ..Default::default()
            };
            resource.set_ready(dc.ready);
            (name.clone(), resource)
        })
        .collect();
}

/// Count results of a given severity
pub fn count_results(rsp: &RunFunctionResponse, severity: Severity) -> usize {
    rsp.results
        .iter()
        .filter(|r| r.severity == severity as i32)
        .count()
}
