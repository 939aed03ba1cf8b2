//! # Binding Decision
//!
//! Decides how a claim binds to the secret holding its XR's connection details.
//!
//! ## Decision
//!
//! Evaluated in order; the first match ends the run:
//!
//! 1. **No claim** - the XR has no `spec.claimRef`. Nothing consumes a
//!    binding, so a normal result is returned and desired state is untouched.
//! 2. **Existing secret** - `spec.writeConnectionSecretToRef` is in the
//!    claim's namespace. Its name is recorded as the binding. A reference to
//!    another namespace is ignored.
//! 3. **Not bindable** - the input requires the claim to name a secret and it
//!    did not. A normal result is returned; this is not an error.
//! 4. **Synthesized secret** - connection details of all composed resources
//!    are merged, overrides applied, and a Secret named after the XR's UID is
//!    composed into the claim's namespace through provider-kubernetes.
//!
//! In cases 2 and 4 the chosen name is written to `status.binding.name` on the
//! desired XR.
//!
//! Any failure to read the request or write the response adds a fatal result
//! and stops the run. Crossplane calls the function again on its next
//! reconcile; nothing is retried here.

pub mod binding;

use crate::constants::{BINDING_SECRET_RESOURCE_NAME, STATUS_BINDING_NAME_PATH};
use crate::crd::Decorator;
use crate::error::type_name_of;
use crate::observability::metrics;
use crate::proto::{RunFunctionRequest, RunFunctionResponse, Severity};
use crate::resource::{DesiredComposed, Unstructured};
use crate::{request, response};
use anyhow::{Context, Result};
use std::time::Instant;
use tracing::{debug, error, info, info_span};

/// Outcome of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingDecision {
    /// The XR is not bound to a claim
    NoClaim,
    /// The claim named a secret in its own namespace
    ExistingSecret(String),
    /// The input requires a named secret and the claim has none
    NotBindable,
    /// A binding secret was composed
    SynthesizedSecret(String),
}

impl BindingDecision {
    /// Label used in metrics and logs
    pub fn as_str(&self) -> &'static str {
        match self {
            BindingDecision::NoClaim => "no_claim",
            BindingDecision::ExistingSecret(_) => "existing_secret",
            BindingDecision::NotBindable => "not_bindable",
            BindingDecision::SynthesizedSecret(_) => "synthesized_secret",
        }
    }

    /// Secret name recorded on the XR, if any
    pub fn secret_name(&self) -> Option<&str> {
        match self {
            BindingDecision::ExistingSecret(name) | BindingDecision::SynthesizedSecret(name) => {
                Some(name)
            }
            BindingDecision::NoClaim | BindingDecision::NotBindable => None,
        }
    }
}

/// Run the function against one request
///
/// Pure with respect to its input: the same request always produces the same
/// response.
pub fn run_function(req: &RunFunctionRequest) -> RunFunctionResponse {
    let span = info_span!("run_function", tag = %request::tag(req));
    let _guard = span.enter();
    let start = Instant::now();

    info!("Running service binding decorator");
    metrics::increment_runs();

    let mut rsp = response::to(req, response::default_ttl());
    match decide(req, &mut rsp) {
        Ok(decision) => {
            info!(
                decision = decision.as_str(),
                secret = decision.secret_name().unwrap_or_default(),
                "binding.decided"
            );
            metrics::increment_decisions(decision.as_str());
        }
        Err(e) => {
            error!(error = %format!("{e:#}"), "binding.fatal");
            response::fatal(&mut rsp, &e);
        }
    }

    for (severity, label) in [
        (Severity::Normal, "normal"),
        (Severity::Warning, "warning"),
        (Severity::Fatal, "fatal"),
    ] {
        let count = response::count_results(&rsp, severity);
        if count > 0 {
            metrics::increment_results(label, count);
        }
    }
    metrics::observe_run_duration(start.elapsed().as_secs_f64());

    rsp
}

/// Evaluate the decision and apply it to `rsp`
///
/// Normal results are added here; a returned error becomes a fatal result.
fn decide(req: &RunFunctionRequest, rsp: &mut RunFunctionResponse) -> Result<BindingDecision> {
    let oxr = request::get_observed_composite_resource(req).with_context(|| {
        format!(
            "cannot get observed composite resource from {}",
            type_name_of(req)
        )
    })?;

    info!(
        xr.api_version = oxr.resource.api_version(),
        xr.kind = oxr.resource.kind(),
        xr.name = oxr.resource.name(),
        "observed composite resource"
    );

    let decorator: Decorator = request::get_input(req)
        .with_context(|| format!("cannot get function input from {}", type_name_of(req)))?;

    let Some(claim) = oxr.resource.claim_reference() else {
        response::normal(rsp, "claim reference is nil, nothing to do");
        return Ok(BindingDecision::NoClaim);
    };

    // A claim can only bind to a secret in its own namespace
    if let Some(secret_ref) = oxr
        .resource
        .write_connection_secret_to_reference()
        .filter(|r| r.namespace == claim.namespace)
    {
        debug!(secret = %secret_ref.name, namespace = %secret_ref.namespace, "claim names its connection secret");
        set_status_binding_name(req, rsp, &secret_ref.name)?;
        return Ok(BindingDecision::ExistingSecret(secret_ref.name));
    }

    if decorator.config.require_write_connection_secret_to_ref {
        response::normal(
            rsp,
            "claim does not specify spec.writeConnectionSecretToRef, nothing to do",
        );
        return Ok(BindingDecision::NotBindable);
    }

    let observed = request::get_observed_composed_resources(req).with_context(|| {
        format!(
            "cannot get observed composed resources from {}",
            type_name_of(req)
        )
    })?;

    let details = binding::merge_connection_details(
        observed.values(),
        &decorator.config.binding_secret_overrides,
    );
    debug!(keys = details.len(), "merged connection details");

    let secret = binding::render_secret(oxr.resource.uid(), &claim.namespace, details);
    let secret_name = secret.metadata.name.clone().unwrap_or_default();

    let object = binding::wrap_in_object(&secret, decorator.config.provider_config_name())
        .with_context(|| format!("cannot encode secret {}", type_name_of(&secret)))?;

    let mut desired = request::get_desired_composed_resources(req).with_context(|| {
        format!(
            "cannot get desired composed resources from {}",
            type_name_of(req)
        )
    })?;

    let composed = Unstructured::from_serialize(&object)
        .with_context(|| format!("cannot get composed resource from {}", type_name_of(&object)))?;

    desired.insert(
        BINDING_SECRET_RESOURCE_NAME.to_string(),
        DesiredComposed::new(composed),
    );
    response::set_desired_composed_resources(rsp, &desired);

    set_status_binding_name(req, rsp, &secret_name)?;
    Ok(BindingDecision::SynthesizedSecret(secret_name))
}

/// Record the binding secret name on the desired XR
fn set_status_binding_name(
    req: &RunFunctionRequest,
    rsp: &mut RunFunctionResponse,
    secret_name: &str,
) -> Result<()> {
    let mut dxr = request::get_desired_composite_resource(req).with_context(|| {
        format!(
            "cannot get desired composite resource from {}",
            type_name_of(req)
        )
    })?;

    let target = type_name_of(&*rsp);
    dxr.resource
        .set_string(STATUS_BINDING_NAME_PATH, secret_name)
        .with_context(|| {
            format!("cannot set {STATUS_BINDING_NAME_PATH} on desired composite resource in {target}")
        })?;

    response::set_desired_composite_resource(rsp, &dxr);
    Ok(())
}
