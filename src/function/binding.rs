//! # Binding Secret
//!
//! Renders the secret a claim binds to when it did not name one itself.

use crate::crd::{Object, ObjectParameters, ObjectSpec, Reference};
use crate::resource::{ConnectionDetails, ObservedComposed};
use k8s_openapi::api::core::v1::Secret;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use k8s_openapi::ByteString;
use std::collections::BTreeMap;

/// Merge the connection details of every observed composed resource, then
/// apply the overrides
///
/// Resources are visited in iteration order and a later resource overwrites
/// an earlier one's value for the same key. Overrides always win.
pub fn merge_connection_details<'a>(
    observed: impl IntoIterator<Item = &'a ObservedComposed>,
    overrides: &BTreeMap<String, String>,
) -> ConnectionDetails {
    let mut details = ConnectionDetails::new();
    for composed in observed {
        for (key, value) in &composed.connection_details {
            details.insert(key.clone(), value.clone());
        }
    }
    for (key, value) in overrides {
        details.insert(key.clone(), value.clone().into_bytes());
    }
    details
}

/// Secret holding the binding's connection details
///
/// Named after the XR's UID so that it is unique per XR and stable across
/// invocations, and placed in the claim's namespace.
pub fn render_secret(name: &str, namespace: &str, details: ConnectionDetails) -> Secret {
    Secret {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(namespace.to_string()),
            ..Default::default()
        },
        data: Some(
            details
                .into_iter()
                .map(|(k, v)| (k, ByteString(v)))
                .collect(),
        ),
        ..Default::default()
    }
}

/// Wrap the secret in a provider-kubernetes Object
///
/// # Errors
///
/// Fails if the secret cannot be encoded as JSON.
pub fn wrap_in_object(secret: &Secret, provider_config_name: &str) -> Result<Object, serde_json::Error> {
    Ok(Object {
        metadata: ObjectMeta::default(),
        spec: ObjectSpec {
            for_provider: ObjectParameters {
                manifest: serde_json::to_value(secret)?,
            },
            provider_config_ref: Some(Reference {
                name: provider_config_name.to_string(),
            }),
        },
    })
}
