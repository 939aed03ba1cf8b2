//! # provider-kubernetes Object
//!
//! `kubernetes.crossplane.io/v1alpha1` `Object` wraps an arbitrary Kubernetes
//! manifest so provider-kubernetes applies it on Crossplane's behalf. The
//! function uses it to create the binding secret in the claim's namespace,
//! since a composition function may only change the XR's status, not its spec.
//!
//! Only the fields the function sets are modelled. The schema is owned by
//! provider-kubernetes, so none is generated here.

use kube::CustomResource;
use serde::{Deserialize, Serialize};

/// Desired state of a provider-kubernetes Object
#[derive(CustomResource, Debug, Clone, PartialEq, Deserialize, Serialize)]
#[kube(
    group = "kubernetes.crossplane.io",
    version = "v1alpha1",
    kind = "Object",
    schema = "disabled"
)]
#[serde(rename_all = "camelCase")]
pub struct ObjectSpec {
    /// Manifest to apply
    pub for_provider: ObjectParameters,
    /// Provider config used to reach the target cluster
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_config_ref: Option<Reference>,
}

/// Parameters of an Object
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ObjectParameters {
    /// Raw Kubernetes manifest
    pub manifest: serde_json::Value,
}

/// Reference to another resource by name
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Reference {
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
    use serde_json::json;

    #[test]
    fn test_object_serializes_with_type_meta() {
        let object = Object {
            metadata: ObjectMeta::default(),
            spec: ObjectSpec {
                for_provider: ObjectParameters {
                    manifest: json!({"apiVersion": "v1", "kind": "ConfigMap"}),
                },
                provider_config_ref: Some(Reference {
                    name: "default".to_string(),
                }),
            },
        };
        let value = serde_json::to_value(&object).unwrap();
        assert_eq!(value["apiVersion"], "kubernetes.crossplane.io/v1alpha1");
        assert_eq!(value["kind"], "Object");
        assert_eq!(value["spec"]["forProvider"]["manifest"]["kind"], "ConfigMap");
        assert_eq!(value["spec"]["providerConfigRef"]["name"], "default");
    }
}
