//! # Decorator Input
//!
//! The input a Composition passes to this function.
//!
//! # Example
//!
//! ```yaml
//! apiVersion: apiextensions.crossplane.io/v1
//! kind: Composition
//! spec:
//!   mode: Pipeline
//!   pipeline:
//!   - step: servicebinding
//!     functionRef:
//!       name: servicebinding-decorator
//!     input:
//!       apiVersion: fn.crossplane.servicebinding.io/v1alpha1
//!       kind: Decorator
//!       config:
//!         requireWriteConnectionSecretToRef: false
//!         providerConfigRef:
//!           name: in-cluster
//!         bindingSecretOverrides:
//!           type: postgresql
//! ```
//!
//! This isn't a custom resource in the sense that its CRD is ever installed.
//! It is a KRM-like document; the `crdgen` binary emits a CRD describing its
//! schema for tooling.

use super::{INPUT_GROUP, INPUT_KIND, INPUT_VERSION};
use crate::constants::DEFAULT_PROVIDER_CONFIG_NAME;
use k8s_openapi::apiextensions_apiserver::pkg::apis::apiextensions::v1::{
    CustomResourceDefinition, CustomResourceDefinitionNames, CustomResourceDefinitionSpec,
    CustomResourceDefinitionVersion, CustomResourceValidation, JSONSchemaProps,
};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use schemars::generate::SchemaSettings;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Decorator can be used to provide input to this function
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Decorator {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Configuration for the decorator
    #[serde(default)]
    pub config: DecoratorConfig,
}

/// Configuration for the decorator
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DecoratorConfig {
    /// Whether every claim must specify spec.writeConnectionSecretToRef
    /// If true, claims without it (or with one in another namespace) are not bindable
    /// If false, the decorator composes a binding secret for such claims
    #[serde(default)]
    pub require_write_connection_secret_to_ref: bool,
    /// Provider config used when creating the binding secret
    /// Defaults to "default"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_config_ref: Option<ProviderConfigRef>,
    /// Entries written into the binding secret on top of the composed
    /// resources' connection details; an override always wins
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub binding_secret_overrides: BTreeMap<String, String>,
}

impl DecoratorConfig {
    /// Name of the provider config for the binding secret, falling back to "default"
    pub fn provider_config_name(&self) -> &str {
        self.provider_config_ref
            .as_ref()
            .map(|r| r.name.as_str())
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_PROVIDER_CONFIG_NAME)
    }
}

/// Provider config to use when creating the binding secret
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct ProviderConfigRef {
    /// Name of the provider config
    #[serde(default)]
    pub name: String,
}

/// CRD describing the [`Decorator`] input schema
///
/// # Errors
///
/// Fails if the generated JSON schema cannot be expressed as `JSONSchemaProps`.
pub fn decorator_crd() -> Result<CustomResourceDefinition, serde_json::Error> {
    let generator = SchemaSettings::openapi3()
        .with(|s| {
            s.inline_subschemas = true;
        })
        .into_generator();
    let mut schema = serde_json::to_value(generator.into_root_schema_for::<Decorator>())?;
    if let Some(root) = schema.as_object_mut() {
        root.remove("$schema");
        root.remove("title");
        if let Some(properties) = root
            .get_mut("properties")
            .and_then(serde_json::Value::as_object_mut)
        {
            properties.insert(
                "metadata".to_string(),
                serde_json::json!({"type": "object"}),
            );
        }
    }
    let schema: JSONSchemaProps = serde_json::from_value(schema)?;

    let plural = format!("{}s", INPUT_KIND.to_lowercase());
    Ok(CustomResourceDefinition {
        metadata: ObjectMeta {
            name: Some(format!("{plural}.{INPUT_GROUP}")),
            ..Default::default()
        },
        spec: CustomResourceDefinitionSpec {
            group: INPUT_GROUP.to_string(),
            names: CustomResourceDefinitionNames {
                kind: INPUT_KIND.to_string(),
                list_kind: Some(format!("{INPUT_KIND}List")),
                plural,
                singular: Some(INPUT_KIND.to_lowercase()),
                categories: Some(vec!["crossplane".to_string()]),
                ..Default::default()
            },
            scope: "Namespaced".to_string(),
            versions: vec![CustomResourceDefinitionVersion {
                name: INPUT_VERSION.to_string(),
                served: true,
                storage: true,
                schema: Some(CustomResourceValidation {
                    open_api_v3_schema: Some(schema),
                }),
                ..Default::default()
            }],
            ..Default::default()
        },
        status: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_full_input() {
        let decorator: Decorator = serde_json::from_value(json!({
            "apiVersion": "fn.crossplane.servicebinding.io/v1alpha1",
            "kind": "Decorator",
            "config": {
                "requireWriteConnectionSecretToRef": true,
                "providerConfigRef": {"name": "in-cluster"},
                "bindingSecretOverrides": {"type": "postgresql"}
            }
        }))
        .unwrap();
        assert!(decorator.config.require_write_connection_secret_to_ref);
        assert_eq!(decorator.config.provider_config_name(), "in-cluster");
        assert_eq!(
            decorator.config.binding_secret_overrides["type"],
            "postgresql"
        );
    }

    #[test]
    fn test_missing_config_defaults() {
        let decorator: Decorator = serde_json::from_value(json!({
            "apiVersion": "fn.crossplane.servicebinding.io/v1alpha1",
            "kind": "Decorator"
        }))
        .unwrap();
        assert_eq!(decorator.config, DecoratorConfig::default());
        assert_eq!(decorator.config.provider_config_name(), "default");
    }

    #[test]
    fn test_empty_provider_config_name_falls_back_to_default() {
        let config = DecoratorConfig {
            provider_config_ref: Some(ProviderConfigRef {
                name: String::new(),
            }),
            ..Default::default()
        };
        assert_eq!(config.provider_config_name(), "default");
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let decorator: Decorator = serde_json::from_value(json!({
            "metadata": {"name": "ignored"},
            "config": {"providerConfigName": "legacy"}
        }))
        .unwrap();
        assert_eq!(decorator.config.provider_config_name(), "default");
    }

    #[test]
    fn test_decorator_crd_names_and_schema() {
        let crd = decorator_crd().unwrap();
        assert_eq!(
            crd.metadata.name.as_deref(),
            Some("decorators.fn.crossplane.servicebinding.io")
        );
        assert_eq!(crd.spec.group, "fn.crossplane.servicebinding.io");
        assert_eq!(crd.spec.names.kind, "Decorator");
        assert_eq!(crd.spec.versions.len(), 1);

        let version = &crd.spec.versions[0];
        assert_eq!(version.name, "v1alpha1");
        let schema = version
            .schema
            .as_ref()
            .and_then(|s| s.open_api_v3_schema.as_ref())
            .unwrap();
        let properties = schema.properties.as_ref().unwrap();
        assert!(properties.contains_key("config"));
        assert!(properties.contains_key("metadata"));
    }
}
