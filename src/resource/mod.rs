//! # Resources
//!
//! Typed views over the composite and composed resources exchanged with
//! Crossplane.
//!
//! Resources travel as protobuf `Struct`s. [`Unstructured`] holds the JSON
//! form of one resource and exposes the handful of fields the binding logic
//! reads or writes. Fields the function does not understand pass through
//! unchanged.

pub mod convert;
pub mod fieldpath;

use crate::error::ResourceError;
use crate::proto;
use prost_types::Struct;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

pub use convert::{json_to_struct, map_to_struct, struct_to_json};

/// Connection details of a resource, keyed by detail name
pub type ConnectionDetails = BTreeMap<String, Vec<u8>>;

/// A Kubernetes resource held as a JSON object
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Unstructured(Map<String, Value>);

impl Unstructured {
    /// Wrap a JSON object
    pub fn new(object: Map<String, Value>) -> Self {
        Self(object)
    }

    /// Read a resource out of a protobuf `Struct`
    ///
    /// # Errors
    ///
    /// Fails if the struct holds a number JSON cannot represent.
    pub fn from_struct(s: &Struct) -> Result<Self, ResourceError> {
        struct_to_json(s).map(Self)
    }

    /// Serialize a typed resource (e.g. a `CustomResource`) into an unstructured one
    ///
    /// # Errors
    ///
    /// Fails if the value does not serialize to a JSON object.
    pub fn from_serialize<T: Serialize>(value: &T) -> Result<Self, ResourceError> {
        match serde_json::to_value(value)? {
            Value::Object(map) => Ok(Self(map)),
            other => Err(ResourceError::NotAnObject {
                kind: crate::error::json_kind(&other),
            }),
        }
    }

    /// Protobuf `Struct` form of this resource
    pub fn to_struct(&self) -> Struct {
        map_to_struct(self.0.clone())
    }

    /// String at a dotted field path, if present and a string
    pub fn get_string(&self, path: &str) -> Option<&str> {
        fieldpath::get(&self.0, path).and_then(Value::as_str)
    }

    /// Deserialize the value at a dotted field path
    ///
    /// Returns `None` when the field is absent, `null`, or does not have the
    /// expected shape.
    pub fn get_as<T: DeserializeOwned>(&self, path: &str) -> Option<T> {
        match fieldpath::get(&self.0, path)? {
            Value::Null => None,
            value => serde_json::from_value(value.clone()).ok(),
        }
    }

    /// Set a string at a dotted field path
    ///
    /// # Errors
    ///
    /// Fails if an intermediate field is not an object.
    pub fn set_string(&mut self, path: &str, value: &str) -> Result<(), ResourceError> {
        fieldpath::set(&mut self.0, path, Value::String(value.to_string()))
    }

    pub fn api_version(&self) -> &str {
        self.get_string("apiVersion").unwrap_or_default()
    }

    pub fn kind(&self) -> &str {
        self.get_string("kind").unwrap_or_default()
    }

    pub fn name(&self) -> &str {
        self.get_string("metadata.name").unwrap_or_default()
    }

    pub fn uid(&self) -> &str {
        self.get_string("metadata.uid").unwrap_or_default()
    }

    /// Claim bound to this composite (`spec.claimRef`)
    pub fn claim_reference(&self) -> Option<ClaimReference> {
        self.get_as("spec.claimRef")
    }

    /// Secret the claim asked connection details to be written to
    /// (`spec.writeConnectionSecretToRef`)
    pub fn write_connection_secret_to_reference(&self) -> Option<SecretReference> {
        self.get_as("spec.writeConnectionSecretToRef")
    }
}

/// Reference from a composite resource to the claim bound to it
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimReference {
    #[serde(default)]
    pub api_version: String,
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub namespace: String,
}

/// Reference to a secret in a namespace
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct SecretReference {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub namespace: String,
}

/// A composite resource (XR) with its connection details
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Composite {
    pub resource: Unstructured,
    pub connection_details: ConnectionDetails,
}

/// An observed composed resource
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObservedComposed {
    pub resource: Unstructured,
    pub connection_details: ConnectionDetails,
}

/// A desired composed resource
///
/// `resource` is `None` when an earlier pipeline step sent the entry without
/// a document; it is written back the same way.
#[derive(Debug, Clone, PartialEq)]
pub struct DesiredComposed {
    pub resource: Option<Unstructured>,
    pub connection_details: ConnectionDetails,
    pub ready: proto::Ready,
}

impl DesiredComposed {
    pub fn new(resource: Unstructured) -> Self {
        Self {
            resource: Some(resource),
            connection_details: ConnectionDetails::new(),
            ready: proto::Ready::Unspecified,
        }
    }
}

/// Connection details of a wire resource in map form
pub(crate) fn connection_details_of(resource: &proto::Resource) -> ConnectionDetails {
    resource
        .connection_details
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}
