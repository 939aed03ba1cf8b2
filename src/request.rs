//! # Request Helpers
//!
//! Typed reads from a [`RunFunctionRequest`].
//!
//! Absent state is not an error: the first function in a pipeline receives
//! an empty desired state, and an XR may have no composed resources yet.
//! Each reader returns an empty value in those cases.

use crate::error::ResourceError;
use crate::proto::{self, RunFunctionRequest};
use crate::resource::{
    connection_details_of, Composite, DesiredComposed, ObservedComposed, Unstructured,
};
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;

/// Observed composite resource (XR)
///
/// # Errors
///
/// Fails if the composite document cannot be converted to JSON.
pub fn get_observed_composite_resource(
    req: &RunFunctionRequest,
) -> Result<Composite, ResourceError> {
    composite_from(req.observed.as_ref().and_then(|s| s.composite.as_ref()))
}

/// Desired composite resource as accumulated by earlier pipeline steps
///
/// # Errors
///
/// Fails if the composite document cannot be converted to JSON.
pub fn get_desired_composite_resource(
    req: &RunFunctionRequest,
) -> Result<Composite, ResourceError> {
    composite_from(req.desired.as_ref().and_then(|s| s.composite.as_ref()))
}

/// Observed composed resources, keyed by logical name
///
/// # Errors
///
/// Fails if any composed resource document cannot be converted to JSON.
pub fn get_observed_composed_resources(
    req: &RunFunctionRequest,
) -> Result<BTreeMap<String, ObservedComposed>, ResourceError> {
    let Some(state) = req.observed.as_ref() else {
        return Ok(BTreeMap::new());
    };
    state
        .resources
        .iter()
        .map(|(name, r)| -> Result<_, ResourceError> {
            Ok((
                name.clone(),
                ObservedComposed {
                    resource: unstructured_of(r)?,
                    connection_details: connection_details_of(r),
                },
            ))
        })
        .collect()
}

/// Desired composed resources, keyed by logical name
///
/// # Errors
///
/// Fails if any composed resource document cannot be converted to JSON.
pub fn get_desired_composed_resources(
    req: &RunFunctionRequest,
) -> Result<BTreeMap<String, DesiredComposed>, ResourceError> {
    let Some(state) = req.desired.as_ref() else {
        return Ok(BTreeMap::new());
    };
    state
        .resources
        .iter()
        .map(|(name, r)| -> Result<_, ResourceError> {
            Ok((
                name.clone(),
                DesiredComposed {
                    resource: r.resource.as_ref().map(Unstructured::from_struct).transpose()?,
                    connection_details: connection_details_of(r),
                    ready: r.ready(),
                },
            ))
        })
        .collect()
}

/// Function input decoded into `T`
///
/// A request without input yields `T::default()`.
///
/// # Errors
///
/// Fails if the input does not match the shape of `T`.
pub fn get_input<T: DeserializeOwned + Default>(
    req: &RunFunctionRequest,
) -> Result<T, ResourceError> {
    let Some(input) = req.input.as_ref() else {
        return Ok(T::default());
    };
    let json = crate::resource::struct_to_json(input)?;
    Ok(serde_json::from_value(serde_json::Value::Object(json))?)
}

/// Correlation tag of the request, empty if unset
pub fn tag(req: &RunFunctionRequest) -> &str {
    req.meta.as_ref().map_or("", |m| m.tag.as_str())
}

fn composite_from(resource: Option<&proto::Resource>) -> Result<Composite, ResourceError> {
    let Some(r) = resource else {
        return Ok(Composite::default());
    };
    Ok(Composite {
        resource: unstructured_of(r)?,
        connection_details: connection_details_of(r),
    })
}

fn unstructured_of(r: &proto::Resource) -> Result<Unstructured, ResourceError> {
    r.resource
        .as_ref()
        .map(Unstructured::from_struct)
        .transpose()
        .map(Option::unwrap_or_default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crd::Decorator;
    use crate::proto::{RequestMeta, Resource, State};
    use crate::resource::json_to_struct;
    use serde_json::json;

    fn resource(doc: serde_json::Value) -> Resource {
        Resource {
            resource: Some(json_to_struct(doc).unwrap()),
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_request_yields_empty_state() {
        let req = RunFunctionRequest::default();
        assert_eq!(get_observed_composite_resource(&req).unwrap(), Composite::default());
        assert_eq!(get_desired_composite_resource(&req).unwrap(), Composite::default());
        assert!(get_observed_composed_resources(&req).unwrap().is_empty());
        assert!(get_desired_composed_resources(&req).unwrap().is_empty());
        assert_eq!(tag(&req), "");
    }

    #[test]
    fn test_observed_composed_carries_connection_details() {
        let mut r = resource(json!({"kind": "Instance"}));
        r.connection_details
            .insert("password".to_string(), b"s3cr3t".to_vec());
        let req = RunFunctionRequest {
            observed: Some(State {
                composite: None,
                resources: [("db".to_string(), r)].into_iter().collect(),
            }),
            ..Default::default()
        };
        let observed = get_observed_composed_resources(&req).unwrap();
        assert_eq!(observed["db"].resource.kind(), "Instance");
        assert_eq!(observed["db"].connection_details["password"], b"s3cr3t".to_vec());
    }

    #[test]
    fn test_desired_composed_keeps_ready_state() {
        let mut r = resource(json!({"kind": "Bucket"}));
        r.set_ready(proto::Ready::True);
        let req = RunFunctionRequest {
            desired: Some(State {
                composite: None,
                resources: [("bucket".to_string(), r)].into_iter().collect(),
            }),
            ..Default::default()
        };
        let desired = get_desired_composed_resources(&req).unwrap();
        assert_eq!(desired["bucket"].ready, proto::Ready::True);
    }

    #[test]
    fn test_missing_input_is_default() {
        let req = RunFunctionRequest::default();
        let decorator: Decorator = get_input(&req).unwrap();
        assert!(!decorator.config.require_write_connection_secret_to_ref);
    }

    #[test]
    fn test_malformed_input_is_an_error() {
        let req = RunFunctionRequest {
            input: Some(
                json_to_struct(json!({
                    "config": {"requireWriteConnectionSecretToRef": "yes"}
                }))
                .unwrap(),
            ),
            ..Default::default()
        };
        assert!(get_input::<Decorator>(&req).is_err());
    }

    #[test]
    fn test_tag_is_read_from_meta() {
        let req = RunFunctionRequest {
            meta: Some(RequestMeta {
                tag: "hello".to_string(),
            }),
            ..Default::default()
        };
        assert_eq!(tag(&req), "hello");
    }

    #[test]
    fn test_desired_composed_keeps_details_and_missing_document() {
        let mut r = Resource::default();
        r.connection_details
            .insert("k".to_string(), b"v".to_vec());
        let req = RunFunctionRequest {
            desired: Some(State {
                composite: None,
                resources: [("pre".to_string(), r)].into_iter().collect(),
            }),
            ..Default::default()
        };
        let desired = get_desired_composed_resources(&req).unwrap();
        assert!(desired["pre"].resource.is_none());
        assert_eq!(desired["pre"].connection_details["k"], b"v".to_vec());
    }
}
