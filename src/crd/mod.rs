//! # Custom Resource Definitions
//!
//! Types for the documents this function reads and writes.
//!
//! - [`Decorator`] is the function input, embedded in a Composition pipeline step.
//! - [`Object`] is provider-kubernetes' wrapper for an arbitrary manifest; the
//!   rendered binding secret is composed through it.

mod decorator;
mod object;

pub use decorator::{decorator_crd, Decorator, DecoratorConfig, ProviderConfigRef};
pub use object::{Object, ObjectParameters, ObjectSpec, Reference};

/// API group of the function input
pub const INPUT_GROUP: &str = "fn.crossplane.servicebinding.io";

/// API version of the function input
pub const INPUT_VERSION: &str = "v1alpha1";

/// Kind of the function input
pub const INPUT_KIND: &str = "Decorator";
