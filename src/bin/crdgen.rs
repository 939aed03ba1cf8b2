//! Print the CustomResourceDefinition for the `Decorator` function input
//!
//! Usage:
//!   cargo run --bin crdgen > package/input/fn.crossplane.servicebinding.io_decorators.yaml

use anyhow::{Context, Result};
use servicebinding_decorator::crd::decorator_crd;

fn main() -> Result<()> {
    let crd = decorator_crd().context("Failed to build Decorator CRD")?;
    let yaml = serde_yaml::to_string(&crd).context("Failed to serialize Decorator CRD")?;
    print!("{yaml}");
    Ok(())
}
