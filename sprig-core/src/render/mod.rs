//! Rendering Pipeline
//!
//! Everything between a descriptor tree and live native nodes:
//!
//! - [`Host`]: the seam to the native toolkit
//! - the binder, which applies props to one native node
//! - the materializer, which walks a descriptor tree and builds native nodes

mod binder;
mod host;
mod materialize;

pub use binder::{apply_props, format_number, kebab_case, serialize_style};
pub use host::Host;
pub use materialize::{materialize, Mounted};

pub(crate) use materialize::materialize_node;
