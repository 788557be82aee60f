//! Mapping compilation.
//!
//! - [`parameters`]: validated parameters of a single field
//! - [`geo_shape`]: parameters of geo-shape fields
//! - [`builder`]: the recursive mapping tree builder
//! - [`runtime`]: runtime field descriptors

pub mod builder;
pub mod geo_shape;
pub mod parameters;
pub mod runtime;

pub use builder::MappingBuilder;
pub use geo_shape::GeoShapeMappingParameters;
pub use parameters::{FieldContext, MappingParameters};
pub use runtime::{RuntimeField, runtime_document};
