//! Entity and property descriptors.
//!
//! Descriptors are the introspection side of the mapper: for every mapped type they
//! list the properties in declaration order with their annotations, and for entity
//! properties the name of the entity they refer to. They can be built in code or
//! deserialized from JSON.
//!
//! # Example
//!
//! ```
//! use helios_odm::entity::{EntityDescriptor, FieldAnnotation, PropertyDescriptor};
//! use helios_odm::types::FieldType;
//!
//! let person = EntityDescriptor::new("Person")
//!     .with_property(PropertyDescriptor::new("id").as_id())
//!     .with_property(
//!         PropertyDescriptor::new("friends")
//!             .referencing("Person")
//!             .with_field(FieldAnnotation::of(FieldType::Nested).ignoring(["friends"])),
//!     );
//! assert_eq!(person.properties.len(), 2);
//! ```

mod annotations;
mod descriptor;
mod property;
mod registry;

pub use annotations::{
    CompletionContext, CompletionField, DocumentAnnotation, DynamicTemplatesAnnotation,
    FieldAnnotation, GeoShapeField, IndexPrefixes, InnerField, JoinTypeRelation,
    MappingAnnotation, MultiField, SettingAnnotation, SortMissingValue, SortMode, SortOrder,
};
pub use descriptor::EntityDescriptor;
pub use property::{PropertyDescriptor, PropertyKind};
pub use registry::EntityRegistry;
