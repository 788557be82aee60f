//! Helios ODM Mapping Compiler
//!
//! This crate turns annotated entity descriptors into the JSON documents Elasticsearch
//! expects when an index is created: the index mapping, the index settings, alias
//! actions and index templates.
//!
//! # Features
//!
//! - **Mapping compilation**: nested and object entities, multi-fields, geo types, join
//!   relations, completion suggesters, runtime fields, dynamic templates and disabled
//!   sub-trees
//! - **Cyclic entity graphs**: entities refer to each other by name; recursion is cut by
//!   the `ignore_fields` list of the referencing field
//! - **Minimal payloads**: only parameters that deviate from their Elasticsearch default
//!   are written
//! - **Partial failure tolerance**: a property whose parameters cannot be written is left
//!   out and reported as a warning, while annotation and resource errors abort the build
//!
//! # Architecture
//!
//! - [`types`] - Field types and the other closed vocabularies of a mapping
//! - [`entity`] - Entity and property descriptors, annotation records, the entity registry
//! - [`config`] - Settings shared by all mapping builds
//! - [`resource`] - Loading of external JSON fragments
//! - [`mapping`] - Field parameters and the mapping tree builder
//! - [`index`] - Index settings, aliases, templates and index definitions
//! - [`error`] - Error types for all operations
//!
//! # Quick Start
//!
//! ```
//! use helios_odm::config::MappingConfig;
//! use helios_odm::entity::{
//!     EntityDescriptor, EntityRegistry, FieldAnnotation, InnerField, MultiField,
//!     PropertyDescriptor,
//! };
//! use helios_odm::mapping::MappingBuilder;
//! use helios_odm::resource::InMemoryResourceLoader;
//! use helios_odm::types::FieldType;
//! use serde_json::json;
//!
//! let book = EntityDescriptor::new("Book")
//!     .with_property(PropertyDescriptor::new("id").as_id().with_field(FieldAnnotation::default()))
//!     .with_property(PropertyDescriptor::new("title").with_multi_field(MultiField {
//!         main_field: FieldAnnotation::of(FieldType::Text),
//!         other_fields: vec![InnerField::new("raw", FieldType::Keyword)],
//!     }));
//!
//! let registry = EntityRegistry::new().with_entity(book.clone());
//! let resources = InMemoryResourceLoader::new();
//! let config = MappingConfig {
//!     write_type_hints: false,
//!     ..Default::default()
//! };
//!
//! let mapping = MappingBuilder::new(&registry, &resources, &config)
//!     .build_mapping_tree(&book)
//!     .unwrap();
//!
//! assert_eq!(
//!     mapping,
//!     json!({"properties": {
//!         "id": {"type": "keyword", "index": true},
//!         "title": {"type": "text", "fields": {"raw": {"type": "keyword"}}}
//!     }})
//! );
//! ```
//!
//! # Index Definitions
//!
//! ```
//! use helios_odm::config::MappingConfig;
//! use helios_odm::entity::{EntityDescriptor, EntityRegistry};
//! use helios_odm::index::IndexDefinition;
//! use helios_odm::mapping::MappingBuilder;
//! use helios_odm::resource::InMemoryResourceLoader;
//!
//! let entity = EntityDescriptor::new("Book");
//! let registry = EntityRegistry::new().with_entity(entity.clone());
//! let resources = InMemoryResourceLoader::new();
//! let config = MappingConfig::default();
//! let builder = MappingBuilder::new(&registry, &resources, &config);
//!
//! let definition = IndexDefinition::for_entity(&entity, &builder).unwrap();
//! assert_eq!(definition.index_name, "book");
//! assert_eq!(definition.create_body()["settings"]["index"]["number_of_shards"], 1);
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod entity;
pub mod error;
pub mod index;
pub mod mapping;
pub mod resource;
pub mod types;

// Re-export commonly used types at crate root
pub use config::{FieldNamingStrategy, MappingConfig};
pub use entity::{EntityDescriptor, EntityRegistry, PropertyDescriptor, PropertyKind};
pub use error::{MappingError, MappingResult, MappingWarning};
pub use index::{IndexDefinition, Settings};
pub use mapping::{MappingBuilder, RuntimeField};
pub use resource::{FileSystemResourceLoader, InMemoryResourceLoader, ResourceLoader};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
