//! Entity fixtures and the mapping harness.

use serde_json::{Map, Value};

use helios_odm::config::MappingConfig;
use helios_odm::entity::{
    EntityDescriptor, EntityRegistry, FieldAnnotation, PropertyDescriptor,
};
use helios_odm::error::{MappingResult, MappingWarning};
use helios_odm::mapping::MappingBuilder;
use helios_odm::resource::InMemoryResourceLoader;
use helios_odm::types::FieldType;

/// Owns the registry, resources and configuration a [`MappingBuilder`] borrows.
pub struct MappingHarness {
    pub registry: EntityRegistry,
    pub resources: InMemoryResourceLoader,
    pub config: MappingConfig,
}

impl MappingHarness {
    /// Creates a harness with type hints switched off, so expected documents only
    /// contain what the entities declare.
    pub fn new() -> Self {
        Self {
            registry: EntityRegistry::new(),
            resources: InMemoryResourceLoader::new(),
            config: MappingConfig {
                write_type_hints: false,
                ..Default::default()
            },
        }
    }

    /// Switches type hints on.
    pub fn with_type_hints(mut self) -> Self {
        self.config.write_type_hints = true;
        self
    }

    pub fn with_config(mut self, config: MappingConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_entity(mut self, entity: EntityDescriptor) -> Self {
        self.registry.register(entity);
        self
    }

    pub fn with_resource(mut self, path: &str, content: &str) -> Self {
        self.resources.insert(path, content);
        self
    }

    pub fn builder(&self) -> MappingBuilder<'_> {
        MappingBuilder::new(&self.registry, &self.resources, &self.config)
    }

    pub fn entity(&self, name: &str) -> &EntityDescriptor {
        self.registry
            .get(name)
            .unwrap_or_else(|| panic!("entity {name} is not registered"))
    }

    /// Builds the mapping of a registered entity, panicking on errors.
    pub fn mapping(&self, name: &str) -> Value {
        self.builder()
            .build_mapping_tree(self.entity(name))
            .unwrap_or_else(|e| panic!("building mapping of {name} failed: {e}"))
    }

    /// Builds the mapping of a registered entity with explicit runtime fields.
    pub fn mapping_with_runtime(
        &self,
        name: &str,
        runtime_fields: Map<String, Value>,
    ) -> MappingResult<(Value, Vec<MappingWarning>)> {
        self.builder()
            .build_mapping_with_warnings(self.entity(name), Some(runtime_fields))
    }

    pub fn try_mapping(&self, name: &str) -> MappingResult<(Value, Vec<MappingWarning>)> {
        self.builder()
            .build_mapping_with_warnings(self.entity(name), None)
    }
}

impl Default for MappingHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// An entity with a single annotated property.
pub fn entity_with_field(name: &str, property: &str, field: FieldAnnotation) -> EntityDescriptor {
    EntityDescriptor::new(name).with_property(PropertyDescriptor::new(property).with_field(field))
}

/// A person whose `friends` are people again; the cycle is cut by `ignore_fields`.
pub fn self_referencing_person() -> EntityDescriptor {
    EntityDescriptor::new("Person")
        .with_property(
            PropertyDescriptor::new("id")
                .as_id()
                .with_field(FieldAnnotation::default()),
        )
        .with_property(
            PropertyDescriptor::new("name").with_field(FieldAnnotation::of(FieldType::Text)),
        )
        .with_property(
            PropertyDescriptor::new("friends")
                .referencing("Person")
                .with_field(FieldAnnotation::of(FieldType::Nested).ignoring(["friends"])),
        )
}

/// An author referenced from [`book`].
pub fn author() -> EntityDescriptor {
    EntityDescriptor::new("Author")
        .with_property(
            PropertyDescriptor::new("name").with_field(FieldAnnotation::of(FieldType::Text)),
        )
        .with_property(PropertyDescriptor::new("ssn").with_field(FieldAnnotation {
            exclude_from_source: true,
            ..FieldAnnotation::of(FieldType::Keyword)
        }))
}

/// A book with a nested author and a field excluded from `_source`.
pub fn book() -> EntityDescriptor {
    EntityDescriptor::new("Book")
        .with_property(
            PropertyDescriptor::new("title").with_field(FieldAnnotation::of(FieldType::Text)),
        )
        .with_property(PropertyDescriptor::new("secret").with_field(FieldAnnotation {
            exclude_from_source: true,
            ..FieldAnnotation::of(FieldType::Keyword)
        }))
        .with_property(
            PropertyDescriptor::new("author")
                .referencing("Author")
                .with_field(FieldAnnotation {
                    include_in_parent: true,
                    ..FieldAnnotation::of(FieldType::Nested)
                }),
        )
}
